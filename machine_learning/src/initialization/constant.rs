use super::ParamGen;

/// Hands out `value` until `limit` parameters have been produced.
pub struct ConstParamGen {
    value: f32,
    left: usize,
}

impl ConstParamGen {
    pub fn new(value: f32, limit: usize) -> Self {
        Self { value, left: limit }
    }
}

impl ParamGen for ConstParamGen {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        if self.left == 0 {
            return None;
        }

        let take = n.min(self.left);
        self.left -= take;
        Some(vec![self.value; take])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_is_exhausted() {
        let mut param_gen = ConstParamGen::new(1., 0);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn stops_at_limit() {
        let mut param_gen = ConstParamGen::new(-0.5, 10);

        assert_eq!(param_gen.sample(7).unwrap(), vec![-0.5; 7]);
        assert_eq!(param_gen.sample(7).unwrap(), vec![-0.5; 3]);
        assert!(param_gen.sample(1).is_none());
    }
}
