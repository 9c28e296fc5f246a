use super::ParamGen;

/// Runs a list of generators back to back, moving on to the next one as each runs dry.
///
/// `Sequential` builds one per model, with a generator per dense layer sized to that layer.
pub struct ChainedParamGen {
    param_gens: Vec<Box<dyn ParamGen>>,
    curr: usize,
}

impl ChainedParamGen {
    pub fn new(param_gens: Vec<Box<dyn ParamGen>>) -> Self {
        Self {
            param_gens,
            curr: 0,
        }
    }
}

impl ParamGen for ChainedParamGen {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        let mut values = Vec::with_capacity(n);

        while values.len() < n {
            let Some(param_gen) = self.param_gens.get_mut(self.curr) else {
                break;
            };

            match param_gen.sample(n - values.len()) {
                Some(sample) if !sample.is_empty() => values.extend(sample),
                _ => self.curr += 1,
            }
        }

        (!values.is_empty()).then_some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::{super::ConstParamGen, *};

    fn chain(gens: &[(f32, usize)]) -> ChainedParamGen {
        ChainedParamGen::new(
            gens.iter()
                .map(|&(value, limit)| {
                    Box::new(ConstParamGen::new(value, limit)) as Box<dyn ParamGen>
                })
                .collect(),
        )
    }

    #[test]
    fn empty() {
        assert!(chain(&[]).sample(1).is_none());
    }

    #[test]
    fn spans_generators() {
        let mut param_gen = chain(&[(0., 1), (1., 3)]);

        assert_eq!(param_gen.sample(2).unwrap(), [0., 1.]);
        assert_eq!(param_gen.sample(3).unwrap(), [1., 1.]);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn skips_exhausted() {
        let mut param_gen = chain(&[(0., 0), (2., 2), (3., 0), (4., 1)]);
        assert_eq!(param_gen.sample(5).unwrap(), [2., 2., 4.]);
    }
}
