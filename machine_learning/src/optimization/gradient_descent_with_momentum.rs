use super::{Optimizer, optimizer::check_sizes};
use crate::Result;

/// Heavy ball momentum: `v = momentum * v + g`, then `p -= learning_rate * v`.
#[derive(Debug)]
pub struct GradientDescentWithMomentum {
    learning_rate: f32,
    momentum: f32,
    velocity: Vec<f32>,
}

impl GradientDescentWithMomentum {
    /// # Arguments
    /// * `len` - The amount of parameters it will update, sizes the velocity.
    /// * `learning_rate` - Scales every step.
    /// * `momentum` - The fraction of the previous velocity kept on each step.
    pub fn new(len: usize, learning_rate: f32, momentum: f32) -> Self {
        Self {
            learning_rate,
            momentum,
            velocity: vec![0.; len],
        }
    }
}

impl Optimizer for GradientDescentWithMomentum {
    fn step(&mut self, params: &mut [f32], grad: &[f32]) -> Result<()> {
        check_sizes(params, grad, Some(self.velocity.len()))?;

        for ((p, &g), v) in params.iter_mut().zip(grad).zip(&mut self.velocity) {
            *v = self.momentum * *v + g;
            *p -= self.learning_rate * *v;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_accumulates() {
        let mut optimizer = GradientDescentWithMomentum::new(1, 1., 0.5);
        let mut params = [0.];

        optimizer.step(&mut params, &[1.]).unwrap();
        assert_eq!(params, [-1.]);

        optimizer.step(&mut params, &[1.]).unwrap();
        assert_eq!(params, [-2.5]);
    }

    #[test]
    fn state_size_mismatch_leaves_params() {
        let mut optimizer = GradientDescentWithMomentum::new(1, 1., 0.5);
        let mut params = [3., 4.];

        assert!(optimizer.step(&mut params, &[1., 1.]).is_err());
        assert_eq!(params, [3., 4.]);
    }
}
