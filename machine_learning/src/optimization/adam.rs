use super::{Optimizer, optimizer::check_sizes};
use crate::Result;

/// Adam with bias corrected moment estimates.
///
/// Keeps a `(mean, uncentered variance)` pair of running gradient moments per parameter and
/// counts the steps taken to correct their bias towards zero early on.
#[derive(Debug)]
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    moments: Vec<(f32, f32)>,
    t: i32,
}

impl Adam {
    pub const BETA1: f32 = 0.9;
    pub const BETA2: f32 = 0.999;
    pub const EPSILON: f32 = 1e-8;

    /// # Arguments
    /// * `len` - The amount of parameters it will update, sizes the moments.
    /// * `learning_rate` - The largest step any single parameter takes, roughly.
    /// * `beta1`, `beta2` - Decay of the first and second moment averages.
    /// * `epsilon` - Keeps the denominator away from zero.
    pub fn new(len: usize, learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            moments: vec![(0., 0.); len],
            t: 0,
        }
    }

    /// `Adam` with `beta1 = 0.9`, `beta2 = 0.999` and `epsilon = 1e-8`.
    pub fn with_defaults(len: usize, learning_rate: f32) -> Self {
        Self::new(len, learning_rate, Self::BETA1, Self::BETA2, Self::EPSILON)
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [f32], grad: &[f32]) -> Result<()> {
        check_sizes(params, grad, Some(self.moments.len()))?;

        self.t = self.t.saturating_add(1);

        let (b1, b2, eps) = (self.beta1, self.beta2, self.epsilon);
        let correction1 = 1. - b1.powi(self.t);
        let correction2 = 1. - b2.powi(self.t);
        let step_size = self.learning_rate * correction2.sqrt() / correction1;

        for ((p, &g), (m, v)) in params.iter_mut().zip(grad).zip(&mut self.moments) {
            *m = b1 * *m + (1. - b1) * g;
            *v = b2 * *v + (1. - b2) * g * g;
            *p -= step_size * *m / (v.sqrt() + eps);
        }

        Ok(())
    }
}
