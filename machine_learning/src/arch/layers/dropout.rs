use ndarray::{Array2, ArrayView2};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    MlErr, Result,
    arch::{Mode, spec::LayerSpec},
};

/// Inverted dropout: while training each input is zeroed with probability `p` and the
/// survivors are scaled by `1 / (1 - p)`. Evaluation passes the input through untouched.
#[derive(Debug, Clone)]
pub struct Dropout {
    p: f32,
    rng: StdRng,
    mask: Option<Array2<f32>>,
}

impl Dropout {
    /// Creates a new `Dropout` layer.
    ///
    /// # Arguments
    /// * `p` - The probability of dropping each input, in `[0, 1)`.
    /// * `seed` - The seed of the mask sampler.
    ///
    /// # Returns
    /// A new `Dropout` or an error if `p` is out of range.
    pub fn new(p: f32, seed: u64) -> Result<Self> {
        if !(0.0..1.0).contains(&p) {
            return Err(MlErr::InvalidConfig(format!(
                "dropout probability must be in [0, 1), got {p}"
            )));
        }

        Ok(Self {
            p,
            rng: StdRng::seed_from_u64(seed),
            mask: None,
        })
    }

    pub fn spec(&self) -> LayerSpec {
        LayerSpec::Dropout { p: self.p }
    }

    pub fn forward(&mut self, x: ArrayView2<f32>, mode: Mode) -> Array2<f32> {
        if mode == Mode::Eval || self.p == 0. {
            self.mask = None;
            return x.to_owned();
        }

        let (p, scale) = (self.p, 1. / (1. - self.p));
        let rng = &mut self.rng;
        let mask = x.map(|_| if rng.random::<f32>() < p { 0. } else { scale });
        let y = &x * &mask;

        self.mask = Some(mask);
        y
    }

    pub fn backward(&mut self, d: Array2<f32>) -> Result<Array2<f32>> {
        let Some(mask) = self.mask.take() else {
            return Ok(d);
        };

        if mask.dim() != d.dim() {
            return Err(MlErr::SizeMismatch {
                what: "dropout delta",
                got: d.len(),
                expected: mask.len(),
            });
        }

        Ok(d * mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn eval_is_identity() {
        let mut dropout = Dropout::new(0.5, 7).unwrap();
        let x = Array2::from_elem((4, 4), 3.);

        assert_eq!(dropout.forward(x.view(), Mode::Eval), x);
        assert_eq!(dropout.backward(x.clone()).unwrap(), x);
    }

    #[test]
    fn train_zeroes_or_scales() {
        let mut dropout = Dropout::new(0.5, 7).unwrap();
        let x = Array2::from_elem((8, 8), 1.);

        let y = dropout.forward(x.view(), Mode::Train);
        assert!(y.iter().all(|&v| v == 0. || v == 2.));
        assert!(y.iter().any(|&v| v == 0.));

        let d = dropout.backward(Array2::from_elem((8, 8), 1.)).unwrap();
        assert_eq!(d, y);
    }

    #[test]
    fn invalid_probability() {
        assert!(Dropout::new(1., 0).is_err());
        assert!(Dropout::new(-0.1, 0).is_err());
    }
}
