use ndarray::{Array2, ArrayView2};

use super::{LossFn, loss_fn::check_shapes};
use crate::Result;

/// Mean squared error loss function.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mse;

impl Mse {
    /// Returns a new `Mse`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for Mse {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<f32> {
        check_shapes(&y_pred, &y)?;

        let loss = (&y_pred - &y)
            .mapv(|x| x.powi(2))
            .mean()
            .unwrap_or_default();

        Ok(loss)
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>> {
        check_shapes(&y_pred, &y)?;
        Ok((&y_pred - &y) * (2.0 / y_pred.len() as f32))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn loss_and_derivative() {
        let y_pred = array![[1., 2.], [3., 4.]];
        let y = array![[1., 0.], [3., 0.]];

        assert_eq!(Mse.loss(y_pred.view(), y.view()).unwrap(), 5.);
        assert_eq!(
            Mse.loss_prime(y_pred.view(), y.view()).unwrap(),
            array![[0., 1.], [0., 2.]]
        );
    }

    #[test]
    fn shape_mismatch() {
        let y_pred = array![[1., 2.]];
        let y = array![[1.]];

        assert!(Mse.loss(y_pred.view(), y.view()).is_err());
        assert!(Mse.loss_prime(y_pred.view(), y.view()).is_err());
    }
}
