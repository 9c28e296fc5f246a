use ndarray::{Array2, ArrayView2};

use crate::{MlErr, Result};

/// Measures how far a prediction is from the expected output.
pub trait LossFn {
    /// Computes the scalar loss of a batch.
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<f32>;

    /// Computes the derivative of the loss with respect to `y_pred`.
    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>>;
}

impl<T: LossFn + ?Sized> LossFn for Box<T> {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<f32> {
        (**self).loss(y_pred, y)
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>> {
        (**self).loss_prime(y_pred, y)
    }
}

/// Fails if the prediction and the target don't have the same shape.
pub(super) fn check_shapes(y_pred: &ArrayView2<f32>, y: &ArrayView2<f32>) -> Result<()> {
    if y_pred.nrows() != y.nrows() {
        return Err(MlErr::SizeMismatch {
            what: "loss rows",
            got: y.nrows(),
            expected: y_pred.nrows(),
        });
    }

    if y_pred.ncols() != y.ncols() {
        return Err(MlErr::SizeMismatch {
            what: "loss columns",
            got: y.ncols(),
            expected: y_pred.ncols(),
        });
    }

    Ok(())
}
