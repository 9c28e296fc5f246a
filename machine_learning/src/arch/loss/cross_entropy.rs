use ndarray::{Array2, ArrayView2, Zip};

use super::{LossFn, loss_fn::check_shapes};
use crate::Result;

/// Softmax cross entropy over raw logits.
///
/// Targets are one-hot rows (any probability distribution per row works), the loss is
/// averaged over the rows of the batch.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrossEntropy;

impl CrossEntropy {
    /// Returns a new `CrossEntropy`.
    pub fn new() -> Self {
        Self
    }

    /// Computes `log(softmax(logits))` row by row, shifting by the row max for stability.
    fn log_softmax(logits: ArrayView2<f32>) -> Array2<f32> {
        let mut out = logits.to_owned();

        for mut row in out.rows_mut() {
            let max = row.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
            let log_sum = row.iter().map(|&v| (v - max).exp()).sum::<f32>().ln();
            row.mapv_inplace(|v| v - max - log_sum);
        }

        out
    }
}

impl LossFn for CrossEntropy {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<f32> {
        check_shapes(&y_pred, &y)?;

        if y_pred.nrows() == 0 {
            return Ok(0.);
        }

        let log_p = Self::log_softmax(y_pred);
        let total = (&log_p * &y).sum();

        Ok(-total / y_pred.nrows() as f32)
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>> {
        check_shapes(&y_pred, &y)?;

        let n = y_pred.nrows().max(1) as f32;
        let mut d = Self::log_softmax(y_pred);

        // (softmax * sum(y) - y) / n, row by row
        for (mut d_row, y_row) in d.rows_mut().into_iter().zip(y.rows()) {
            let mass = y_row.sum();
            Zip::from(&mut d_row)
                .and(&y_row)
                .for_each(|d, &y| *d = (d.exp() * mass - y) / n);
        }

        Ok(d)
    }
}
