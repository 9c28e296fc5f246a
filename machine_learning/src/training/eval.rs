use ndarray::ArrayView1;

use crate::{
    MlErr, Result,
    arch::{Mode, Model, loss::LossFn},
    dataset::DataSource,
};

/// How well a model does on a data source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// The loss averaged over every sample.
    pub loss: f32,
    /// The fraction of samples whose highest output matches the target class, only for
    /// targets with more than one column.
    pub accuracy: Option<f32>,
    pub samples: usize,
}

/// Evaluates `model` over one full pass of `data` without changing its parameters.
///
/// The model is put in evaluation mode for the pass and then back into the mode it had.
pub fn evaluate<M, D, L>(model: &mut M, mut data: D, loss_fn: &L) -> Result<Evaluation>
where
    M: Model,
    D: DataSource,
    L: LossFn + ?Sized,
{
    let mode = model.mode();
    model.set_mode(Mode::Eval);

    let res = evaluate_pass(model, &mut data, loss_fn);

    model.set_mode(mode);
    res
}

fn evaluate_pass<M, D, L>(model: &mut M, data: &mut D, loss_fn: &L) -> Result<Evaluation>
where
    M: Model,
    D: DataSource,
    L: LossFn + ?Sized,
{
    let device = model.device();
    let mut loss = 0f64;
    let mut hits = 0;
    let mut samples = 0;
    let mut classes = 0;

    data.reset();

    while let Some(batch) = data.next_batch() {
        let batch = batch.to_device(device)?;
        let y_pred = model.forward(batch.x())?;

        loss += loss_fn.loss(y_pred.view(), batch.y())? as f64 * batch.len() as f64;
        samples += batch.len();
        classes = batch.y().ncols();

        hits += y_pred
            .rows()
            .into_iter()
            .zip(batch.y().rows())
            .filter(|(p, y)| argmax(*p) == argmax(*y))
            .count();
    }

    if samples == 0 {
        return Err(MlErr::Dataset("no samples to evaluate".into()));
    }

    Ok(Evaluation {
        loss: (loss / samples as f64) as f32,
        accuracy: (classes > 1).then(|| hits as f32 / samples as f32),
        samples,
    })
}

/// Returns the index of the largest value, the first one on ties.
fn argmax(row: ArrayView1<f32>) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, max), (i, &v)| {
            if v > max { (i, v) } else { (best, max) }
        })
        .0
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use ndarray::array;

    use super::*;
    use crate::{
        arch::{Sequential, layers::Layer, loss::CrossEntropy},
        dataset::{DataLoader, InMemoryDataset},
        device::Device,
    };

    #[test]
    fn argmax_first_on_ties() {
        assert_eq!(argmax(array![1., 3., 3.].view()), 1);
        assert_eq!(argmax(array![-1.].view()), 0);
    }

    #[test]
    fn accuracy_and_untouched_params() {
        // identity weights, the prediction is the input itself
        let mut model =
            Sequential::new([Layer::dense((2, 2), None)], vec![1., 0., 0., 1., 0., 0.], Device::Cpu)
                .unwrap();
        let before = model.params().to_vec();

        let ds = InMemoryDataset::new(
            array![[2., 0.], [0., 2.], [2., 0.], [1., 0.]],
            array![[1., 0.], [0., 1.], [0., 1.], [1., 0.]],
        )
        .unwrap();
        let data = DataLoader::new(ds, NonZeroUsize::new(3).unwrap());

        let eval = evaluate(&mut model, data, &CrossEntropy).unwrap();

        assert_eq!(eval.samples, 4);
        assert_eq!(eval.accuracy, Some(0.75));
        assert!(eval.loss.is_finite());
        assert_eq!(model.params(), before.as_slice());
        assert_eq!(model.mode(), Mode::Train);
    }
}
