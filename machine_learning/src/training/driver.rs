use std::path::PathBuf;

use log::{debug, info};

use super::{BatchReport, EpochStats, Progress, TrainConfig};
use crate::{
    MlErr, Result,
    arch::{Mode, Model, loss::LossFn},
    checkpoint,
    dataset::{Batch, DataSource},
    optimization::Optimizer,
};

/// The outcome of a training run.
#[derive(Debug)]
pub struct TrainedModel<M> {
    pub model: M,
    /// The summary of every epoch, in order.
    pub history: Vec<EpochStats>,
    /// The amount of optimizer steps taken, one per consumed batch.
    pub steps: usize,
    /// Where the trained model was saved.
    pub checkpoint: PathBuf,
}

/// Trains `model` for `config.epochs()` full passes over `data` and saves it.
///
/// Every epoch puts the model in training mode and, for each batch in the order `data`
/// yields them, moves it to the model's device, resets the gradient, computes the loss,
/// backpropagates it and takes one optimizer step. Once every epoch has run the model is
/// written to `config.checkpoint()`, even when there were no epochs at all.
///
/// # Arguments
/// * `model` - The model to train.
/// * `optimizer` - The update rule for the model's parameters.
/// * `data` - The batches to train on, reset at the start of every epoch.
/// * `loss_fn` - The loss to minimize.
/// * `config` - The amount of epochs, report interval and checkpoint path.
/// * `progress` - Receives the batch reports, the epoch summaries and the final notice.
///
/// # Returns
/// The trained model alongside its history, or the first error raised by any of the
/// collaborators. A non finite batch loss is an error too. No retries are made.
pub fn run_training<M, O, D, L, P>(
    mut model: M,
    mut optimizer: O,
    mut data: D,
    loss_fn: &L,
    config: &TrainConfig,
    progress: &mut P,
) -> Result<TrainedModel<M>>
where
    M: Model,
    O: Optimizer,
    D: DataSource,
    L: LossFn + ?Sized,
    P: Progress + ?Sized,
{
    config.validate()?;

    let device = model.device();
    let total = data.len();
    let mut history = Vec::with_capacity(config.epochs());
    let mut steps = 0;

    info!(
        epochs = config.epochs(),
        samples = total,
        params = model.size();
        "starting training on {device}"
    );

    for epoch in 1..=config.epochs() {
        model.set_mode(Mode::Train);
        data.reset();

        let mut running_loss = 0.;
        let mut batches = 0;

        while let Some(batch) = data.next_batch() {
            let batch = batch.to_device(device)?;
            let rows = batch.len();

            let loss = train_step(&mut model, &mut optimizer, loss_fn, &batch)?;

            if !loss.is_finite() {
                return Err(MlErr::NonFiniteLoss {
                    epoch,
                    batch: batches,
                    loss,
                });
            }

            running_loss += loss as f64;
            steps += 1;

            if batches % config.log_interval() == 0 {
                progress.batch(&BatchReport {
                    epoch,
                    batch: batches,
                    seen: batches * rows,
                    total,
                    loss,
                });
            }

            batches += 1;
        }

        if batches == 0 {
            return Err(MlErr::Dataset(format!(
                "data source yielded no batches in epoch {epoch}"
            )));
        }

        let stats = EpochStats {
            epoch,
            batches,
            avg_loss: (running_loss / batches as f64) as f32,
        };

        debug!(epoch = epoch, batches = batches, avg_loss = stats.avg_loss; "finished epoch");
        progress.epoch(&stats);
        history.push(stats);
    }

    let path = config.checkpoint().to_path_buf();
    checkpoint::save(&model, &path)?;
    progress.finished(&path);

    Ok(TrainedModel {
        model,
        history,
        steps,
        checkpoint: path,
    })
}

/// Runs a single update on `batch`, skipping the backward pass and the step when the loss
/// isn't finite.
///
/// # Returns
/// The batch loss, measured before the update.
fn train_step<M, O, L>(model: &mut M, optimizer: &mut O, loss_fn: &L, batch: &Batch) -> Result<f32>
where
    M: Model,
    O: Optimizer,
    L: LossFn + ?Sized,
{
    model.zero_grad();

    let y_pred = model.forward(batch.x())?;
    let loss = loss_fn.loss(y_pred.view(), batch.y())?;

    if !loss.is_finite() {
        return Ok(loss);
    }

    let d = loss_fn.loss_prime(y_pred.view(), batch.y())?;
    model.backward(d)?;

    let (params, grad) = model.params_and_grad();
    optimizer.step(params, grad)?;

    Ok(loss)
}
