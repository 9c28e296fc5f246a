use std::{
    fmt::{self, Display},
    path::Path,
};

/// A progress report of a single batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchReport {
    /// The epoch, starting at one.
    pub epoch: usize,
    /// The index of the batch within its epoch, starting at zero.
    pub batch: usize,
    /// The index of the batch times its amount of rows.
    pub seen: usize,
    /// The amount of samples in one pass of the data source.
    pub total: usize,
    pub loss: f32,
}

impl Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            epoch,
            seen,
            total,
            loss,
            ..
        } = self;

        write!(f, "Epoch: {epoch} [{seen}/{total}] Loss: {loss:.6}")
    }
}

/// The summary of a finished epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochStats {
    pub epoch: usize,
    pub batches: usize,
    /// The running total of the batch losses over the amount of batches.
    pub avg_loss: f32,
}

impl Display for EpochStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Epoch {} - Average Loss: {:.6}", self.epoch, self.avg_loss)
    }
}

/// Receives the telemetry of a training run.
pub trait Progress {
    /// Called for every `log_interval`th batch of each epoch, including the first one.
    fn batch(&mut self, report: &BatchReport);

    /// Called once at the end of every epoch.
    fn epoch(&mut self, stats: &EpochStats);

    /// Called once the trained model has been saved to `checkpoint`.
    fn finished(&mut self, checkpoint: &Path);
}

impl<T: Progress + ?Sized> Progress for &mut T {
    fn batch(&mut self, report: &BatchReport) {
        (**self).batch(report)
    }

    fn epoch(&mut self, stats: &EpochStats) {
        (**self).epoch(stats)
    }

    fn finished(&mut self, checkpoint: &Path) {
        (**self).finished(checkpoint)
    }
}

/// Prints human readable progress lines to the standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutProgress;

impl Progress for StdoutProgress {
    fn batch(&mut self, report: &BatchReport) {
        println!("{report}");
    }

    fn epoch(&mut self, stats: &EpochStats) {
        println!("{stats}");
    }

    fn finished(&mut self, _checkpoint: &Path) {
        println!("Training completed! Model saved.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_line() {
        let report = BatchReport {
            epoch: 1,
            batch: 10,
            seen: 640,
            total: 1000,
            loss: 2.302585,
        };

        assert_eq!(report.to_string(), "Epoch: 1 [640/1000] Loss: 2.302585");
    }

    #[test]
    fn epoch_line() {
        let stats = EpochStats {
            epoch: 3,
            batches: 16,
            avg_loss: 0.5,
        };

        assert_eq!(stats.to_string(), "Epoch 3 - Average Loss: 0.500000");
    }
}
