use std::path::{Path, PathBuf};

use crate::{MlErr, Result, checkpoint::CHECKPOINT_FILE};

/// How a training run is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainConfig {
    epochs: usize,
    log_interval: usize,
    checkpoint: PathBuf,
}

impl TrainConfig {
    pub const EPOCHS: usize = 10;
    pub const LOG_INTERVAL: usize = 10;

    /// Creates a new `TrainConfig` that runs `epochs` passes, reports every tenth batch and
    /// saves to `model_checkpoint`.
    pub fn new(epochs: usize) -> Self {
        Self {
            epochs,
            log_interval: Self::LOG_INTERVAL,
            checkpoint: PathBuf::from(CHECKPOINT_FILE),
        }
    }

    /// Reports every `log_interval`th batch instead, must be non zero.
    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    /// Saves the trained model to `path` instead.
    pub fn with_checkpoint<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.checkpoint = path.into();
        self
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn log_interval(&self) -> usize {
        self.log_interval
    }

    pub fn checkpoint(&self) -> &Path {
        &self.checkpoint
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.log_interval == 0 {
            return Err(MlErr::InvalidConfig("log interval must be non zero".into()));
        }

        Ok(())
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::new(Self::EPOCHS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TrainConfig::default();
        assert_eq!(config.epochs(), 10);
        assert_eq!(config.log_interval(), 10);
        assert_eq!(config.checkpoint(), Path::new("model_checkpoint"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_log_interval() {
        let config = TrainConfig::new(1).with_log_interval(0);
        assert!(matches!(config.validate(), Err(MlErr::InvalidConfig(_))));
    }
}
