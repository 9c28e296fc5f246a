mod config;
mod driver;
mod eval;
mod progress;

pub use config::TrainConfig;
pub use driver::{TrainedModel, run_training};
pub use eval::{Evaluation, evaluate};
pub use progress::{BatchReport, EpochStats, Progress, StdoutProgress};
