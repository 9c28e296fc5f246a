use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;

/// Trains a feed forward classifier and saves it to `model_checkpoint`.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "train", version)]
pub struct Args {
    /// Number of epochs
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Batch size
    #[arg(long, default_value = "64")]
    pub batch_size: NonZeroUsize,

    /// Learning rate
    #[arg(long, default_value_t = 0.001)]
    pub lr: f32,

    /// Seed for the parameters, the dummy data and the shuffling, random when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// CSV file with one sample per line, the class label in the last column.
    /// Random dummy data is used when absent
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Number of classes
    #[arg(long, default_value_t = 10)]
    pub num_classes: usize,

    /// Width of the hidden layer
    #[arg(long, default_value_t = 128)]
    pub hidden_size: usize,

    /// After training, log the loss and accuracy over the training data
    #[arg(long)]
    pub evaluate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["train"]).unwrap();

        assert_eq!(args.epochs, 10);
        assert_eq!(args.batch_size.get(), 64);
        assert_eq!(args.lr, 0.001);
        assert_eq!(args.seed, None);
        assert_eq!(args.data, None);
        assert_eq!(args.num_classes, 10);
        assert_eq!(args.hidden_size, 128);
        assert!(!args.evaluate);
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "train",
            "--epochs",
            "0",
            "--batch-size",
            "32",
            "--lr",
            "0.01",
            "--seed",
            "7",
            "--data",
            "train.csv",
            "--evaluate",
        ])
        .unwrap();

        assert_eq!(args.epochs, 0);
        assert_eq!(args.batch_size.get(), 32);
        assert_eq!(args.lr, 0.01);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.data, Some(PathBuf::from("train.csv")));
        assert!(args.evaluate);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(Args::try_parse_from(["train", "--batch-size", "0"]).is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["train", "--device", "cuda"]).is_err());
    }
}
