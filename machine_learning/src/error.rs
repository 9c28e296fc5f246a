use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use ndarray::ShapeError;
use rand_distr::{NormalError, uniform::Error as UniformError};
use safetensors::SafeTensorError;

use crate::device::Device;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    Shape(ShapeError),
    DeviceUnavailable(Device),
    NonFiniteLoss {
        epoch: usize,
        batch: usize,
        loss: f32,
    },
    InvalidConfig(String),
    Init(String),
    Dataset(String),
    Checkpoint(String),
    Io(io::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => format!("size mismatch for {what}, got {got} and expected {expected}"),
            MlErr::Shape(e) => format!("invalid tensor shape: {e}"),
            MlErr::DeviceUnavailable(device) => {
                format!("device {device} is not available in this runtime")
            }
            MlErr::NonFiniteLoss { epoch, batch, loss } => {
                format!("non-finite loss {loss} at epoch {epoch}, batch {batch}")
            }
            MlErr::InvalidConfig(msg) => format!("invalid config: {msg}"),
            MlErr::Init(msg) => format!("failed to initialize parameters: {msg}"),
            MlErr::Dataset(msg) => format!("dataset error: {msg}"),
            MlErr::Checkpoint(msg) => format!("checkpoint error: {msg}"),
            MlErr::Io(e) => format!("io error: {e}"),
        };

        write!(f, "{s}")
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            MlErr::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ShapeError> for MlErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}

impl From<NormalError> for MlErr {
    fn from(value: NormalError) -> Self {
        Self::Init(value.to_string())
    }
}

impl From<UniformError> for MlErr {
    fn from(value: UniformError) -> Self {
        Self::Init(value.to_string())
    }
}

impl From<SafeTensorError> for MlErr {
    fn from(value: SafeTensorError) -> Self {
        Self::Checkpoint(value.to_string())
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Checkpoint(format!("invalid model spec: {value}"))
    }
}
