use ndarray::{Array2, ArrayView2};

use crate::{MlErr, Result, device::Device};

/// An owned group of samples: one input row and one target row per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    x: Array2<f32>,
    y: Array2<f32>,
    device: Device,
}

impl Batch {
    /// Creates a new `Batch` resident on the cpu.
    ///
    /// # Arguments
    /// * `x` - The inputs, `[rows, features]`.
    /// * `y` - The targets, `[rows, targets]`.
    ///
    /// # Returns
    /// A new `Batch` or an error if `x` and `y` don't have the same amount of rows.
    pub fn new(x: Array2<f32>, y: Array2<f32>) -> Result<Self> {
        if x.nrows() != y.nrows() {
            return Err(MlErr::SizeMismatch {
                what: "batch targets",
                got: y.nrows(),
                expected: x.nrows(),
            });
        }

        Ok(Self {
            x,
            y,
            device: Device::Cpu,
        })
    }

    pub fn x(&self) -> ArrayView2<'_, f32> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView2<'_, f32> {
        self.y.view()
    }

    /// Returns the amount of samples in the batch.
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Moves the batch to `device`, a no-op if it already lives there.
    pub fn to_device(mut self, device: Device) -> Result<Self> {
        if self.device == device {
            return Ok(self);
        }

        device.ensure_available()?;
        self.device = device;
        Ok(self)
    }
}
