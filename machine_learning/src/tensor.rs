use std::collections::BTreeMap;

use crate::{MlErr, Result};

/// A named model's parameters, keyed by parameter name.
pub type StateDict = BTreeMap<String, Tensor>;

/// An owned, row major `f32` tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Tensor {
    /// Creates a new `Tensor`.
    ///
    /// # Arguments
    /// * `shape` - The size of each dimension.
    /// * `data` - The values, row major.
    ///
    /// # Returns
    /// A new `Tensor` or an error if `data` doesn't fill `shape` exactly.
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        let expected = shape.iter().product();

        if data.len() != expected {
            return Err(MlErr::SizeMismatch {
                what: "tensor data",
                got: data.len(),
                expected,
            });
        }

        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_must_match_data() {
        assert!(Tensor::new(vec![2, 3], vec![0.; 6]).is_ok());
        assert!(matches!(
            Tensor::new(vec![2, 3], vec![0.; 5]),
            Err(MlErr::SizeMismatch { got: 5, expected: 6, .. })
        ));
    }
}
