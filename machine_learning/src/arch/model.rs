use ndarray::{Array2, ArrayView2};

use crate::{Result, arch::spec::ModelSpec, device::Device, tensor::StateDict};

/// Whether a model is being trained or evaluated, affects stochastic layers like dropout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Train,
    Eval,
}

/// A parameterized function from input tensors to output tensors, that also knows how to
/// compute the gradient of a loss with respect to its own parameters.
///
/// Implementors own a flat parameter buffer and a gradient buffer of the same length. The
/// length never changes during the lifetime of the model.
pub trait Model {
    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize;

    /// Returns the device the model's parameters live on.
    fn device(&self) -> Device;

    fn mode(&self) -> Mode;

    fn set_mode(&mut self, mode: Mode);

    /// Makes a forward pass through the model.
    ///
    /// # Arguments
    /// * `x` - The input data, one sample per row.
    ///
    /// # Returns
    /// The prediction for the given input or an error if the shapes don't line up.
    fn forward(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Backpropagates the derivative of the loss with respect to the last output,
    /// **adding** the result to the gradient buffer.
    ///
    /// # Arguments
    /// * `d` - The derivative of the loss with respect to the output of the last `forward`.
    fn backward(&mut self, d: Array2<f32>) -> Result<()>;

    /// Resets the gradient buffer to zero.
    fn zero_grad(&mut self);

    fn params(&self) -> &[f32];

    fn grad(&self) -> &[f32];

    /// Borrows the parameters mutably alongside the gradient, for an optimizer step.
    fn params_and_grad(&mut self) -> (&mut [f32], &[f32]);

    /// Copies the parameters out as a mapping from parameter name to tensor.
    fn state_dict(&self) -> StateDict;

    /// Overwrites every parameter with the tensor of the same name.
    ///
    /// # Returns
    /// An error, leaving the model untouched, if a tensor is missing, unexpected or has the
    /// wrong shape.
    fn load_state_dict(&mut self, state: &StateDict) -> Result<()>;

    /// Returns the specification needed to rebuild this model's architecture.
    fn spec(&self) -> ModelSpec;
}
