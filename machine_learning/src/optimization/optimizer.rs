use crate::{MlErr, Result};

/// An update rule for a model's flat parameter buffer.
pub trait Optimizer {
    /// Moves `params` one step against `grad`.
    ///
    /// # Returns
    /// An error, before touching anything, if `grad` or the optimizer's own per parameter
    /// state doesn't have one entry per parameter.
    fn step(&mut self, params: &mut [f32], grad: &[f32]) -> Result<()>;
}

impl<T: Optimizer + ?Sized> Optimizer for Box<T> {
    fn step(&mut self, params: &mut [f32], grad: &[f32]) -> Result<()> {
        (**self).step(params, grad)
    }
}

/// Fails unless `grad`, and `state` for stateful rules, line up with `params`.
pub(super) fn check_sizes(params: &[f32], grad: &[f32], state: Option<usize>) -> Result<()> {
    let expected = params.len();

    let mismatch = [("gradient", Some(grad.len())), ("optimizer state", state)]
        .into_iter()
        .find_map(|(what, got)| got.filter(|&got| got != expected).map(|got| (what, got)));

    match mismatch {
        Some((what, got)) => Err(MlErr::SizeMismatch {
            what,
            got,
            expected,
        }),
        None => Ok(()),
    }
}
