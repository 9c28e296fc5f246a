mod cross_entropy;
mod loss_fn;
mod mse;

pub use cross_entropy::CrossEntropy;
pub use loss_fn::LossFn;
pub use mse::Mse;

use super::spec::LossFnSpec;

impl LossFnSpec {
    /// Builds the loss function this specification names.
    pub fn build(self) -> Box<dyn LossFn> {
        match self {
            LossFnSpec::Mse => Box::new(Mse),
            LossFnSpec::CrossEntropy => Box::new(CrossEntropy),
        }
    }
}
