mod chained;
mod constant;
mod param_gen;
mod random;

use std::{cell::RefCell, rc::Rc};

use rand::Rng;

pub use chained::ChainedParamGen;
pub use constant::ConstParamGen;
pub use param_gen::ParamGen;
pub use random::RandParamGen;

use crate::{Result, arch::spec::InitSpec};

/// Builds the generator for a single layer's parameters.
///
/// # Arguments
/// * `init` - The initialization strategy.
/// * `rng` - The random number generator shared by the whole model.
/// * `limit` - The amount of parameters the layer holds.
/// * `(fan_in, fan_out)` - The input and output widths of the layer.
///
/// # Returns
/// A boxed generator or an error if the strategy's distribution is invalid.
pub fn param_gen<R>(
    init: InitSpec,
    rng: Rc<RefCell<R>>,
    limit: usize,
    (fan_in, fan_out): (usize, usize),
) -> Result<Box<dyn ParamGen>>
where
    R: Rng + 'static,
{
    let param_gen: Box<dyn ParamGen> = match init {
        InitSpec::Const { value } => Box::new(ConstParamGen::new(value, limit)),
        InitSpec::Uniform { low, high } => {
            Box::new(RandParamGen::uniform(rng, limit, low, high)?)
        }
        InitSpec::UniformInclusive { low, high } => {
            Box::new(RandParamGen::uniform_inclusive(rng, limit, low, high)?)
        }
        InitSpec::Normal { mean, std_dev } => {
            Box::new(RandParamGen::normal(rng, limit, mean, std_dev)?)
        }
        InitSpec::Kaiming => Box::new(RandParamGen::kaiming(rng, limit, fan_in)?),
        InitSpec::Xavier => Box::new(RandParamGen::xavier(rng, limit, fan_in, fan_out)?),
        InitSpec::XavierUniform => Box::new(RandParamGen::xavier_uniform(
            rng, limit, fan_in, fan_out,
        )?),
        InitSpec::Lecun => Box::new(RandParamGen::lecun(rng, limit, fan_in)?),
        InitSpec::LecunUniform => Box::new(RandParamGen::lecun_uniform(rng, limit, fan_in)?),
        InitSpec::FanInUniform => Box::new(RandParamGen::fan_in_uniform(rng, limit, fan_in)?),
    };

    Ok(param_gen)
}
