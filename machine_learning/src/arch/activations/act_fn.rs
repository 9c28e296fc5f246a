use super::{Relu, Sigmoid};
use crate::arch::spec::ActFnSpec;

/// An element-wise activation function applied at the output of a layer.
#[derive(Debug, Clone)]
pub enum ActFn {
    Relu(Relu),
    Sigmoid(Sigmoid),
}

impl ActFn {
    pub fn relu() -> Self {
        Self::Relu(Relu)
    }

    pub fn sigmoid(amp: f32) -> Self {
        Self::Sigmoid(Sigmoid::new(amp))
    }

    pub fn from_spec(spec: ActFnSpec) -> Self {
        match spec {
            ActFnSpec::Relu => Self::relu(),
            ActFnSpec::Sigmoid { amp } => Self::sigmoid(amp),
        }
    }

    pub fn spec(&self) -> ActFnSpec {
        match self {
            Self::Relu(_) => ActFnSpec::Relu,
            Self::Sigmoid(a) => ActFnSpec::Sigmoid { amp: a.amp() },
        }
    }

    pub fn f(&self, x: f32) -> f32 {
        match self {
            Self::Relu(a) => a.f(x),
            Self::Sigmoid(a) => a.f(x),
        }
    }

    pub fn df(&self, x: f32) -> f32 {
        match self {
            Self::Relu(a) => a.df(x),
            Self::Sigmoid(a) => a.df(x),
        }
    }
}
