use ndarray::{Array2, ArrayView2};

use super::{Dense, Dropout};
use crate::{
    Result,
    arch::{Mode, activations::ActFn, spec::LayerSpec},
};

/// A building block of a `Sequential` model.
#[derive(Debug, Clone)]
pub enum Layer {
    Dense(Dense),
    Dropout(Dropout),
}

impl Layer {
    pub fn dense(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self::Dense(Dense::new(dim, act_fn, Default::default()))
    }

    pub fn dropout(p: f32, seed: u64) -> Result<Self> {
        Ok(Self::Dropout(Dropout::new(p, seed)?))
    }

    /// Builds a layer from its specification.
    ///
    /// # Arguments
    /// * `spec` - The layer's specification.
    /// * `seed` - Seeds any randomness the layer uses while training.
    pub fn from_spec(spec: LayerSpec, seed: u64) -> Result<Self> {
        match spec {
            LayerSpec::Dense { dim, act_fn, init } => Ok(Self::Dense(Dense::new(
                dim,
                act_fn.map(ActFn::from_spec),
                init,
            ))),
            LayerSpec::Dropout { p } => Self::dropout(p, seed),
        }
    }

    pub fn spec(&self) -> LayerSpec {
        match self {
            Self::Dense(l) => l.spec(),
            Self::Dropout(l) => l.spec(),
        }
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        match self {
            Self::Dense(l) => l.size(),
            Self::Dropout(_) => 0,
        }
    }

    /// Returns the names and shapes of this layer's parameters, in buffer order.
    pub fn param_shapes(&self) -> Vec<(&'static str, Vec<usize>)> {
        match self {
            Self::Dense(l) => {
                let (n, m) = l.dim();
                vec![("weight", vec![n, m]), ("bias", vec![m])]
            }
            Self::Dropout(_) => Vec::new(),
        }
    }

    pub fn forward(
        &mut self,
        params: &[f32],
        x: ArrayView2<f32>,
        mode: Mode,
    ) -> Result<Array2<f32>> {
        match self {
            Self::Dense(l) => l.forward(params, x),
            Self::Dropout(l) => Ok(l.forward(x, mode)),
        }
    }

    pub fn backward(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        d: Array2<f32>,
    ) -> Result<Array2<f32>> {
        match self {
            Self::Dense(l) => l.backward(params, grad, d),
            Self::Dropout(l) => l.backward(d),
        }
    }
}
