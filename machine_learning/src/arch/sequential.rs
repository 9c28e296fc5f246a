use std::{cell::RefCell, ops::Range, rc::Rc};

use log::debug;
use ndarray::{Array2, ArrayView2};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    Mode, Model,
    layers::Layer,
    spec::{LayerSpec, ModelSpec},
};
use crate::{
    MlErr, Result,
    device::Device,
    initialization::{self, ChainedParamGen, ParamGen},
    tensor::{StateDict, Tensor},
};

/// A sequential model: information flows forward when computing an output and backward when
/// computing the *deltas* of its layers.
///
/// Every layer reads a contiguous slice of the flat parameter buffer, in layer order.
#[derive(Debug, Clone)]
pub struct Sequential {
    layers: Vec<Layer>,
    params: Vec<f32>,
    grad: Vec<f32>,
    device: Device,
    mode: Mode,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    /// * `params` - The initial parameters, as many as all the layers' sizes combined.
    /// * `device` - The device the model lives on.
    ///
    /// # Returns
    /// A new `Sequential` instance or an error if the parameter count doesn't match or the
    /// device is unavailable.
    pub fn new<I>(layers: I, params: Vec<f32>, device: Device) -> Result<Self>
    where
        I: IntoIterator<Item = Layer>,
    {
        device.ensure_available()?;

        let layers: Vec<_> = layers.into_iter().collect();
        let size = layers.iter().map(Layer::size).sum();

        if params.len() != size {
            return Err(MlErr::SizeMismatch {
                what: "model parameters",
                got: params.len(),
                expected: size,
            });
        }

        Ok(Self {
            layers,
            grad: vec![0.; size],
            params,
            device,
            mode: Mode::Train,
        })
    }

    /// Creates a new `Sequential` with every parameter set to zero.
    pub fn zeroed<I>(layers: I, device: Device) -> Result<Self>
    where
        I: IntoIterator<Item = Layer>,
    {
        let layers: Vec<_> = layers.into_iter().collect();
        let size = layers.iter().map(Layer::size).sum();
        Self::new(layers, vec![0.; size], device)
    }

    /// Builds and initializes a `Sequential` following a specification.
    ///
    /// # Arguments
    /// * `spec` - The model's specification.
    /// * `device` - The device the model lives on.
    /// * `rng` - Seeds every random draw, so equal seeds produce equal models.
    pub fn from_spec<R: Rng>(spec: &ModelSpec, device: Device, rng: &mut R) -> Result<Self> {
        let ModelSpec::Sequential { layers: specs } = spec;
        let rng = Rc::new(RefCell::new(StdRng::from_rng(rng)));

        let mut layers = Vec::with_capacity(specs.len());
        let mut param_gens = Vec::with_capacity(specs.len());

        for &spec in specs {
            let seed = rng.borrow_mut().random();
            let layer = Layer::from_spec(spec, seed)?;

            if let LayerSpec::Dense { dim, init, .. } = spec {
                let param_gen = initialization::param_gen(init, rng.clone(), layer.size(), dim)?;
                param_gens.push(param_gen);
            }

            layers.push(layer);
        }

        let size: usize = layers.iter().map(Layer::size).sum();
        let params = match size {
            0 => Vec::new(),
            _ => ChainedParamGen::new(param_gens)
                .sample(size)
                .unwrap_or_default(),
        };

        debug!(layers = layers.len(), params = size; "initialized sequential model");
        Self::new(layers, params, device)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Lists every named parameter alongside its shape and its range in the flat buffer.
    fn param_layout(&self) -> Vec<(String, Vec<usize>, Range<usize>)> {
        let mut offset = 0;
        let mut layout = Vec::new();

        for (i, layer) in self.layers.iter().enumerate() {
            for (name, shape) in layer.param_shapes() {
                let len: usize = shape.iter().product();
                layout.push((format!("{i}.{name}"), shape, offset..offset + len));
                offset += len;
            }
        }

        layout
    }
}

impl Model for Sequential {
    fn size(&self) -> usize {
        self.params.len()
    }

    fn device(&self) -> Device {
        self.device
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn forward(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let Self {
            layers,
            params,
            mode,
            ..
        } = self;

        let mut rest = params.as_slice();
        let mut y: Option<Array2<f32>> = None;

        for layer in layers.iter_mut() {
            let (head, tail) = rest.split_at(layer.size());
            rest = tail;

            let input = match &y {
                Some(y) => y.view(),
                None => x.view(),
            };

            y = Some(layer.forward(head, input, *mode)?);
        }

        Ok(y.unwrap_or_else(|| x.to_owned()))
    }

    fn backward(&mut self, mut d: Array2<f32>) -> Result<()> {
        let Self {
            layers,
            params,
            grad,
            ..
        } = self;

        let mut end = params.len();

        for layer in layers.iter_mut().rev() {
            let start = end - layer.size();
            d = layer.backward(&params[start..end], &mut grad[start..end], d)?;
            end = start;
        }

        Ok(())
    }

    fn zero_grad(&mut self) {
        self.grad.fill(0.);
    }

    fn params(&self) -> &[f32] {
        &self.params
    }

    fn grad(&self) -> &[f32] {
        &self.grad
    }

    fn params_and_grad(&mut self) -> (&mut [f32], &[f32]) {
        (&mut self.params, &self.grad)
    }

    fn state_dict(&self) -> StateDict {
        self.param_layout()
            .into_iter()
            .map(|(name, shape, range)| {
                let tensor = Tensor::new(shape, self.params[range].to_vec())
                    .expect("layout ranges match their shapes");
                (name, tensor)
            })
            .collect()
    }

    fn load_state_dict(&mut self, state: &StateDict) -> Result<()> {
        let layout = self.param_layout();

        for (name, shape, _) in &layout {
            let tensor = state
                .get(name)
                .ok_or_else(|| MlErr::Checkpoint(format!("missing tensor {name}")))?;

            if tensor.shape() != shape.as_slice() {
                return Err(MlErr::Checkpoint(format!(
                    "tensor {name} has shape {:?}, expected {shape:?}",
                    tensor.shape()
                )));
            }
        }

        if let Some(name) = state
            .keys()
            .find(|key| !layout.iter().any(|(name, ..)| name == *key))
        {
            return Err(MlErr::Checkpoint(format!("unexpected tensor {name}")));
        }

        for (name, _, range) in layout {
            self.params[range].copy_from_slice(state[&name].data());
        }

        Ok(())
    }

    fn spec(&self) -> ModelSpec {
        ModelSpec::Sequential {
            layers: self.layers.iter().map(Layer::spec).collect(),
        }
    }
}
