use serde::{Deserialize, Serialize};

/// The specification for the `ActFn` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    Relu,
    Sigmoid { amp: f32 },
}

/// How the parameters of a layer are initialized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitSpec {
    Const { value: f32 },
    Uniform { low: f32, high: f32 },
    UniformInclusive { low: f32, high: f32 },
    Normal { mean: f32, std_dev: f32 },
    Kaiming,
    Xavier,
    XavierUniform,
    Lecun,
    LecunUniform,
    /// `U(-1/sqrt(fan_in), 1/sqrt(fan_in))` for both weights and biases.
    #[default]
    FanInUniform,
}

/// The specification for the `Layer` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSpec {
    Dense {
        dim: (usize, usize),
        act_fn: Option<ActFnSpec>,
        #[serde(default)]
        init: InitSpec,
    },
    Dropout {
        p: f32,
    },
}

/// The specification for the `Model` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    Sequential { layers: Vec<LayerSpec> },
}

impl ModelSpec {
    /// A two layer classifier: `input -> hidden (relu) -> classes` raw logits.
    ///
    /// # Arguments
    /// * `input` - The amount of input features.
    /// * `hidden` - The width of the hidden layer.
    /// * `classes` - The amount of output classes.
    pub fn feed_forward(input: usize, hidden: usize, classes: usize) -> Self {
        ModelSpec::Sequential {
            layers: vec![
                LayerSpec::Dense {
                    dim: (input, hidden),
                    act_fn: Some(ActFnSpec::Relu),
                    init: InitSpec::FanInUniform,
                },
                LayerSpec::Dense {
                    dim: (hidden, classes),
                    act_fn: None,
                    init: InitSpec::FanInUniform,
                },
            ],
        }
    }
}

/// The specification for the `LossFn` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFnSpec {
    Mse,
    CrossEntropy,
}
