use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    MlErr, Result,
    arch::{HiddenLayers, activations::NeuronKind, validate_hidden_layers},
    optimization::OptimizerKind,
};

const DEFAULT_HIDDEN_UNITS: usize = 25;
const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// The settings of a `NeuralNetwork`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// The requested hidden layers, the input and output ones are resolved when fitting.
    pub hidden_layers: HiddenLayers,
    /// The weight decay strength, `lambda`.
    pub regularization: f64,
    pub neuron: NeuronKind,
    pub optimizer: OptimizerKind,
    pub max_iterations: usize,
    /// Fixes the weight initialization when present.
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hidden_layers: HiddenLayers::from([(1, DEFAULT_HIDDEN_UNITS)]),
            regularization: 0.,
            neuron: NeuronKind::default(),
            optimizer: OptimizerKind::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }
}

impl NetworkConfig {
    /// Checks every setting.
    ///
    /// # Returns
    /// The first problem found.
    pub fn validate(&self) -> Result<()> {
        validate_hidden_layers(&self.hidden_layers)?;

        if !(self.regularization.is_finite() && self.regularization >= 0.) {
            return Err(MlErr::InvalidParameter {
                name: "regularization",
                reason: format!("must be finite and non negative, got {}", self.regularization),
            });
        }

        if self.max_iterations == 0 {
            return Err(MlErr::InvalidParameter {
                name: "max_iterations",
                reason: "must be positive".into(),
            });
        }

        self.optimizer.validate()
    }

    /// Overwrites a single setting, without validating the result.
    pub(super) fn apply(&mut self, param: Param) {
        match param {
            Param::HiddenLayers(hidden_layers) => self.hidden_layers = hidden_layers,
            Param::Regularization(lambda) => self.regularization = lambda,
            Param::Neuron(neuron) => self.neuron = neuron,
            Param::Optimizer(optimizer) => self.optimizer = optimizer,
            Param::MaxIterations(max_iterations) => self.max_iterations = max_iterations,
            Param::Seed(seed) => self.seed = seed,
        }
    }
}

/// A single network setting, the only things `set_params` can change.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    HiddenLayers(HiddenLayers),
    Regularization(f64),
    Neuron(NeuronKind),
    Optimizer(OptimizerKind),
    MaxIterations(usize),
    Seed(Option<u64>),
}

impl Param {
    /// Builds a setting from its name and a JSON value.
    ///
    /// # Arguments
    /// * `name` - The setting's name or one of its aliases.
    /// * `value` - The new value.
    ///
    /// # Returns
    /// `UnknownParameter` if nothing goes by `name`, `InvalidParameter` if `value` doesn't
    /// fit the setting.
    pub fn from_json(name: &str, value: Value) -> Result<Self> {
        let param = match name {
            "hidden_layers" | "architecture" => Param::HiddenLayers(parse("hidden_layers", value)?),
            "regularization" | "LAMBDA" | "lambda" => {
                Param::Regularization(parse("regularization", value)?)
            }
            "neuron" => match value {
                Value::String(name) => Param::Neuron(name.parse()?),
                other => Param::Neuron(parse("neuron", other)?),
            },
            "optimizer" | "optimiser" => match value {
                Value::String(name) => Param::Optimizer(name.parse()?),
                other => Param::Optimizer(parse("optimizer", other)?),
            },
            "max_iterations" | "maxiter" => Param::MaxIterations(parse("max_iterations", value)?),
            "seed" => Param::Seed(parse("seed", value)?),
            other => return Err(MlErr::UnknownParameter(other.to_string())),
        };

        Ok(param)
    }
}

fn parse<T: DeserializeOwned>(name: &'static str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| MlErr::InvalidParameter {
        name,
        reason: e.to_string(),
    })
}
