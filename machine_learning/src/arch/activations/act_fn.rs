use std::{fmt, str::FromStr};

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{Activation, Sigmoid, Tanh};
use crate::{MlErr, Result};

/// The neuron kinds a network can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronKind {
    #[default]
    Sigmoid,
    Tanh,
}

impl FromStr for NeuronKind {
    type Err = MlErr;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sigmoid" => Ok(Self::Sigmoid),
            "tanh" => Ok(Self::Tanh),
            other => Err(MlErr::UnknownActivation(other.to_string())),
        }
    }
}

impl fmt::Display for NeuronKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeuronKind::Sigmoid => f.write_str("sigmoid"),
            NeuronKind::Tanh => f.write_str("tanh"),
        }
    }
}

/// A resolved activation function.
#[derive(Clone, Copy, Debug)]
pub enum ActFn {
    Sigmoid(Sigmoid),
    Tanh(Tanh),
}

impl ActFn {
    pub fn sigmoid() -> Self {
        Self::Sigmoid(Sigmoid::new())
    }

    pub fn tanh() -> Self {
        Self::Tanh(Tanh::new())
    }
}

impl From<NeuronKind> for ActFn {
    fn from(kind: NeuronKind) -> Self {
        match kind {
            NeuronKind::Sigmoid => Self::sigmoid(),
            NeuronKind::Tanh => Self::tanh(),
        }
    }
}

impl Activation for ActFn {
    fn f(&self, z: f64) -> f64 {
        match self {
            Self::Sigmoid(a) => a.f(z),
            Self::Tanh(a) => a.f(z),
        }
    }

    fn df(&self, z: f64) -> f64 {
        match self {
            Self::Sigmoid(a) => a.df(z),
            Self::Tanh(a) => a.df(z),
        }
    }

    fn fire(&self, stimuli: ArrayView2<f64>) -> Array2<f64> {
        match self {
            Self::Sigmoid(a) => a.fire(stimuli),
            Self::Tanh(a) => a.fire(stimuli),
        }
    }

    fn dfire(&self, stimuli: ArrayView2<f64>) -> Array2<f64> {
        match self {
            Self::Sigmoid(a) => a.dfire(stimuli),
            Self::Tanh(a) => a.dfire(stimuli),
        }
    }
}
