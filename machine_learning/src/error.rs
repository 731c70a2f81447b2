use std::{
    error::Error,
    fmt::{self, Display},
};

use ndarray::ShapeError;
use rand_distr::uniform::Error as UniformError;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    UnknownActivation(String),
    UnknownOptimizer(String),
    UnknownParameter(String),
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
    InvalidArchitecture(String),
    InvalidData(String),
    NotTrained,
    Shape(ShapeError),
    Distribution(String),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch for {what}, got {got} and expected {expected}"
            ),
            MlErr::UnknownActivation(name) => write!(f, "Unknown neuron kind: {name}"),
            MlErr::UnknownOptimizer(name) => write!(f, "Unknown optimizer: {name}"),
            MlErr::UnknownParameter(name) => {
                write!(f, "{name} is not a recognized network parameter")
            }
            MlErr::InvalidParameter { name, reason } => {
                write!(f, "Invalid value for parameter {name}: {reason}")
            }
            MlErr::InvalidArchitecture(msg) => write!(f, "Invalid architecture: {msg}"),
            MlErr::InvalidData(msg) => write!(f, "Invalid training data: {msg}"),
            MlErr::NotTrained => write!(f, "The network has not been trained yet"),
            MlErr::Shape(e) => write!(f, "Failed to reshape array: {e}"),
            MlErr::Distribution(msg) => write!(f, "Invalid sampling distribution: {msg}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for MlErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}

impl From<UniformError> for MlErr {
    fn from(value: UniformError) -> Self {
        Self::Distribution(value.to_string())
    }
}
