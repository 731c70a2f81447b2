pub mod arch;
pub mod error;
pub mod optimization;
pub mod training;

pub use error::{MlErr, Result};
pub use training::{FitState, NetworkConfig, NeuralNetwork, Param, TrainedModel};
