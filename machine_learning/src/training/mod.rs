mod config;
mod network;

pub use config::{NetworkConfig, Param};
pub use network::{FitState, NeuralNetwork, TrainedModel};
