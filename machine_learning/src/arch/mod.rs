pub mod activations;
mod architecture;
mod backward;
mod cost;
mod forward;
pub mod labels;
pub mod params;

pub use architecture::{Architecture, HiddenLayers, validate_hidden_layers};
pub use backward::backward;
pub use cost::CostFn;
pub use forward::{ForwardPass, HYPOTHESIS_EPSILON, forward};
