mod act_fn;
mod activation;
mod sigmoid;
mod tanh;

pub use act_fn::{ActFn, NeuronKind};
pub use activation::Activation;
pub use sigmoid::Sigmoid;
pub use tanh::Tanh;
