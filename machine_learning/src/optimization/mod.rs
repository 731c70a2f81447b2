mod bfgs;
mod conjugate_gradient;
mod gradient_descent;
pub mod line_search;
mod optimizer;
mod test;

pub use bfgs::Bfgs;
pub use conjugate_gradient::ConjugateGradient;
pub use gradient_descent::GradientDescent;
pub use optimizer::{DEFAULT_TOLERANCE, Minimizer, Objective, OptimizeResult, OptimizerKind};
