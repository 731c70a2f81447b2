use std::{fmt, str::FromStr};

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use super::{Bfgs, ConjugateGradient, GradientDescent};
use crate::{MlErr, Result};

/// The gradient norm below which the gradient based minimizers consider themselves converged.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// A differentiable scalar function of a flat parameter vector.
pub trait Objective {
    /// The amount of parameters the function takes.
    fn size(&self) -> usize;

    /// Evaluates the function and its gradient.
    ///
    /// # Arguments
    /// * `params` - The point to evaluate at.
    ///
    /// # Returns
    /// The value and a gradient of the same length as `params`.
    fn evaluate(&self, params: ArrayView1<f64>) -> Result<(f64, Array1<f64>)>;

    /// Evaluates only the function.
    fn value(&self, params: ArrayView1<f64>) -> Result<f64> {
        Ok(self.evaluate(params)?.0)
    }
}

/// The outcome of a minimization run.
#[derive(Debug, Clone)]
pub struct OptimizeResult {
    pub params: Array1<f64>,
    pub cost: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Defines the strategy for minimizing an objective from a starting point.
pub trait Minimizer {
    /// Minimizes `objective` starting at `x0`.
    ///
    /// # Arguments
    /// * `objective` - The function to minimize.
    /// * `x0` - The initial parameters.
    ///
    /// # Returns
    /// The best parameters found, same length as `x0`, or the first error the objective raised.
    fn minimize(&self, objective: &dyn Objective, x0: Array1<f64>) -> Result<OptimizeResult>;
}

/// The minimizers a network can be configured to train with.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    #[default]
    #[serde(rename = "fmin_cg")]
    ConjugateGradient,
    #[serde(rename = "fmin_bfgs")]
    Bfgs,
    GradientDescent {
        learning_rate: f64,
    },
}

impl OptimizerKind {
    /// The learning rate used when gradient descent is requested by name only.
    pub const DEFAULT_LEARNING_RATE: f64 = 1.;

    /// Checks the optimizer's own settings.
    pub fn validate(&self) -> Result<()> {
        if let OptimizerKind::GradientDescent { learning_rate } = *self {
            if !(learning_rate.is_finite() && learning_rate > 0.) {
                return Err(MlErr::InvalidParameter {
                    name: "optimizer",
                    reason: format!("learning rate must be finite and positive, got {learning_rate}"),
                });
            }
        }

        Ok(())
    }

    /// Builds the minimizer this kind names.
    ///
    /// # Arguments
    /// * `max_iterations` - The iteration budget of the minimizer.
    pub fn minimizer(&self, max_iterations: usize) -> Box<dyn Minimizer> {
        match *self {
            OptimizerKind::ConjugateGradient => Box::new(ConjugateGradient::new(max_iterations)),
            OptimizerKind::Bfgs => Box::new(Bfgs::new(max_iterations)),
            OptimizerKind::GradientDescent { learning_rate } => {
                Box::new(GradientDescent::new(learning_rate, max_iterations))
            }
        }
    }
}

impl FromStr for OptimizerKind {
    type Err = MlErr;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fmin_cg" | "cg" | "conjugate_gradient" => Ok(Self::ConjugateGradient),
            "fmin_bfgs" | "bfgs" => Ok(Self::Bfgs),
            "gradient_descent" | "grad_descent" => Ok(Self::GradientDescent {
                learning_rate: Self::DEFAULT_LEARNING_RATE,
            }),
            other => Err(MlErr::UnknownOptimizer(other.to_string())),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerKind::ConjugateGradient => f.write_str("fmin_cg"),
            OptimizerKind::Bfgs => f.write_str("fmin_bfgs"),
            OptimizerKind::GradientDescent { learning_rate } => {
                write!(f, "gradient_descent(learning_rate={learning_rate})")
            }
        }
    }
}

/// The largest absolute component of `v`.
pub(crate) fn inf_norm(v: &Array1<f64>) -> f64 {
    v.iter().fold(0., |acc, x| acc.max(x.abs()))
}
