use log::{debug, warn};
use ndarray::Array1;

use super::{DEFAULT_TOLERANCE, Minimizer, Objective, OptimizeResult, optimizer::inf_norm};
use crate::Result;

/// Gradient descent optimization algorithm.
pub struct GradientDescent {
    learning_rate: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on every iteration.
    /// * `max_iterations` - The maximum amount of steps taken.
    pub fn new(learning_rate: f64, max_iterations: usize) -> Self {
        Self {
            learning_rate,
            max_iterations,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Sets the gradient norm at which the descent stops.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Minimizer for GradientDescent {
    /// Makes fixed steps in the opposite direction of the gradient, with a length of
    /// `learning_rate`, until the gradient vanishes or the iterations run out.
    fn minimize(&self, objective: &dyn Objective, x0: Array1<f64>) -> Result<OptimizeResult> {
        let lr = self.learning_rate;
        let mut x = x0;
        let (mut cost, mut grad) = objective.evaluate(x.view())?;

        for iteration in 0..self.max_iterations {
            if inf_norm(&grad) < self.tolerance {
                debug!(iteration = iteration, cost = cost; "gradient descent converged");
                return Ok(OptimizeResult {
                    params: x,
                    cost,
                    iterations: iteration,
                    converged: true,
                });
            }

            x.scaled_add(-lr, &grad);
            (cost, grad) = objective.evaluate(x.view())?;
            debug!(iteration = iteration, cost = cost; "gradient descent step");
        }

        let converged = inf_norm(&grad) < self.tolerance;
        if !converged {
            warn!(
                "gradient descent reached its iteration limit: max_iterations={} cost={cost}",
                self.max_iterations
            );
        }

        Ok(OptimizeResult {
            params: x,
            cost,
            iterations: self.max_iterations,
            converged,
        })
    }
}
