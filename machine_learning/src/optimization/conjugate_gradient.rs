use log::{debug, warn};
use ndarray::Array1;

use super::{
    DEFAULT_TOLERANCE, Minimizer, Objective, OptimizeResult, line_search, optimizer::inf_norm,
};
use crate::Result;

/// Nonlinear conjugate gradient, Polak-Ribière with automatic restarts.
///
/// Every iteration searches along a direction mixing the new steepest descent direction with
/// the previous one. Whenever the mix stops being a descent direction the search restarts from
/// the steepest descent one.
pub struct ConjugateGradient {
    max_iterations: usize,
    tolerance: f64,
}

impl ConjugateGradient {
    /// Returns a new `ConjugateGradient`.
    ///
    /// # Arguments
    /// * `max_iterations` - The maximum amount of line searches performed.
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Sets the gradient norm at which the search stops.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Minimizer for ConjugateGradient {
    fn minimize(&self, objective: &dyn Objective, x0: Array1<f64>) -> Result<OptimizeResult> {
        let mut x = x0;
        let (mut cost, mut grad) = objective.evaluate(x.view())?;
        let mut direction = -&grad;
        let mut prev_step: Option<(f64, f64)> = None;

        for iteration in 0..self.max_iterations {
            if inf_norm(&grad) < self.tolerance {
                debug!(iteration = iteration, cost = cost; "conjugate gradient converged");
                return Ok(OptimizeResult {
                    params: x,
                    cost,
                    iterations: iteration,
                    converged: true,
                });
            }

            let mut slope = grad.dot(&direction);
            if slope >= 0. {
                direction = -&grad;
                slope = grad.dot(&direction);
            }

            let alpha0 = match prev_step {
                Some((alpha, prev_slope)) => alpha * prev_slope / slope,
                None => 1f64.min(1. / grad.dot(&grad).sqrt()),
            };

            let mut step = line_search::armijo(objective, &x, cost, &direction, slope, alpha0)?;
            if step.is_none() && prev_step.is_some() {
                // The conjugate direction failed, retry along the gradient.
                direction = -&grad;
                slope = grad.dot(&direction);
                let alpha0 = 1f64.min(1. / grad.dot(&grad).sqrt());
                step = line_search::armijo(objective, &x, cost, &direction, slope, alpha0)?;
            }

            let Some(step) = step else {
                warn!("line search stalled: iteration={iteration} cost={cost}");
                return Ok(OptimizeResult {
                    params: x,
                    cost,
                    iterations: iteration,
                    converged: false,
                });
            };

            let (new_cost, new_grad) = objective.evaluate(step.x.view())?;
            let beta = (new_grad.dot(&(&new_grad - &grad)) / grad.dot(&grad)).max(0.);

            direction = &direction * beta - &new_grad;
            prev_step = Some((step.alpha, slope));
            x = step.x;
            cost = new_cost;
            grad = new_grad;

            debug!(iteration = iteration, cost = cost, beta = beta; "conjugate gradient step");
        }

        let converged = inf_norm(&grad) < self.tolerance;
        if !converged {
            warn!(
                "conjugate gradient reached its iteration limit: max_iterations={} cost={cost}",
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
