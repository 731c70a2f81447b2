use log::{debug, warn};
use ndarray::{Array1, Array2, Axis};

use super::{
    DEFAULT_TOLERANCE, Minimizer, Objective, OptimizeResult, line_search, optimizer::inf_norm,
};
use crate::Result;

/// Updates are skipped when the curvature `s . y` falls below this.
const MIN_CURVATURE: f64 = 1e-10;

/// Quasi-Newton minimization keeping a dense approximation of the inverse Hessian.
///
/// The approximation takes `n^2` memory, which is fine for the small networks this crate trains.
pub struct Bfgs {
    max_iterations: usize,
    tolerance: f64,
}

impl Bfgs {
    /// Returns a new `Bfgs`.
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

fn outer(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    let a = a.view().insert_axis(Axis(1));
    let b = b.view().insert_axis(Axis(0));
    a.dot(&b)
}

/// Applies the BFGS update to the inverse Hessian approximation `h`.
///
/// # Arguments
/// * `h` - The current approximation.
/// * `s` - The step taken.
/// * `y` - The change of the gradient along that step.
/// * `sy` - The curvature `s . y`, positive.
fn update_inverse_hessian(h: &mut Array2<f64>, s: &Array1<f64>, y: &Array1<f64>, sy: f64) {
    let hy = h.dot(y);
    let yhy = y.dot(&hy);

    *h += &(outer(s, s) * ((sy + yhy) / (sy * sy)));
    *h -= &((outer(&hy, s) + outer(s, &hy)) / sy);
}

impl Minimizer for Bfgs {
    fn minimize(&self, objective: &dyn Objective, x0: Array1<f64>) -> Result<OptimizeResult> {
        let n = x0.len();
        let mut x = x0;
        let (mut cost, mut grad) = objective.evaluate(x.view())?;
        let mut h = Array2::<f64>::eye(n);
        let mut scaled = false;

        for iteration in 0..self.max_iterations {
            if inf_norm(&grad) < self.tolerance {
                debug!(iteration = iteration, cost = cost; "bfgs converged");
                return Ok(OptimizeResult {
                    params: x,
                    cost,
                    iterations: iteration,
                    converged: true,
                });
            }

            let mut direction = -h.dot(&grad);
            let mut slope = grad.dot(&direction);
            if !(slope < 0.) {
                // The approximation lost positive definiteness.
                h = Array2::eye(n);
                scaled = false;
                direction = -&grad;
                slope = grad.dot(&direction);
            }

            let alpha0 = if scaled {
                1.
            } else {
                1f64.min(1. / grad.dot(&grad).sqrt())
            };

            let Some(step) = line_search::armijo(objective, &x, cost, &direction, slope, alpha0)?
            else {
                warn!("line search stalled: iteration={iteration} cost={cost}");
                return Ok(OptimizeResult {
                    params: x,
                    cost,
                    iterations: iteration,
                    converged: false,
                });
            };

            let (new_cost, new_grad) = objective.evaluate(step.x.view())?;
            let s = &step.x - &x;
            let y = &new_grad - &grad;
            let sy = s.dot(&y);

            if sy > MIN_CURVATURE {
                if !scaled {
                    h = Array2::eye(n) * (sy / y.dot(&y));
                    scaled = true;
                }
                update_inverse_hessian(&mut h, &s, &y, sy);
            }

            x = step.x;
            cost = new_cost;
            grad = new_grad;

            debug!(iteration = iteration, cost = cost; "bfgs step");
        }

        let converged = inf_norm(&grad) < self.tolerance;
        if !converged {
            warn!(
                "bfgs reached its iteration limit: max_iterations={} cost={cost}",
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
