use ndarray::{Array1, ArrayView1};

use super::Objective;
use crate::Result;

const ARMIJO_C: f64 = 1e-4;
const SHRINK: f64 = 0.5;
const MAX_TRIALS: usize = 50;
const MAX_EXPANSIONS: usize = 10;

/// An accepted step along a search direction.
#[derive(Debug, Clone)]
pub struct Step {
    pub alpha: f64,
    pub x: Array1<f64>,
    pub cost: f64,
}

fn sufficient_decrease(cost: f64, slope: f64, alpha: f64, new_cost: f64) -> bool {
    new_cost.is_finite() && new_cost <= cost + ARMIJO_C * alpha * slope
}

/// Armijo backtracking line search.
///
/// Looks for a step size `alpha` such that
/// `f(x + alpha * d) <= f(x) + c * alpha * grad(x) . d`, halving `alpha0` until it holds. When
/// `alpha0` is accepted straight away the step is doubled while the cost keeps dropping.
///
/// # Arguments
/// * `objective` - The function being minimized.
/// * `x` - The current point.
/// * `cost` - The value of the function at `x`.
/// * `direction` - A descent direction.
/// * `slope` - The directional derivative `grad(x) . direction`, must be negative.
/// * `alpha0` - The first step size to try.
///
/// # Returns
/// The accepted step, `None` if no trial step decreased the cost enough.
pub fn armijo(
    objective: &dyn Objective,
    x: &Array1<f64>,
    cost: f64,
    direction: &Array1<f64>,
    slope: f64,
    alpha0: f64,
) -> Result<Option<Step>> {
    let trial = |alpha: f64| -> Result<(Array1<f64>, f64)> {
        let mut x_new = x.clone();
        x_new.scaled_add(alpha, direction);
        let cost = objective.value(x_new.view())?;
        Ok((x_new, cost))
    };

    let mut alpha = alpha0;

    for attempt in 0..MAX_TRIALS {
        let (x_new, new_cost) = trial(alpha)?;
        if !sufficient_decrease(cost, slope, alpha, new_cost) {
            alpha *= SHRINK;
            continue;
        }

        let mut best = Step {
            alpha,
            x: x_new,
            cost: new_cost,
        };

        if attempt == 0 {
            for _ in 0..MAX_EXPANSIONS {
                let alpha = best.alpha * 2.;
                let (x_new, new_cost) = trial(alpha)?;
                if !sufficient_decrease(cost, slope, alpha, new_cost) || new_cost >= best.cost {
                    break;
                }

                best = Step {
                    alpha,
                    x: x_new,
                    cost: new_cost,
                };
            }
        }

        return Ok(Some(best));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    struct Parabola;

    impl Objective for Parabola {
        fn size(&self) -> usize {
            1
        }

        fn evaluate(&self, params: ArrayView1<f64>) -> Result<(f64, Array1<f64>)> {
            let x = params[0];
            Ok((x * x, array![2. * x]))
        }
    }

    #[test]
    fn backtracks_an_overshooting_step() {
        let x = array![1.];
        let direction = array![-2.];

        let step = armijo(&Parabola, &x, 1., &direction, -4., 10.).unwrap().unwrap();

        assert!(step.alpha < 10.);
        assert!(step.cost < 1.);
        assert_eq!(step.x[0], 1. - 2. * step.alpha);
    }

    #[test]
    fn expands_a_timid_step() {
        let x = array![1.];
        let direction = array![-2.];

        let step = armijo(&Parabola, &x, 1., &direction, -4., 1e-3).unwrap().unwrap();

        assert!(step.alpha > 1e-3);
        assert!(step.cost < Parabola.value(array![1. - 2e-3].view()).unwrap());
    }

    #[test]
    fn ascent_direction_is_rejected() {
        let x = array![1.];
        let direction = array![2.];

        assert!(armijo(&Parabola, &x, 1., &direction, 4., 1.).unwrap().is_none());
    }
}
