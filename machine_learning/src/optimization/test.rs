#![cfg(test)]

use ndarray::{Array1, ArrayView1, array};

use super::{Bfgs, ConjugateGradient, GradientDescent, Minimizer, Objective, OptimizerKind};
use crate::{MlErr, Result};

/// `f(x) = sum_i c_i * (x_i - t_i)^2`
struct Quadratic {
    scales: Array1<f64>,
    target: Array1<f64>,
}

impl Objective for Quadratic {
    fn size(&self) -> usize {
        self.target.len()
    }

    fn evaluate(&self, params: ArrayView1<f64>) -> Result<(f64, Array1<f64>)> {
        let diff = &params - &self.target;
        let cost = (&self.scales * &diff * &diff).sum();
        let grad = &self.scales * &diff * 2.;
        Ok((cost, grad))
    }
}

struct Rosenbrock;

impl Objective for Rosenbrock {
    fn size(&self) -> usize {
        2
    }

    fn evaluate(&self, params: ArrayView1<f64>) -> Result<(f64, Array1<f64>)> {
        let (x, y) = (params[0], params[1]);
        let cost = (1. - x).powi(2) + 100. * (y - x * x).powi(2);
        let grad = array![
            -2. * (1. - x) - 400. * x * (y - x * x),
            200. * (y - x * x)
        ];
        Ok((cost, grad))
    }
}

struct Failing;

impl Objective for Failing {
    fn size(&self) -> usize {
        1
    }

    fn evaluate(&self, _: ArrayView1<f64>) -> Result<(f64, Array1<f64>)> {
        Err(MlErr::InvalidData("nothing to evaluate".into()))
    }
}

fn quadratic() -> Quadratic {
    Quadratic {
        scales: array![1., 10., 0.5],
        target: array![3., -1., 2.],
    }
}

fn close_to(got: &Array1<f64>, expected: &Array1<f64>, tol: f64) -> bool {
    got.iter().zip(expected).all(|(g, e)| (g - e).abs() < tol)
}

#[test]
fn conjugate_gradient_minimizes_a_quadratic() {
    let objective = quadratic();
    let result = ConjugateGradient::new(200)
        .minimize(&objective, Array1::zeros(3))
        .unwrap();

    assert!(result.converged);
    assert!(close_to(&result.params, &objective.target, 1e-4));
    assert!(result.cost < 1e-8);
}

#[test]
fn bfgs_minimizes_a_quadratic() {
    let objective = quadratic();
    let result = Bfgs::new(200).minimize(&objective, Array1::zeros(3)).unwrap();

    assert!(result.converged);
    assert!(close_to(&result.params, &objective.target, 1e-4));
}

#[test]
fn gradient_descent_minimizes_a_quadratic() {
    let objective = quadratic();
    // Stable as long as lr * 2 * max(c) < 2.
    let result = GradientDescent::new(0.05, 5000)
        .minimize(&objective, Array1::zeros(3))
        .unwrap();

    assert!(result.converged);
    assert!(close_to(&result.params, &objective.target, 1e-4));
}

#[test]
fn bfgs_follows_the_rosenbrock_valley() {
    let result = Bfgs::new(2000).minimize(&Rosenbrock, array![-1.2, 1.]).unwrap();

    assert!(close_to(&result.params, &array![1., 1.], 1e-2));
}

#[test]
fn conjugate_gradient_decreases_rosenbrock() {
    let x0 = array![-1.2, 1.];
    let start = Rosenbrock.value(x0.view()).unwrap();

    let result = ConjugateGradient::new(100).minimize(&Rosenbrock, x0).unwrap();

    assert!(result.cost < start);
    assert!(result.iterations <= 100);
}

#[test]
fn iteration_budget_is_respected() {
    let result = GradientDescent::new(1e-4, 3)
        .minimize(&quadratic(), Array1::zeros(3))
        .unwrap();

    assert!(!result.converged);
    assert_eq!(result.iterations, 3);
}

#[test]
fn already_optimal_start_takes_no_iterations() {
    let objective = quadratic();
    let result = ConjugateGradient::new(10)
        .minimize(&objective, objective.target.clone())
        .unwrap();

    assert!(result.converged);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.cost, 0.);
}

#[test]
fn objective_errors_are_propagated() {
    for kind in [
        OptimizerKind::ConjugateGradient,
        OptimizerKind::Bfgs,
        OptimizerKind::GradientDescent { learning_rate: 1. },
    ] {
        let err = kind.minimizer(10).minimize(&Failing, array![0.]).unwrap_err();
        assert!(matches!(err, MlErr::InvalidData(_)));
    }
}
