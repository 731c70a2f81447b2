use ndarray::{Array1, ArrayView1, ArrayView2};

use super::{Architecture, activations::Activation, backward::backward, forward, params};
use crate::{MlErr, Result, optimization::Objective};

/// The regularized cross-entropy cost of a network over a fixed training set, and its gradient.
///
/// This is what the optimizers repeatedly evaluate: each call reshapes the flat parameters,
/// feeds the examples forward, measures the cost and propagates the error back.
pub struct CostFn<'a, A: Activation> {
    arch: &'a Architecture,
    x: ArrayView2<'a, f64>,
    y: ArrayView2<'a, f64>,
    neuron: A,
    lambda: f64,
}

impl<'a, A: Activation> CostFn<'a, A> {
    /// Creates a new `CostFn`.
    ///
    /// # Arguments
    /// * `arch` - The architecture of the network.
    /// * `x` - The examples, `(m, inputs)`.
    /// * `y` - The encoded targets, `(outputs, m)`.
    /// * `neuron` - The activation of the hidden layers.
    /// * `lambda` - The regularization strength.
    ///
    /// # Returns
    /// An error if the shape of the data doesn't match the architecture.
    pub fn new(
        arch: &'a Architecture,
        x: ArrayView2<'a, f64>,
        y: ArrayView2<'a, f64>,
        neuron: A,
        lambda: f64,
    ) -> Result<Self> {
        if x.ncols() != arch.inputs() {
            return Err(MlErr::ShapeMismatch {
                what: "features",
                got: x.ncols(),
                expected: arch.inputs(),
            });
        }

        if y.nrows() != arch.outputs() {
            return Err(MlErr::ShapeMismatch {
                what: "target rows",
                got: y.nrows(),
                expected: arch.outputs(),
            });
        }

        if y.ncols() != x.nrows() {
            return Err(MlErr::ShapeMismatch {
                what: "examples",
                got: y.ncols(),
                expected: x.nrows(),
            });
        }

        if x.nrows() == 0 {
            return Err(MlErr::InvalidData("there are no examples".into()));
        }

        Ok(Self {
            arch,
            x,
            y,
            neuron,
            lambda,
        })
    }

    /// The cost alone, without running the backward pass.
    pub fn cost(&self, params: ArrayView1<f64>) -> Result<f64> {
        let thetas = params::unflatten(params, self.arch)?;
        let pass = forward::forward(&thetas, self.x, &self.neuron)?;
        Ok(self.regularized_cost(&pass))
    }

    /// The cost and its gradient with respect to every parameter.
    pub fn cost_and_gradient(&self, params: ArrayView1<f64>) -> Result<(f64, Array1<f64>)> {
        let thetas = params::unflatten(params, self.arch)?;
        let pass = forward::forward(&thetas, self.x, &self.neuron)?;
        let cost = self.regularized_cost(&pass);
        let grad = backward(&thetas, &pass, self.y, &self.neuron, self.lambda)?;

        Ok((cost, grad))
    }

    fn regularized_cost(&self, pass: &forward::ForwardPass) -> f64 {
        let m = self.y.ncols() as f64;
        let cross_entropy: f64 = pass
            .hypothesis
            .iter()
            .zip(self.y.iter())
            .map(|(&h, &y)| -y * h.ln() - (1. - y) * (1. - h).ln())
            .sum();

        (cross_entropy + self.lambda * 0.5 * pass.reg) / m
    }
}

impl<A: Activation> Objective for CostFn<'_, A> {
    fn size(&self) -> usize {
        self.arch.size()
    }

    fn evaluate(&self, params: ArrayView1<f64>) -> Result<(f64, Array1<f64>)> {
        self.cost_and_gradient(params)
    }

    fn value(&self, params: ArrayView1<f64>) -> Result<f64> {
        self.cost(params)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::arch::activations::ActFn;

    #[test]
    fn zero_weights_cost_ln_two_per_output() {
        let arch = Architecture::new(vec![2, 3, 2]).unwrap();
        let x = array![[1., 2.], [3., 4.], [5., 6.]];
        let y = array![[1., 0., 0.], [0., 1., 1.]];
        let cost_fn = CostFn::new(&arch, x.view(), y.view(), ActFn::sigmoid(), 1.).unwrap();

        let params = Array1::zeros(arch.size());
        let cost = cost_fn.cost(params.view()).unwrap();

        assert!((cost - 2. * 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn regularization_adds_half_lambda_squared_weights() {
        let arch = Architecture::new(vec![1, 1]).unwrap();
        let x = array![[0.]];
        let y = array![[1.]];
        // h = sigmoid(0) = 0.5 regardless of the non-bias weight.
        let params = array![0., 3.];

        let plain = CostFn::new(&arch, x.view(), y.view(), ActFn::sigmoid(), 0.).unwrap();
        let regularized = CostFn::new(&arch, x.view(), y.view(), ActFn::sigmoid(), 2.).unwrap();

        let diff = regularized.cost(params.view()).unwrap() - plain.cost(params.view()).unwrap();
        assert!((diff - 0.5 * 2. * 9.).abs() < 1e-12);
    }

    #[test]
    fn saturated_hypothesis_keeps_the_cost_finite() {
        let arch = Architecture::new(vec![1, 1]).unwrap();
        // h is exactly 1 for the first example and exactly 0 for the second, both wrong.
        let x = array![[40.], [-800.]];
        let y = array![[0., 1.]];
        let cost_fn = CostFn::new(&arch, x.view(), y.view(), ActFn::sigmoid(), 0.).unwrap();

        let (cost, grad) = cost_fn.cost_and_gradient(array![0., 1.].view()).unwrap();

        assert!(cost.is_finite());
        assert!(grad.iter().all(|g| g.is_finite()));
        assert!((cost - -(1e-9f64).ln()).abs() < 1e-6);
    }

    #[test]
    fn evaluate_matches_cost() {
        let arch = Architecture::new(vec![2, 4, 3]).unwrap();
        let x = Array2::from_shape_fn((5, 2), |(i, j)| (i as f64 - 2.) * (j as f64 + 0.5));
        let y = crate::arch::labels::one_hot(&[0, 1, 2, 1, 0], 3).unwrap();
        let cost_fn = CostFn::new(&arch, x.view(), y.view(), ActFn::tanh(), 0.3).unwrap();
        let params = params::initialize(&arch, &mut StdRng::seed_from_u64(3)).unwrap();
        let params = params.view();

        let (cost, grad) = cost_fn.evaluate(params).unwrap();

        assert_eq!(cost, cost_fn.value(params).unwrap());
        assert_eq!(grad.len(), cost_fn.size());
    }

    #[test]
    fn mismatched_data_fails() {
        let arch = Architecture::new(vec![2, 1]).unwrap();
        let x = Array2::zeros((3, 2));

        let y = Array2::zeros((2, 3));
        assert!(CostFn::new(&arch, x.view(), y.view(), ActFn::sigmoid(), 0.).is_err());

        let y = Array2::zeros((1, 4));
        assert!(CostFn::new(&arch, x.view(), y.view(), ActFn::sigmoid(), 0.).is_err());

        let y = Array2::zeros((1, 3));
        let cost_fn = CostFn::new(&arch, x.view(), y.view(), ActFn::sigmoid(), 0.).unwrap();
        assert!(matches!(
            cost_fn.cost(Array1::zeros(2).view()),
            Err(MlErr::ShapeMismatch { what: "parameter vector", got: 2, expected: 3 })
        ));
    }
}
