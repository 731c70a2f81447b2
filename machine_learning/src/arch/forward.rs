use ndarray::{Array2, ArrayView2, Axis, concatenate, s};

use super::activations::{Activation, Sigmoid};
use crate::{MlErr, Result};

/// What gets nudged into hypothesis values sitting exactly on 0 or 1, keeping the logarithms
/// of the cost finite.
pub const HYPOTHESIS_EPSILON: f64 = 1e-9;

/// The outputs of a forward pass through the network.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    /// The output layer's activation, `(outputs, m)`.
    pub hypothesis: Array2<f64>,
    /// The bias-augmented activation of every layer but the output one, `(units + 1, m)`.
    pub activations: Vec<Array2<f64>>,
    /// The pre-activations of every hidden layer, `(units, m)`.
    pub stimuli: Vec<Array2<f64>>,
    /// The sum of the squared non-bias weights of every layer.
    pub reg: f64,
}

/// Prepends a row of ones to `a`.
fn with_bias(a: ArrayView2<f64>) -> Result<Array2<f64>> {
    let ones = Array2::ones((1, a.ncols()));
    Ok(concatenate(Axis(0), &[ones.view(), a])?)
}

/// Feeds the examples forward through the network.
///
/// Hidden layers fire with `neuron`, the output layer always fires with the logistic function.
///
/// # Arguments
/// * `thetas` - The weight matrices of the network.
/// * `x` - The examples, one per row.
/// * `neuron` - The activation of the hidden layers.
///
/// # Returns
/// The hypothesis alongside what the backward pass needs, or an error if the amount of
/// features doesn't match the input layer.
pub fn forward<A: Activation>(
    thetas: &[Array2<f64>],
    x: ArrayView2<f64>,
    neuron: &A,
) -> Result<ForwardPass> {
    let Some(first) = thetas.first() else {
        return Err(MlErr::ShapeMismatch {
            what: "layers",
            got: 0,
            expected: 1,
        });
    };

    if x.ncols() + 1 != first.ncols() {
        return Err(MlErr::ShapeMismatch {
            what: "features",
            got: x.ncols(),
            expected: first.ncols() - 1,
        });
    }

    let nlayers = thetas.len();
    let mut activations = Vec::with_capacity(nlayers);
    let mut stimuli = Vec::with_capacity(nlayers - 1);
    let mut reg = 0.;

    activations.push(with_bias(x.t())?);

    for (l, theta) in thetas[..nlayers - 1].iter().enumerate() {
        reg += theta.slice(s![.., 1..]).iter().map(|w| w * w).sum::<f64>();

        let z = theta.dot(&activations[l]);
        activations.push(with_bias(neuron.fire(z.view()).view())?);
        stimuli.push(z);
    }

    let last = &thetas[nlayers - 1];
    reg += last.slice(s![.., 1..]).iter().map(|w| w * w).sum::<f64>();

    let z = last.dot(&activations[nlayers - 1]);
    let mut hypothesis = Sigmoid::new().fire(z.view());

    // Only exact bounds are moved, values close to them are left alone.
    hypothesis.mapv_inplace(|h| {
        if h == 1. {
            1. - HYPOTHESIS_EPSILON
        } else if h == 0. {
            HYPOTHESIS_EPSILON
        } else {
            h
        }
    });

    Ok(ForwardPass {
        hypothesis,
        activations,
        stimuli,
        reg,
    })
}
