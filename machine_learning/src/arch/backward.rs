use ndarray::{Array1, Array2, ArrayView2, s};

use super::{activations::Activation, forward::ForwardPass, params};
use crate::{MlErr, Result};

/// Propagates the output error back through the network.
///
/// # Arguments
/// * `thetas` - The weight matrices used for the forward pass.
/// * `pass` - The outputs of the forward pass.
/// * `targets` - The expected outputs, same shape as the hypothesis.
/// * `neuron` - The activation of the hidden layers.
/// * `lambda` - The regularization strength, never applied to bias weights.
///
/// # Returns
/// The gradient of the cost, laid out exactly like the parameter vector.
pub fn backward<A: Activation>(
    thetas: &[Array2<f64>],
    pass: &ForwardPass,
    targets: ArrayView2<f64>,
    neuron: &A,
    lambda: f64,
) -> Result<Array1<f64>> {
    if targets.dim() != pass.hypothesis.dim() {
        let (rows, cols) = pass.hypothesis.dim();
        return Err(MlErr::ShapeMismatch {
            what: "targets",
            got: targets.len(),
            expected: rows * cols,
        });
    }

    let m = targets.ncols() as f64;
    let nlayers = thetas.len();
    let mut grads = Vec::with_capacity(nlayers);
    let mut delta = &pass.hypothesis - &targets;

    for l in (0..nlayers).rev() {
        let theta = &thetas[l];

        let mut grad = delta.dot(&pass.activations[l].t()) / m;
        grad.slice_mut(s![.., 1..])
            .scaled_add(lambda / m, &theta.slice(s![.., 1..]));
        grads.push(grad);

        if l > 0 {
            // The bias unit has no inputs, its error is dropped.
            let back = theta.t().dot(&delta);
            delta =
                back.slice(s![1.., ..]).to_owned() * neuron.dfire(pass.stimuli[l - 1].view());
        }
    }

    grads.reverse();
    Ok(params::flatten(&grads))
}
