use ndarray::{Array2, ArrayView2};

/// The capability every neuron kind exposes: firing on a stimulus and the derivative of
/// that firing, both element-wise.
pub trait Activation {
    /// The activation applied to a single pre-activation value.
    fn f(&self, z: f64) -> f64;

    /// The derivative of `f` evaluated at the pre-activation value `z`.
    fn df(&self, z: f64) -> f64;

    /// Fires a whole layer of neurons.
    ///
    /// # Arguments
    /// * `stimuli` - The pre-activations of a layer, one column per example.
    ///
    /// # Returns
    /// An array of the same shape as `stimuli`.
    fn fire(&self, stimuli: ArrayView2<f64>) -> Array2<f64> {
        stimuli.mapv(|z| self.f(z))
    }

    /// Derivative of `fire` for a whole layer of neurons.
    fn dfire(&self, stimuli: ArrayView2<f64>) -> Array2<f64> {
        stimuli.mapv(|z| self.df(z))
    }
}
