use std::collections::BTreeMap;

use crate::{MlErr, Result};

/// The hidden layers requested by the user, hidden-layer index (starting at 1) to unit count.
///
/// The input and output layers are not part of it, they are resolved from the training data
/// when fitting.
pub type HiddenLayers = BTreeMap<usize, usize>;

/// Checks that the hidden layer indices form the contiguous range `1..=n` and no layer is empty.
pub fn validate_hidden_layers(hidden: &HiddenLayers) -> Result<()> {
    for (expected, (&index, &units)) in (1..).zip(hidden) {
        if index != expected {
            return Err(MlErr::InvalidArchitecture(format!(
                "hidden layer indices must be contiguous starting at 1, found {index} where {expected} was expected"
            )));
        }

        if units == 0 {
            return Err(MlErr::InvalidArchitecture(format!(
                "hidden layer {index} has no units"
            )));
        }
    }

    Ok(())
}

/// The full, resolved layer layout of a network.
///
/// Layer 0 is the input layer and the last one is the output layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Architecture {
    sizes: Vec<usize>,
}

impl Architecture {
    /// Creates a new `Architecture` from every layer's unit count, input and output included.
    ///
    /// # Arguments
    /// * `sizes` - The amount of units of each layer.
    ///
    /// # Returns
    /// An error if there are less than two layers or some layer has no units.
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        if sizes.len() < 2 {
            return Err(MlErr::InvalidArchitecture(format!(
                "a network needs at least an input and an output layer, got {} layers",
                sizes.len()
            )));
        }

        if let Some(layer) = sizes.iter().position(|&units| units == 0) {
            return Err(MlErr::InvalidArchitecture(format!(
                "layer {layer} has no units"
            )));
        }

        Ok(Self { sizes })
    }

    /// Resolves the full architecture from the requested hidden layers and the data shape.
    ///
    /// # Arguments
    /// * `hidden` - The requested hidden layers.
    /// * `inputs` - The amount of features of the training data.
    /// * `outputs` - The amount of output units.
    pub fn resolve(hidden: &HiddenLayers, inputs: usize, outputs: usize) -> Result<Self> {
        validate_hidden_layers(hidden)?;

        let sizes = std::iter::once(inputs)
            .chain(hidden.values().copied())
            .chain(std::iter::once(outputs))
            .collect();

        Self::new(sizes)
    }

    /// The unit count of every layer.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// The amount of weight matrices, one between each pair of adjacent layers.
    pub fn num_layers(&self) -> usize {
        self.sizes.len() - 1
    }

    pub fn inputs(&self) -> usize {
        self.sizes[0]
    }

    pub fn outputs(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// The shape of each weight matrix, `(units_next, units_current + 1)`.
    pub fn theta_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sizes.windows(2).map(|w| (w[1], w[0] + 1))
    }

    /// Returns the size of the flat parameter vector.
    ///
    /// # Returns
    /// The amount of parameters, bias weights included.
    pub fn size(&self) -> usize {
        self.theta_shapes().map(|(rows, cols)| rows * cols).sum()
    }
}
