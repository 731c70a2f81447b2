use std::fmt;

use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::Value;

use super::{NetworkConfig, Param};
use crate::{
    MlErr, Result,
    arch::{
        Architecture, CostFn,
        activations::{ActFn, NeuronKind},
        forward,
        labels::{self, TargetKind},
        params::{self, Thetas},
    },
};

/// The stages a network goes through while fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitState {
    Unconfigured,
    ArchitectureResolved,
    Initialized,
    Optimizing,
    Trained,
}

impl fmt::Display for FitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a successful fit leaves behind.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    arch: Architecture,
    params: Array1<f64>,
    neuron: NeuronKind,
    targets: TargetKind,
    cost: f64,
    iterations: usize,
    converged: bool,
}

impl TrainedModel {
    pub fn architecture(&self) -> &Architecture {
        &self.arch
    }

    /// The trained flat parameter vector.
    pub fn params(&self) -> ArrayView1<'_, f64> {
        self.params.view()
    }

    /// The trained weight matrices, one per pair of adjacent layers.
    pub fn thetas(&self) -> Result<Thetas> {
        params::unflatten(self.params.view(), &self.arch)
    }

    pub fn neuron(&self) -> NeuronKind {
        self.neuron
    }

    /// The class labels seen while fitting, `None` if the targets were not classes.
    pub fn classes(&self) -> Option<&[f64]> {
        match &self.targets {
            TargetKind::Classes(classes) => Some(classes),
            TargetKind::Values => None,
        }
    }

    /// The regularized cost at the trained parameters.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the optimizer stopped because the gradient vanished.
    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// A feed-forward neural network classifier.
///
/// The input and output layers are sized from the training data on every `fit`, only the hidden
/// layers are configured up front.
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    config: NetworkConfig,
    state: FitState,
    model: Option<TrainedModel>,
}

impl Default for NeuralNetwork {
    fn default() -> Self {
        Self {
            config: NetworkConfig::default(),
            state: FitState::Unconfigured,
            model: None,
        }
    }
}

impl NeuralNetwork {
    /// Creates a new untrained `NeuralNetwork`.
    ///
    /// # Arguments
    /// * `config` - The network's settings.
    ///
    /// # Returns
    /// An error if some setting is invalid.
    pub fn new(config: NetworkConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            ..Default::default()
        })
    }

    pub fn state(&self) -> FitState {
        self.state
    }

    /// The result of the last successful fit.
    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    pub fn get_params(&self) -> &NetworkConfig {
        &self.config
    }

    /// Changes some settings at once, either all of them or none.
    ///
    /// An existing model is kept, the new settings take effect on the next `fit`.
    ///
    /// # Arguments
    /// * `params` - The settings to change.
    pub fn set_params<I>(&mut self, params: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Param>,
    {
        let mut config = self.config.clone();
        for param in params {
            config.apply(param);
        }

        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Changes a single setting given by name.
    ///
    /// # Arguments
    /// * `name` - The setting's name, see `Param::from_json` for the accepted ones.
    /// * `value` - The new value.
    pub fn set_param(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        let param = Param::from_json(name, value)?;
        self.set_params([param])
    }

    /// Trains the network, replacing any previous model.
    ///
    /// # Arguments
    /// * `x` - The examples, one per row.
    /// * `y` - The target of every example.
    ///
    /// # Returns
    /// The trained network, or the first error found. A failed fit leaves no model behind.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<&mut Self> {
        self.model = None;
        self.transition(FitState::Unconfigured);

        match self.try_fit(x, y) {
            Ok(model) => {
                info!(
                    cost = model.cost,
                    iterations = model.iterations,
                    converged = model.converged;
                    "fit finished"
                );
                self.model = Some(model);
                self.transition(FitState::Trained);
                Ok(self)
            }
            Err(e) => {
                self.transition(FitState::Unconfigured);
                Err(e)
            }
        }
    }

    fn try_fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<TrainedModel> {
        if x.nrows() != y.len() {
            return Err(MlErr::ShapeMismatch {
                what: "examples",
                got: y.len(),
                expected: x.nrows(),
            });
        }

        if x.iter().any(|v| !v.is_finite()) {
            return Err(MlErr::InvalidData("features must be finite".into()));
        }

        let encoded = labels::encode(y)?;
        let arch = Architecture::resolve(
            &self.config.hidden_layers,
            x.ncols(),
            encoded.kind.outputs(),
        )?;

        info!(
            "fitting network: examples={} layers={:?} optimizer={}",
            x.nrows(),
            arch.sizes(),
            self.config.optimizer
        );
        self.transition(FitState::ArchitectureResolved);

        let mut rng = generate_rng(self.config.seed);
        let x0 = params::initialize(&arch, &mut rng)?;
        self.transition(FitState::Initialized);

        let neuron = self.config.neuron;
        let cost_fn = CostFn::new(
            &arch,
            x,
            encoded.matrix.view(),
            ActFn::from(neuron),
            self.config.regularization,
        )?;

        self.transition(FitState::Optimizing);
        let minimizer = self.config.optimizer.minimizer(self.config.max_iterations);
        let result = minimizer.minimize(&cost_fn, x0)?;

        Ok(TrainedModel {
            arch,
            params: result.params,
            neuron,
            targets: encoded.kind,
            cost: result.cost,
            iterations: result.iterations,
            converged: result.converged,
        })
    }

    /// Computes the output layer's activation for some examples.
    ///
    /// # Arguments
    /// * `x` - The examples, one per row.
    ///
    /// # Returns
    /// A `(m, outputs)` matrix. With two classes the single column is the probability of the
    /// greater label.
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        Ok(self.hypothesis(x)?.reversed_axes())
    }

    /// Predicts the target of some examples.
    ///
    /// # Arguments
    /// * `x` - The examples, one per row.
    ///
    /// # Returns
    /// One label per example, taken from the labels seen while fitting. Networks fitted on
    /// non class targets return their raw output.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        let model = self.model.as_ref().ok_or(MlErr::NotTrained)?;
        let h = self.hypothesis(x)?;

        let labels: Array1<f64> = match &model.targets {
            TargetKind::Classes(classes) if classes.len() == 2 => {
                h.row(0).mapv(|p| if p >= 0.5 { classes[1] } else { classes[0] })
            }
            TargetKind::Classes(classes) => h
                .axis_iter(Axis(1))
                .map(|outputs| classes[argmax(outputs)])
                .collect(),
            TargetKind::Values => h.row(0).to_owned(),
        };

        Ok(labels)
    }

    fn hypothesis(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let model = self.model.as_ref().ok_or(MlErr::NotTrained)?;
        let thetas = model.thetas()?;
        let pass = forward(&thetas, x, &ActFn::from(model.neuron))?;
        Ok(pass.hypothesis)
    }

    fn transition(&mut self, to: FitState) {
        if self.state != to {
            debug!("state transition: {} -> {}", self.state, to);
        }
        self.state = to;
    }
}

/// The index of the greatest value, the first one on ties.
fn argmax(values: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Generates a random number generator given (or not) a seed.
fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
