use std::{env, fs};

use anyhow::Context;
use log::info;
use machine_learning::{NetworkConfig, NeuralNetwork};
use ndarray::array;

/// Trains a network on the XOR truth table and prints its predictions.
///
/// An optional path to a JSON `NetworkConfig` overrides the default settings.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => {
            let raw = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?
        }
        None => NetworkConfig::default(),
    };

    info!("training xor with {config:?}");

    let x = array![[0., 0.], [0., 1.], [1., 0.], [1., 1.]];
    let y = array![0., 1., 1., 0.];

    let mut nn = NeuralNetwork::new(config)?;
    nn.fit(x.view(), y.view())?;

    let predicted = nn.predict(x.view())?;
    let proba = nn.predict_proba(x.view())?;

    for ((row, label), p) in x.rows().into_iter().zip(&predicted).zip(proba.column(0)) {
        println!("{} xor {} -> {label} (p = {p:.4})", row[0], row[1]);
    }

    if let Some(model) = nn.model() {
        println!(
            "cost = {:.6} after {} iterations (converged: {})",
            model.cost(),
            model.iterations(),
            model.converged()
        );
    }

    Ok(())
}
