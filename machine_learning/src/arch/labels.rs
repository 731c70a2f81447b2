use ndarray::{Array2, ArrayView1, Axis};

use crate::{MlErr, Result};

/// Maps integer class labels into standard basis vectors.
///
/// # Arguments
/// * `labels` - The class index of every example, each one lower than `classes`.
/// * `classes` - The amount of classes.
///
/// # Returns
/// A `(classes, m)` matrix whose `i`-th column is the basis vector for `labels[i]`.
pub fn one_hot(labels: &[usize], classes: usize) -> Result<Array2<f64>> {
    let mut encoded = Array2::zeros((classes, labels.len()));

    for (i, &label) in labels.iter().enumerate() {
        if label >= classes {
            return Err(MlErr::InvalidData(format!(
                "label {label} out of range for {classes} classes"
            )));
        }

        encoded[[label, i]] = 1.;
    }

    Ok(encoded)
}

/// How the targets of a training set were interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetKind {
    /// Discrete class labels, sorted ascending. The position of a label is its class index.
    Classes(Vec<f64>),
    /// Targets that are not class labels, used by the network as they come.
    Values,
}

impl TargetKind {
    /// The amount of units the output layer needs for these targets.
    pub fn outputs(&self) -> usize {
        match self {
            TargetKind::Classes(classes) if classes.len() > 2 => classes.len(),
            _ => 1,
        }
    }
}

/// Targets ready to be compared against the network's hypothesis.
#[derive(Debug, Clone)]
pub struct EncodedTargets {
    pub kind: TargetKind,
    /// A `(outputs, m)` matrix.
    pub matrix: Array2<f64>,
}

/// Encodes the targets of a training set.
///
/// Targets that are all whole numbers are treated as class labels: two classes become a single
/// row of zeros and ones, more than two are one-hot encoded. Anything else passes through
/// unchanged as a single row.
///
/// # Arguments
/// * `targets` - One target per example.
///
/// # Returns
/// The encoded targets, or an error if they are empty, not finite or hold a single class.
pub fn encode(targets: ArrayView1<f64>) -> Result<EncodedTargets> {
    if targets.is_empty() {
        return Err(MlErr::InvalidData("there are no targets".into()));
    }

    if targets.iter().any(|y| !y.is_finite()) {
        return Err(MlErr::InvalidData("targets must be finite".into()));
    }

    if !targets.iter().all(|y| y.fract() == 0.) {
        let matrix = targets.to_owned().insert_axis(Axis(0));
        return Ok(EncodedTargets {
            kind: TargetKind::Values,
            matrix,
        });
    }

    let mut classes = targets.to_vec();
    classes.sort_by(f64::total_cmp);
    classes.dedup();

    if classes.len() < 2 {
        return Err(MlErr::InvalidData(format!(
            "classification needs at least two classes, got {}",
            classes.len()
        )));
    }

    let indices: Vec<usize> = targets
        .iter()
        .map(|y| classes.partition_point(|c| c < y))
        .collect();

    let matrix = if classes.len() == 2 {
        Array2::from_shape_fn((1, indices.len()), |(_, i)| indices[i] as f64)
    } else {
        one_hot(&indices, classes.len())?
    };

    Ok(EncodedTargets {
        kind: TargetKind::Classes(classes),
        matrix,
    })
}
