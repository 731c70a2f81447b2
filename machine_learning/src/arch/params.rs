//! Conversion between the flat parameter vector handed to the optimizers and the per-layer
//! weight matrices used by the forward and backward passes.
//!
//! The layout is canonical: matrices are stored in ascending layer order and each one is
//! laid out column-major, so the first `units_next` values of a layer are its bias weights.

use ndarray::{Array1, Array2, ArrayView1, ShapeBuilder, s};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Uniform;

use super::Architecture;
use crate::{MlErr, Result};

/// The weight matrices of a network, `thetas[l]` maps layer `l` into layer `l + 1`.
pub type Thetas = Vec<Array2<f64>>;

/// Concatenates every weight matrix, column-major, into a single vector.
///
/// # Arguments
/// * `thetas` - The weight matrices in layer order.
///
/// # Returns
/// The flat parameter vector.
pub fn flatten(thetas: &[Array2<f64>]) -> Array1<f64> {
    let size = thetas.iter().map(|theta| theta.len()).sum();
    let mut params = Vec::with_capacity(size);

    for theta in thetas {
        // Row-major iteration over the transpose is column-major over `theta`.
        params.extend(theta.t().iter().copied());
    }

    Array1::from_vec(params)
}

/// Slices a flat parameter vector into the weight matrices of `arch`.
///
/// # Arguments
/// * `params` - The flat parameter vector.
/// * `arch` - The architecture the parameters belong to.
///
/// # Returns
/// The weight matrices, or a `ShapeMismatch` if the vector's length doesn't match the
/// architecture's size.
pub fn unflatten(params: ArrayView1<f64>, arch: &Architecture) -> Result<Thetas> {
    let expected = arch.size();
    if params.len() != expected {
        return Err(MlErr::ShapeMismatch {
            what: "parameter vector",
            got: params.len(),
            expected,
        });
    }

    let mut offset = 0;
    let mut thetas = Vec::with_capacity(arch.num_layers());

    for (rows, cols) in arch.theta_shapes() {
        let chunk = params.slice(s![offset..offset + rows * cols]);
        offset += rows * cols;
        thetas.push(Array2::from_shape_vec((rows, cols).f(), chunk.to_vec())?);
    }

    Ok(thetas)
}

/// Draws the initial weights of every layer uniformly in `[-r, r]`, with
/// `r = sqrt(6) / sqrt(units_current + units_next + 1)`, breaking the symmetry between units.
///
/// # Arguments
/// * `arch` - The architecture to initialize.
/// * `rng` - A random number generator.
///
/// # Returns
/// The flat initial parameter vector.
pub fn initialize<R: Rng>(arch: &Architecture, rng: &mut R) -> Result<Array1<f64>> {
    let mut thetas = Vec::with_capacity(arch.num_layers());

    for (units_next, cols) in arch.theta_shapes() {
        let units_current = cols - 1;
        let r = 6f64.sqrt() / ((units_current + units_next + 1) as f64).sqrt();
        let distribution = Uniform::new_inclusive(-r, r)?;

        thetas.push(Array2::random_using((units_next, cols), distribution, rng));
    }

    Ok(flatten(&thetas))
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn arch(sizes: &[usize]) -> Architecture {
        Architecture::new(sizes.to_vec()).unwrap()
    }

    #[test]
    fn flatten_is_column_major_in_layer_order() {
        let thetas = vec![array![[1., 2., 3.], [4., 5., 6.]], array![[7., 8., 9.]]];
        let params = flatten(&thetas);

        assert_eq!(params.to_vec(), [1., 4., 2., 5., 3., 6., 7., 8., 9.]);
    }

    #[test]
    fn unflatten_reshapes_each_layer() {
        let arch = arch(&[2, 2, 1]);
        let params: Array1<f64> = (1..=9).map(f64::from).collect();

        let thetas = unflatten(params.view(), &arch).unwrap();

        assert_eq!(thetas.len(), 2);
        assert_eq!(thetas[0], array![[1., 3., 5.], [2., 4., 6.]]);
        assert_eq!(thetas[1], array![[7., 8., 9.]]);
    }

    #[test]
    fn round_trip_is_exact() {
        let mut rng = StdRng::seed_from_u64(42);

        for sizes in [&[2, 3, 2][..], &[4, 1], &[3, 5, 4, 3], &[1, 1, 1, 1, 1]] {
            let arch = arch(sizes);
            let params = initialize(&arch, &mut rng).unwrap();

            let thetas = unflatten(params.view(), &arch).unwrap();
            assert_eq!(flatten(&thetas), params);
        }
    }

    #[test]
    fn wrong_length_fails() {
        let arch = arch(&[2, 3, 2]);
        let size = arch.size();

        for len in [0, size - 1, size + 1] {
            let params = Array1::zeros(len);
            let err = unflatten(params.view(), &arch).unwrap_err();
            assert!(matches!(
                err,
                MlErr::ShapeMismatch { got, expected, .. } if got == len && expected == size
            ));
        }
    }

    #[test]
    fn initialization_is_bounded_and_seeded() {
        let arch = arch(&[2, 3, 2]);

        let a = initialize(&arch, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = initialize(&arch, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), arch.size());

        // Both layers have units_current + units_next + 1 == 6, so r == 1.
        assert!(a.iter().all(|w| w.abs() <= 1.));
        assert!(a.iter().any(|&w| w != 0.));
    }
}
