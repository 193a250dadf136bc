//! The synthetic datasets every worker registers alongside its MNIST subset.

use ndarray::{Array2, arr2};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use super::dataset::TensorDataset;
use crate::error::Result;

/// Four fixed 2-D points with binary labels.
pub fn vectors() -> Result<TensorDataset> {
    let data = arr2(&[[-1.0, 2.0], [0.0, 1.1], [-1.0, 2.1], [0.0, 1.2]]);
    let targets = arr2(&[[1.0], [0.0], [1.0], [0.0]]);
    TensorDataset::new(data, targets)
}

/// The XOR truth table.
pub fn xor() -> Result<TensorDataset> {
    let data = arr2(&[[0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
    let targets = arr2(&[[1.0], [1.0], [0.0], [0.0]]);
    TensorDataset::new(data, targets)
}

const COMPONENT_MEANS: [[f32; 2]; 2] = [[-1.0, -1.0], [1.0, 1.0]];
const COMPONENT_STD: f32 = 0.3;

/// Samples a two-component 2-D Gaussian mixture.
///
/// The first half of the rows comes from the component at `(-1, -1)`, the
/// rest from the one at `(1, 1)`; the target is the component index.
pub fn gaussian_mixture<R: Rng>(nr_samples: usize, rng: &mut R) -> Result<TensorDataset> {
    let mut data = Vec::with_capacity(nr_samples * 2);
    let mut targets = Vec::with_capacity(nr_samples);

    let first_half = nr_samples / 2;
    for (component, mean) in COMPONENT_MEANS.iter().enumerate() {
        let count = if component == 0 {
            first_half
        } else {
            nr_samples - first_half
        };

        for _ in 0..count {
            for &m in mean {
                let noise: f32 = StandardNormal.sample(rng);
                data.push(m + COMPONENT_STD * noise);
            }
            targets.push(component as f32);
        }
    }

    let data = Array2::from_shape_vec((nr_samples, 2), data)?;
    let targets = Array2::from_shape_vec((nr_samples, 1), targets)?;
    TensorDataset::new(data, targets)
}
