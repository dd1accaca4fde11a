//! Seeded tensor sampling shared by the shape generators.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::tensor::Tensor;

/// Builds the single random source every generator of a benchmark draws from.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Integer tensor with values uniform in `[low, high)`.
pub(crate) fn random_ints(rng: &mut dyn RngCore, shape: Vec<usize>, low: i64, high: i64) -> Tensor {
    let len = shape.iter().product();
    let high = high.max(low + 1);
    let values = (0..len).map(|_| rng.gen_range(low..high)).collect();
    Tensor::from_i64(shape, values)
}

/// Float tensor with values uniform in `[low, high)`.
pub(crate) fn random_floats(
    rng: &mut dyn RngCore,
    shape: Vec<usize>,
    low: f32,
    high: f32,
) -> Tensor {
    let len = shape.iter().product();
    let values = (0..len).map(|_| rng.gen_range(low..high)).collect();
    Tensor::from_f32(shape, values)
}
