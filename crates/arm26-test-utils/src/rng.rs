//! Deterministic RNG utilities for reproducible tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use arm26_core::types::Action;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A reproducible action with entries in `[0, 1)`.
pub fn random_action(dim: usize, seed: u64) -> Action {
    let mut rng = seeded_rng(seed);
    (0..dim).map(|_| rng.r#gen::<f32>()).collect::<Vec<_>>().into()
}
