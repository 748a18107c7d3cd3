//! Shared test fixtures and utilities for Arm26 crates.
//!
//! Provides seeded RNGs, Bevy test apps with the core and physics plugins,
//! and rollout helpers that drive an [`Environment`](arm26_env::Environment)
//! to the end of an episode.

pub mod app;
pub mod episodes;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use app::{minimal_test_app, physics_test_app};
pub use episodes::{Rollout, RolloutError, rollout, rollout_with_frames};
pub use rng::{random_action, seeded_rng};
