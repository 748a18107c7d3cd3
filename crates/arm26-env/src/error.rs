use arm26_core::error::{ConfigError, ToleranceError, ValidationError};
use arm26_domain_rand::ranges::RangeError;
use arm26_physics::PhysicsError;
use thiserror::Error;

/// Errors surfaced by [`Environment`](crate::Environment) and tasks.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid action: {0}")]
    Action(#[from] ValidationError),

    #[error("Reward error: {0}")]
    Reward(#[from] ToleranceError),

    #[error("Randomization error: {0}")]
    Randomization(#[from] RangeError),
}
