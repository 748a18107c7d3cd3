use arm26_core::error::ConfigError;
use arm26_env::EnvError;
use thiserror::Error;

/// Errors from loading a task.
#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("Level '{name}' does not exist in domain arm26.")]
    UnknownTask { name: String },

    #[error("Invalid task arguments: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Env(#[from] EnvError),
}

impl From<arm26_physics::PhysicsError> for SuiteError {
    fn from(err: arm26_physics::PhysicsError) -> Self {
        Self::Env(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_task_names_the_task() {
        let err = SuiteError::UnknownTask {
            name: "nope".into(),
        };
        assert_eq!(err.to_string(), "Level 'nope' does not exist in domain arm26.");
    }
}
