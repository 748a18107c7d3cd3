use thiserror::Error;

/// Errors raised while loading or stepping the physics model.
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Model parse error in {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("No {kind} named '{name}' in model")]
    UnknownName { kind: &'static str, name: String },

    #[error("Control vector has {got} entries, model has {expected} actuators")]
    ControlSize { expected: usize, got: usize },

    #[error("Simulation diverged at t={time:.4}s (non-finite state)")]
    Diverged { time: f64 },

    #[error("Mass matrix is singular")]
    SingularMassMatrix,
}

impl PhysicsError {
    pub(crate) fn unknown(kind: &'static str, name: &str) -> Self {
        Self::UnknownName {
            kind,
            name: name.to_owned(),
        }
    }
}
