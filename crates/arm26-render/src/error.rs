use arm26_physics::PhysicsError;
use thiserror::Error;

/// Errors raised while rendering a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Camera id {id} out of range (model has {count} cameras)")]
    UnknownCamera { id: usize, count: usize },

    #[error("Invalid frame size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Frame data length {got} does not match expected {expected}")]
    DataLength { expected: usize, got: usize },

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),
}
