//! Headless software rendering of the planar arm.
//!
//! - [`RenderConfig`]: resolution, pixel format and camera index
//! - [`FrameBuffer`]: one frame of raw pixel data, `(height, width, channels)`
//! - [`Renderer`]: draws a [`Physics`](arm26_physics::Physics) state into a
//!   new [`FrameBuffer`]
//!
//! Cameras are orthographic and look down the world z axis; see
//! [`camera::Projection`].
//!
//! # Example
//!
//! ```no_run
//! use arm26_physics::Physics;
//! use arm26_render::prelude::*;
//!
//! let physics = Physics::arm26().unwrap();
//! let frame = Renderer::new(RenderConfig::new(320, 240)).render(&physics).unwrap();
//! assert_eq!(frame.data().len(), 320 * 240 * 3);
//! ```

pub mod buffer;
pub mod camera;
pub mod config;
pub mod error;
pub mod raster;
pub mod renderer;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use buffer::FrameBuffer;
pub use config::RenderConfig;
pub use error::RenderError;
pub use renderer::{Renderer, render};

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        FrameBuffer, RenderConfig, RenderError, Renderer,
        camera::Projection,
        config::PixelFormat,
    };
}
