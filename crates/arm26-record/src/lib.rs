//! `arm26-record`: writes rendered frames to disk.
//!
//! [`VideoWriter`] produces an animated GIF per output file; [`save_png`]
//! stores a single frame. Both take [`FrameBuffer`](arm26_render::FrameBuffer)s
//! from `arm26-render`.
//!
//! # Example
//!
//! ```no_run
//! use arm26_record::prelude::*;
//! # let frames: Vec<arm26_render::FrameBuffer> = Vec::new();
//!
//! let written = write_video("SF.gif", &frames, &VideoConfig::default()).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod video;

pub use config::VideoConfig;
pub use error::RecordError;
pub use video::{VideoWriter, save_png, subsample, write_video};

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{RecordError, VideoConfig, VideoWriter, save_png, subsample, write_video};
}
