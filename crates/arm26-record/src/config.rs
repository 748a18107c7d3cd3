//! Video output settings.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Frame rate and subsampling for a video.
///
/// The defaults write every second rendered frame at 60 fps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    /// Playback rate in frames per second.
    pub fps: u32,
    /// Keep one frame out of every `frame_stride`.
    pub frame_stride: usize,
}

impl VideoConfig {
    pub const DEFAULT_FPS: u32 = 60;
    pub const DEFAULT_STRIDE: usize = 2;

    #[must_use]
    pub const fn new(fps: u32, frame_stride: usize) -> Self {
        Self { fps, frame_stride }
    }

    pub const fn validate(&self) -> Result<(), RecordError> {
        if self.fps == 0 {
            return Err(RecordError::ZeroFps);
        }
        if self.frame_stride == 0 {
            return Err(RecordError::ZeroStride);
        }
        Ok(())
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FPS, Self::DEFAULT_STRIDE)
    }
}
