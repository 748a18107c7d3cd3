use std::path::PathBuf;

use thiserror::Error;

/// Errors from writing videos or snapshots.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Frame rate must be positive")]
    ZeroFps,

    #[error("Frame stride must be positive")]
    ZeroStride,

    #[error("Frame is {got:?} but the video is {expected:?} (width, height)")]
    FrameSize {
        expected: (u32, u32),
        got: (u32, u32),
    },

    #[error("Refusing to write an empty video to {0}")]
    NoFrames(PathBuf),
}

impl RecordError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
