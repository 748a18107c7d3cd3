//! Animated GIF output, one writer per file.
//!
//! A [`VideoWriter`] is opened with [`create`](VideoWriter::create), fed
//! frames with [`append`](VideoWriter::append), and closed with
//! [`finish`](VideoWriter::finish). Frames are buffered as RGBA and encoded
//! in one pass when the writer is finished.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use bevy::log::{debug, info};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbImage, RgbaImage};

use arm26_render::FrameBuffer;

use crate::config::VideoConfig;
use crate::error::RecordError;

/// Encoder effort, 1 (best, slowest) to 30.
const GIF_SPEED: i32 = 10;

/// Writes a sequence of equally sized frames to an animated GIF.
pub struct VideoWriter {
    path: PathBuf,
    file: File,
    fps: u32,
    size: Option<(u32, u32)>,
    frames: Vec<RgbaImage>,
}

impl VideoWriter {
    /// Create (truncate) the output file.
    pub fn create(path: impl AsRef<Path>, fps: u32) -> Result<Self, RecordError> {
        if fps == 0 {
            return Err(RecordError::ZeroFps);
        }
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| RecordError::io(&path, e))?;
        debug!("Opened video {}", path.display());
        Ok(Self {
            path,
            file,
            fps,
            size: None,
            frames: Vec::new(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// Number of frames appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Queue a frame. All frames must share the size of the first one.
    pub fn append(&mut self, frame: &FrameBuffer) -> Result<(), RecordError> {
        let got = (frame.width(), frame.height());
        let expected = *self.size.get_or_insert(got);
        if got != expected {
            return Err(RecordError::FrameSize { expected, got });
        }
        let image = RgbaImage::from_raw(got.0, got.1, frame.to_rgba())
            .ok_or(RecordError::FrameSize { expected, got })?;
        self.frames.push(image);
        Ok(())
    }

    /// Encode every queued frame, flush and close the file.
    ///
    /// Returns the number of frames written.
    pub fn finish(mut self) -> Result<usize, RecordError> {
        if self.frames.is_empty() {
            return Err(RecordError::NoFrames(self.path));
        }
        let delay = Delay::from_numer_denom_ms(1000, self.fps);
        let count = self.frames.len();

        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut bytes, GIF_SPEED);
            encoder.set_repeat(Repeat::Infinite)?;
            for image in self.frames.drain(..) {
                encoder.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
            }
        }

        self.file
            .write_all(&bytes)
            .and_then(|()| self.file.flush())
            .map_err(|e| RecordError::io(&self.path, e))?;
        info!(
            "Wrote {} ({count} frames, {} fps, {} bytes)",
            self.path.display(),
            self.fps,
            bytes.len()
        );
        Ok(count)
    }
}

/// Every `stride`-th frame, starting with the first.
pub fn subsample<T>(frames: &[T], stride: usize) -> Result<impl Iterator<Item = &T>, RecordError> {
    if stride == 0 {
        return Err(RecordError::ZeroStride);
    }
    Ok(frames.iter().step_by(stride))
}

/// Subsample `frames` and write them to `path` in one call.
///
/// Returns the number of frames written.
pub fn write_video(
    path: impl AsRef<Path>,
    frames: &[FrameBuffer],
    config: &VideoConfig,
) -> Result<usize, RecordError> {
    config.validate()?;
    let mut writer = VideoWriter::create(path, config.fps)?;
    for frame in subsample(frames, config.frame_stride)? {
        writer.append(frame)?;
    }
    writer.finish()
}

/// Save one frame as a PNG image.
pub fn save_png(path: impl AsRef<Path>, frame: &FrameBuffer) -> Result<(), RecordError> {
    let (w, h, c) = (frame.width(), frame.height(), frame.shape().2);
    let size_err = RecordError::FrameSize {
        expected: (w, h),
        got: (w, h),
    };
    if c == 3 {
        RgbImage::from_raw(w, h, frame.data().to_vec())
            .ok_or(size_err)?
            .save(path.as_ref())?;
    } else {
        RgbaImage::from_raw(w, h, frame.data().to_vec())
            .ok_or(size_err)?
            .save(path.as_ref())?;
    }
    debug!("Saved snapshot {}", path.as_ref().display());
    Ok(())
}
