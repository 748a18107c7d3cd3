//! Frame buffer for storing rendered pixel data.
//!
//! [`FrameBuffer`] holds a single frame in row-major order, top row first,
//! with the channel layout given by its [`PixelFormat`].

use bevy::prelude::*;

use crate::config::{PixelFormat, RenderConfig};
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// FrameBuffer
// ---------------------------------------------------------------------------

/// A single rendered frame.
///
/// # Example
///
/// ```
/// use arm26_render::FrameBuffer;
/// use arm26_render::config::PixelFormat;
///
/// let buf = FrameBuffer::new(4, 2, PixelFormat::Rgb8);
/// assert_eq!(buf.width(), 4);
/// assert_eq!(buf.height(), 2);
/// assert_eq!(buf.shape(), (2, 4, 3));
/// assert_eq!(buf.data().len(), 4 * 2 * 3);
/// ```
#[derive(Resource, Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Create a zero-filled frame buffer.
    #[must_use]
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let byte_count = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            data: vec![0; byte_count],
        }
    }

    /// Create a frame buffer from a [`RenderConfig`].
    #[must_use]
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.width, config.height, config.format)
    }

    /// Wrap existing pixel data.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(RenderError::DataLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// `(height, width, channels)`, the layout of [`data`](Self::data).
    #[must_use]
    pub const fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.format.bytes_per_pixel(),
        )
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Channel bytes of the pixel at `(x, y)`, or `None` if out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        let offset = self.offset(x, y)?;
        Some(&self.data[offset..offset + self.format.bytes_per_pixel()])
    }

    /// Overwrite the pixel at `(x, y)` with an RGB colour. Out-of-bounds
    /// writes are ignored. RGBA buffers get full alpha.
    pub fn put_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let Some(offset) = self.offset(x, y) else {
            return;
        };
        self.data[offset..offset + 3].copy_from_slice(&rgb);
        if self.format == PixelFormat::Rgba8 {
            self.data[offset + 3] = u8::MAX;
        }
    }

    /// Blend an RGB colour over the pixel at `(x, y)` with coverage `alpha`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn blend_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3], alpha: f32) {
        let Some(offset) = self.offset(x, y) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        for (c, &src) in rgb.iter().enumerate() {
            let dst = f32::from(self.data[offset + c]);
            self.data[offset + c] = (dst + (f32::from(src) - dst) * a).round() as u8;
        }
        if self.format == PixelFormat::Rgba8 {
            self.data[offset + 3] = u8::MAX;
        }
    }

    /// Fill the whole frame with one colour.
    pub fn fill(&mut self, rgb: [u8; 3]) {
        let bpp = self.format.bytes_per_pixel();
        for px in self.data.chunks_exact_mut(bpp) {
            px[..3].copy_from_slice(&rgb);
            if bpp == 4 {
                px[3] = u8::MAX;
            }
        }
    }

    /// Copy of the frame as tightly packed RGBA8.
    #[must_use]
    pub fn to_rgba(&self) -> Vec<u8> {
        match self.format {
            PixelFormat::Rgba8 => self.data.clone(),
            PixelFormat::Rgb8 => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], u8::MAX])
                .collect(),
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        Some(idx * self.format.bytes_per_pixel())
    }
}
