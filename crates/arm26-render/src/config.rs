//! Render configuration types.
//!
//! [`RenderConfig`] defines the resolution and pixel format of rendered
//! frames and which model camera to render from.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PixelFormat
// ---------------------------------------------------------------------------

/// Pixel storage format for rendered frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// 3 bytes per pixel (red, green, blue).
    #[default]
    Rgb8,
    /// 4 bytes per pixel (red, green, blue, alpha).
    Rgba8,
}

impl PixelFormat {
    /// Number of bytes per pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// RenderConfig
// ---------------------------------------------------------------------------

/// Frame size, format and camera selection.
///
/// # Example
///
/// ```
/// use arm26_render::RenderConfig;
/// use arm26_render::config::PixelFormat;
///
/// let config = RenderConfig::new(320, 240).with_format(PixelFormat::Rgba8);
///
/// assert_eq!(config.width, 320);
/// assert_eq!(config.height, 240);
/// assert_eq!(config.frame_byte_count(), 320 * 240 * 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel storage format.
    pub format: PixelFormat,
    /// Index of the model camera to render from.
    pub camera_id: usize,
}

impl RenderConfig {
    /// Create a render config with the given resolution, RGB8 and camera 0.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Rgb8,
            camera_id: 0,
        }
    }

    /// Set the pixel format.
    #[must_use]
    pub const fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the camera index.
    #[must_use]
    pub const fn with_camera(mut self, camera_id: usize) -> Self {
        self.camera_id = camera_id;
        self
    }

    /// Total number of bytes required for one frame.
    #[must_use]
    pub const fn frame_byte_count(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(320, 240)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_240_by_320_rgb() {
        let c = RenderConfig::default();
        assert_eq!((c.height, c.width), (240, 320));
        assert_eq!(c.format, PixelFormat::Rgb8);
        assert_eq!(c.camera_id, 0);
        assert_eq!(c.frame_byte_count(), 240 * 320 * 3);
    }

    #[test]
    fn builders() {
        let c = RenderConfig::new(8, 4)
            .with_format(PixelFormat::Rgba8)
            .with_camera(2);
        assert_eq!(c.format, PixelFormat::Rgba8);
        assert_eq!(c.camera_id, 2);
    }

    #[test]
    fn from_toml_partial() {
        let c: RenderConfig = toml::from_str("width = 64\nformat = \"rgba8\"\n").unwrap();
        assert_eq!(c.width, 64);
        assert_eq!(c.height, 240);
        assert_eq!(c.format, PixelFormat::Rgba8);
    }
}
