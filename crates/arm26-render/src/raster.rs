//! Anti-aliased primitive rasterization into a [`FrameBuffer`].
//!
//! Every primitive is a distance field: a pixel's coverage is
//! `clamp(radius - distance + 0.5, 0, 1)`, evaluated at the pixel centre and
//! only inside the primitive's bounding box.

use nalgebra::Vector2;

use crate::buffer::FrameBuffer;

/// Radii below this are widened so thin shapes stay visible.
pub const MIN_RADIUS_PX: f64 = 0.75;

/// Convert a linear `[0, 1]` RGBA colour to 8-bit RGB.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn to_rgb8(rgba: [f32; 4]) -> [u8; 3] {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [c(rgba[0]), c(rgba[1]), c(rgba[2])]
}

/// Distance from `p` to the segment `a..b`.
#[must_use]
pub fn segment_distance(p: &Vector2<f64>, a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= f64::EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Stroke the segment `a..b` with half-width `radius`, all in pixels.
///
/// A filled capsule, a disc (`a == b`) and a thick line are all this call.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn capsule(
    frame: &mut FrameBuffer,
    a: &Vector2<f64>,
    b: &Vector2<f64>,
    radius: f64,
    rgb: [u8; 3],
    opacity: f32,
) {
    let r = radius.max(MIN_RADIUS_PX);
    let pad = r + 1.0;
    let x0 = (a.x.min(b.x) - pad).floor().max(0.0);
    let y0 = (a.y.min(b.y) - pad).floor().max(0.0);
    let x1 = (a.x.max(b.x) + pad).ceil().min(f64::from(frame.width()));
    let y1 = (a.y.max(b.y) + pad).ceil().min(f64::from(frame.height()));
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    for y in (y0 as u32)..(y1 as u32) {
        for x in (x0 as u32)..(x1 as u32) {
            let p = Vector2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let coverage = (r - segment_distance(&p, a, b) + 0.5).clamp(0.0, 1.0);
            if coverage > 0.0 {
                frame.blend_rgb(x, y, rgb, coverage as f32 * opacity);
            }
        }
    }
}

/// Filled disc.
pub fn disc(frame: &mut FrameBuffer, c: &Vector2<f64>, radius: f64, rgb: [u8; 3], opacity: f32) {
    capsule(frame, c, c, radius, rgb, opacity);
}

/// Connected line strip of the given half-width.
pub fn polyline(
    frame: &mut FrameBuffer,
    points: &[Vector2<f64>],
    half_width: f64,
    rgb: [u8; 3],
    opacity: f32,
) {
    for pair in points.windows(2) {
        capsule(frame, &pair[0], &pair[1], half_width, rgb, opacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PixelFormat;

    const RED: [u8; 3] = [255, 0, 0];

    #[test]
    fn segment_distance_cases() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(2.0, 0.0);
        assert!((segment_distance(&Vector2::new(1.0, 1.0), &a, &b) - 1.0).abs() < 1e-12);
        assert!((segment_distance(&Vector2::new(3.0, 0.0), &a, &b) - 1.0).abs() < 1e-12);
        assert!((segment_distance(&Vector2::new(5.0, 4.0), &a, &a) - 41f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn disc_covers_center_not_corner() {
        let mut buf = FrameBuffer::new(20, 20, PixelFormat::Rgb8);
        disc(&mut buf, &Vector2::new(10.0, 10.0), 4.0, RED, 1.0);
        assert_eq!(buf.pixel(10, 10), Some(&RED[..]));
        assert_eq!(buf.pixel(0, 0), Some(&[0, 0, 0][..]));
    }

    #[test]
    fn capsule_fills_along_axis() {
        let mut buf = FrameBuffer::new(40, 10, PixelFormat::Rgb8);
        capsule(
            &mut buf,
            &Vector2::new(5.0, 5.0),
            &Vector2::new(35.0, 5.0),
            2.0,
            RED,
            1.0,
        );
        for x in 5..35 {
            assert_eq!(buf.pixel(x, 4), Some(&RED[..]), "x = {x}");
        }
        assert_eq!(buf.pixel(20, 0), Some(&[0, 0, 0][..]));
    }

    #[test]
    fn offscreen_shape_is_noop() {
        let mut buf = FrameBuffer::new(10, 10, PixelFormat::Rgb8);
        disc(&mut buf, &Vector2::new(-50.0, -50.0), 3.0, RED, 1.0);
        assert!(buf.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn tiny_radius_still_visible() {
        let mut buf = FrameBuffer::new(10, 10, PixelFormat::Rgb8);
        disc(&mut buf, &Vector2::new(5.5, 5.5), 0.01, RED, 1.0);
        assert_ne!(buf.pixel(5, 5), Some(&[0, 0, 0][..]));
    }

    #[test]
    fn to_rgb8_clamps() {
        assert_eq!(to_rgb8([1.5, -0.2, 0.5, 1.0]), [255, 0, 128]);
    }
}
