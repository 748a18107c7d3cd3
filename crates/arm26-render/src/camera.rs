//! Orthographic top-down projection from world to pixel coordinates.

use nalgebra::Vector2;

use arm26_physics::model::Camera;

/// Maps world `(x, y)` to continuous pixel coordinates, `y` pointing down.
///
/// The camera's `half_height` spans half the image height; width follows
/// from the aspect ratio so pixels stay square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    center: Vector2<f64>,
    scale: f64,
    half_w: f64,
    half_h: f64,
}

impl Projection {
    #[must_use]
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let half_h = f64::from(height) / 2.0;
        Self {
            center: camera.center,
            scale: half_h / camera.half_height,
            half_w: f64::from(width) / 2.0,
            half_h,
        }
    }

    /// Pixels per world unit.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// World point to pixel-space point.
    #[must_use]
    pub fn to_pixel(&self, world: &Vector2<f64>) -> Vector2<f64> {
        let d = world - self.center;
        Vector2::new(self.half_w + d.x * self.scale, self.half_h - d.y * self.scale)
    }

    /// Pixel-space point back to world coordinates.
    #[must_use]
    pub fn to_world(&self, pixel: &Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            (pixel.x - self.half_w) / self.scale + self.center.x,
            (self.half_h - pixel.y) / self.scale + self.center.y,
        )
    }

    /// World length to pixel length.
    #[must_use]
    pub fn length(&self, world: f64) -> f64 {
        world * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera {
            name: "fixed".into(),
            center: Vector2::new(0.5, -0.5),
            half_height: 1.0,
        }
    }

    #[test]
    fn center_maps_to_image_middle() {
        let p = Projection::new(&camera(), 320, 240);
        let px = p.to_pixel(&Vector2::new(0.5, -0.5));
        assert!((px.x - 160.0).abs() < 1e-12);
        assert!((px.y - 120.0).abs() < 1e-12);
    }

    #[test]
    fn world_up_is_image_up() {
        let p = Projection::new(&camera(), 320, 240);
        let px = p.to_pixel(&Vector2::new(0.5, 0.5));
        assert!((px.y - 0.0).abs() < 1e-12);
        assert!((p.length(1.0) - 120.0).abs() < 1e-12);
    }

    #[test]
    fn inverse_round_trips() {
        let p = Projection::new(&camera(), 100, 80);
        let w = Vector2::new(0.3, 0.1);
        let back = p.to_world(&p.to_pixel(&w));
        assert!((back - w).norm() < 1e-12);
    }
}
