//! Scene drawing for a [`Physics`] state.
//!
//! Layers, back to front: background, floor with grid, jointless bodies
//! (the target), articulated links, muscle paths shaded by activation, and
//! joint markers.

use bevy::prelude::*;
use nalgebra::Vector2;

use arm26_physics::Physics;
use arm26_physics::kinematics::{Frame, body_frames};
use arm26_physics::model::{GeomKind, Model};

use crate::buffer::FrameBuffer;
use crate::camera::Projection;
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::raster::{capsule, disc, polyline, to_rgb8};

const BACKGROUND: [f32; 4] = [0.12, 0.16, 0.22, 1.0];
const FALLBACK_GEOM: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
const MUSCLE_RELAXED: [f32; 4] = [0.55, 0.55, 0.55, 1.0];
const MUSCLE_ACTIVE: [f32; 4] = [0.85, 0.1, 0.1, 1.0];

/// Lateral distance of a muscle path from its link, in metres.
const MONO_OFFSET: f64 = 0.06;
const BI_OFFSET: f64 = 0.09;
/// How far a muscle path extends along the link on either side of a joint.
const MUSCLE_REACH: f64 = 0.2;
const MUSCLE_HALF_WIDTH: f64 = 0.012;
const JOINT_MARKER_RADIUS: f64 = 0.025;
const GRID_LINE_PX: f64 = 0.5;

/// Draws frames of a [`Physics`] state.
///
/// # Example
///
/// ```no_run
/// use arm26_physics::Physics;
/// use arm26_render::{RenderConfig, Renderer};
///
/// let physics = Physics::arm26().unwrap();
/// let frame = Renderer::new(RenderConfig::default()).render(&physics).unwrap();
/// assert_eq!(frame.shape(), (240, 320, 3));
/// ```
#[derive(Resource, Clone, Debug, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[must_use]
    pub const fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render from the configured camera.
    pub fn render(&self, physics: &Physics) -> Result<FrameBuffer, RenderError> {
        self.render_camera(physics, self.config.camera_id)
    }

    /// Render from a specific camera index.
    pub fn render_camera(
        &self,
        physics: &Physics,
        camera_id: usize,
    ) -> Result<FrameBuffer, RenderError> {
        let RenderConfig { width, height, .. } = self.config;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        let model = physics.model();
        let camera = model
            .cameras
            .get(camera_id)
            .ok_or(RenderError::UnknownCamera {
                id: camera_id,
                count: model.cameras.len(),
            })?;

        let proj = Projection::new(camera, width, height);
        let frames = body_frames(model, physics.qpos());
        let mut frame = FrameBuffer::from_config(&self.config);
        frame.fill(to_rgb8(BACKGROUND));

        draw_floor(&mut frame, model, &proj);
        draw_geoms(&mut frame, model, &frames, &proj, false);
        draw_geoms(&mut frame, model, &frames, &proj, true);
        draw_muscles(&mut frame, model, &frames, physics.act(), &proj);
        draw_joints(&mut frame, model, &frames, &proj);
        Ok(frame)
    }
}

/// One-shot render at the given size and camera.
pub fn render(
    physics: &Physics,
    width: u32,
    height: u32,
    camera_id: usize,
) -> Result<FrameBuffer, RenderError> {
    Renderer::new(RenderConfig::new(width, height).with_camera(camera_id)).render(physics)
}

fn material_rgba(model: &Model, material: Option<usize>) -> [f32; 4] {
    material
        .and_then(|m| model.materials.get(m))
        .map_or(FALLBACK_GEOM, |m| m.rgba)
}

fn lerp_rgba(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw_floor(frame: &mut FrameBuffer, model: &Model, proj: &Projection) {
    let Some(floor) = &model.floor else {
        return;
    };
    let base = material_rgba(model, floor.material);
    let he = floor.half_extent;

    let lo = proj.to_pixel(&Vector2::new(-he, he));
    let hi = proj.to_pixel(&Vector2::new(he, -he));
    let x0 = lo.x.max(0.0).floor() as u32;
    let y0 = lo.y.max(0.0).floor() as u32;
    let x1 = hi.x.min(f64::from(frame.width())).ceil() as u32;
    let y1 = hi.y.min(f64::from(frame.height())).ceil() as u32;
    let rgb = to_rgb8(base);
    for y in y0..y1 {
        for x in x0..x1 {
            frame.put_rgb(x, y, rgb);
        }
    }

    if floor.grid <= 0.0 {
        return;
    }
    let line = to_rgb8(lerp_rgba(base, [1.0; 4], 0.25));
    let mut s = -he;
    while s <= he + 1e-9 {
        for (a, b) in [
            (Vector2::new(s, -he), Vector2::new(s, he)),
            (Vector2::new(-he, s), Vector2::new(he, s)),
        ] {
            capsule(frame, &proj.to_pixel(&a), &proj.to_pixel(&b), GRID_LINE_PX, line, 0.6);
        }
        s += floor.grid;
    }
}

fn draw_geoms(
    frame: &mut FrameBuffer,
    model: &Model,
    frames: &[Frame],
    proj: &Projection,
    articulated: bool,
) {
    for geom in &model.geoms {
        if model.bodies[geom.body].joint.is_some() != articulated {
            continue;
        }
        let rgba = material_rgba(model, geom.material);
        let body = &frames[geom.body];
        let center = body.point(&geom.pos);
        let radius = proj.length(geom.size[0]);
        let (a, b) = match geom.kind {
            GeomKind::Sphere => (center, center),
            GeomKind::Capsule => {
                let half = body.direction(&geom.axis) * geom.size[1];
                (center - half, center + half)
            }
        };
        capsule(
            frame,
            &proj.to_pixel(&a),
            &proj.to_pixel(&b),
            radius,
            to_rgb8(rgba),
            rgba[3],
        );
    }
}

/// World-space polyline for a muscle: a point before its first joint, one
/// via point per spanned joint, and a point past its last joint.
///
/// Flexors (negative moment arm) run on the side the joint closes towards.
fn muscle_path(model: &Model, frames: &[Frame], moment: &[f64]) -> Vec<Vector2<f64>> {
    let spanned: Vec<usize> = moment
        .iter()
        .enumerate()
        .filter(|(_, r)| r.abs() > f64::EPSILON)
        .map(|(j, _)| j)
        .collect();
    let (Some(&first), Some(&last)) = (spanned.first(), spanned.last()) else {
        return Vec::new();
    };
    let side = -moment[first].signum();
    let offset = if spanned.len() > 1 { BI_OFFSET } else { MONO_OFFSET } * side;

    // Parent frame of the body a joint moves, with the joint position in it.
    let anchor = |j: usize| {
        let body = &model.bodies[model.joints[j].body];
        let parent = body.parent.map_or_else(Frame::identity, |p| frames[p]);
        (parent, body.pos)
    };

    let mut points = Vec::with_capacity(spanned.len() + 2);
    let (parent, pos) = anchor(first);
    points.push(parent.point(&(pos + Vector2::new(-MUSCLE_REACH, offset))));
    for &j in &spanned {
        let (parent, pos) = anchor(j);
        points.push(parent.point(&(pos + Vector2::new(0.0, offset))));
    }
    let child = frames[model.joints[last].body];
    points.push(child.point(&Vector2::new(MUSCLE_REACH, offset)));
    points
}

#[allow(clippy::cast_possible_truncation)]
fn draw_muscles(
    frame: &mut FrameBuffer,
    model: &Model,
    frames: &[Frame],
    act: &[f64],
    proj: &Projection,
) {
    let half_width = proj.length(MUSCLE_HALF_WIDTH);
    for (i, muscle) in model.muscles.iter().enumerate() {
        let points: Vec<_> = muscle_path(model, frames, &muscle.moment)
            .iter()
            .map(|p| proj.to_pixel(p))
            .collect();
        let a = act.get(i).copied().unwrap_or(0.0) as f32;
        let rgb = to_rgb8(lerp_rgba(MUSCLE_RELAXED, MUSCLE_ACTIVE, a));
        polyline(frame, &points, half_width, rgb, 1.0);
    }
}

fn draw_joints(frame: &mut FrameBuffer, model: &Model, frames: &[Frame], proj: &Projection) {
    let rgb = to_rgb8(
        model
            .material_id("decoration")
            .map_or(FALLBACK_GEOM, |m| model.materials[m].rgba),
    );
    let radius = proj.length(JOINT_MARKER_RADIUS);
    for joint in &model.joints {
        let at = proj.to_pixel(&frames[joint.body].pos);
        disc(frame, &at, radius, rgb, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PixelFormat;

    fn arm() -> Physics {
        Physics::arm26().unwrap()
    }

    fn pixel_at(frame: &FrameBuffer, physics: &Physics, world: Vector2<f64>) -> Vec<u8> {
        let proj = Projection::new(&physics.model().cameras[0], frame.width(), frame.height());
        let p = proj.to_pixel(&world);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (x, y) = (p.x as u32, p.y as u32);
        frame.pixel(x, y).unwrap().to_vec()
    }

    #[test]
    fn default_frame_shape() {
        let frame = Renderer::default().render(&arm()).unwrap();
        assert_eq!(frame.shape(), (240, 320, 3));
        assert_eq!(frame.data().len(), 240 * 320 * 3);
    }

    #[test]
    fn rgba_format_respected() {
        let config = RenderConfig::new(64, 48).with_format(PixelFormat::Rgba8);
        let frame = Renderer::new(config).render(&arm()).unwrap();
        assert_eq!(frame.shape(), (48, 64, 4));
    }

    #[test]
    fn unknown_camera_rejected() {
        let err = render(&arm(), 32, 32, 9).unwrap_err();
        assert!(matches!(err, RenderError::UnknownCamera { id: 9, count: 1 }));
    }

    #[test]
    fn zero_size_rejected() {
        let err = render(&arm(), 0, 32, 0).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSize { .. }));
    }

    #[test]
    fn target_drawn_in_its_material() {
        let mut physics = arm();
        *physics.body_pos_mut("target").unwrap() = Vector2::new(-0.6, 0.2);
        let frame = render(&physics, 320, 240, 0).unwrap();
        let target = to_rgb8(physics.material_rgba("target").unwrap());
        assert_eq!(pixel_at(&frame, &physics, Vector2::new(-0.6, 0.2)), target);
    }

    #[test]
    fn moving_target_changes_frame() {
        let mut physics = arm();
        let before = render(&physics, 160, 120, 0).unwrap();
        *physics.body_pos_mut("target").unwrap() = Vector2::new(-0.5, 0.5);
        let after = render(&physics, 160, 120, 0).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn activation_tints_muscles() {
        let mut physics = arm();
        physics.qpos_mut().copy_from_slice(&[1.2, 1.0]);
        let relaxed = render(&physics, 160, 120, 0).unwrap();
        physics.act_mut()[0] = 1.0;
        let active = render(&physics, 160, 120, 0).unwrap();
        assert_ne!(relaxed, active);
    }

    #[test]
    fn rendering_is_deterministic() {
        let physics = arm();
        assert_eq!(
            render(&physics, 80, 60, 0).unwrap(),
            render(&physics, 80, 60, 0).unwrap()
        );
    }

    #[test]
    fn muscle_paths_follow_moment_sign() {
        let physics = arm();
        let model = physics.model();
        let frames = body_frames(model, physics.qpos());
        let sf = &model.muscles[model.muscle_id("SF").unwrap()];
        let se = &model.muscles[model.muscle_id("SE").unwrap()];
        let bf = &model.muscles[model.muscle_id("BF").unwrap()];
        let flex = muscle_path(model, &frames, &sf.moment);
        let ext = muscle_path(model, &frames, &se.moment);
        assert_eq!(flex.len(), 3);
        assert_eq!(muscle_path(model, &frames, &bf.moment).len(), 4);
        // Straight arm along +x: flexor above, extensor below.
        assert!(flex.iter().all(|p| p.y > 0.0));
        assert!(ext.iter().all(|p| p.y < 0.0));
    }
}
