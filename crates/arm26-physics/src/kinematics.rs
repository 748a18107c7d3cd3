//! Forward kinematics for planar serial chains.

use nalgebra::{Rotation2, Vector2};

use crate::model::{JointKind, Model};

/// World pose of a body frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub pos: Vector2<f64>,
    pub angle: f64,
}

impl Frame {
    pub fn identity() -> Self {
        Self {
            pos: Vector2::zeros(),
            angle: 0.0,
        }
    }

    pub fn rotation(&self) -> Rotation2<f64> {
        Rotation2::new(self.angle)
    }

    /// Map a point from this frame to world coordinates.
    pub fn point(&self, local: &Vector2<f64>) -> Vector2<f64> {
        self.pos + self.rotation() * local
    }

    /// Map a direction from this frame to world coordinates.
    pub fn direction(&self, local: &Vector2<f64>) -> Vector2<f64> {
        self.rotation() * local
    }
}

/// Compute every body frame for the given joint configuration.
///
/// Bodies are stored parent-first, so a single pass suffices.
pub fn body_frames(model: &Model, qpos: &[f64]) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::with_capacity(model.bodies.len());
    for body in &model.bodies {
        let parent = body.parent.map_or_else(Frame::identity, |p| frames[p]);
        let mut frame = Frame {
            pos: parent.point(&body.pos),
            angle: parent.angle,
        };
        if let Some(j) = body.joint {
            let joint = &model.joints[j];
            let q = qpos.get(j).copied().unwrap_or(0.0);
            match joint.kind {
                JointKind::Hinge => frame.angle += q,
                JointKind::Slide => frame.pos += parent.direction(&joint.axis) * q,
            }
        }
        frames.push(frame);
    }
    frames
}

/// World centre of every geom.
pub fn geom_positions(model: &Model, frames: &[Frame]) -> Vec<Vector2<f64>> {
    model
        .geoms
        .iter()
        .map(|g| frames[g.body].point(&g.pos))
        .collect()
}
