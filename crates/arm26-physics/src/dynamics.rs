//! Joint-space equations of motion for planar chains.
//!
//! `M(q) qacc + c(q, qvel) = tau`, with `M` assembled from per-body centre of
//! mass Jacobians and `c` (Coriolis and centrifugal terms) obtained from
//! finite differences of `M`.

use nalgebra::{DMatrix, DVector, Vector2};

use crate::kinematics::{Frame, body_frames};
use crate::model::{JointKind, Model};

const FD_STEP: f64 = 1e-6;

/// Linear (2 x nq) and angular (1 x nq) Jacobians of a body's centre of mass.
pub fn com_jacobian(model: &Model, frames: &[Frame], body: usize) -> (DMatrix<f64>, DVector<f64>) {
    let nq = model.nq();
    let mut jv = DMatrix::zeros(2, nq);
    let mut jw = DVector::zeros(nq);
    let com = frames[body].point(&model.bodies[body].com);

    let mut current = Some(body);
    while let Some(b) = current {
        if let Some(j) = model.bodies[b].joint {
            let joint = &model.joints[j];
            match joint.kind {
                JointKind::Hinge => {
                    let r: Vector2<f64> = com - frames[b].pos;
                    jv[(0, j)] = -r.y;
                    jv[(1, j)] = r.x;
                    jw[j] = 1.0;
                }
                JointKind::Slide => {
                    let axis = frames[b].direction(&joint.axis);
                    jv[(0, j)] = axis.x;
                    jv[(1, j)] = axis.y;
                }
            }
        }
        current = model.bodies[b].parent;
    }
    (jv, jw)
}

/// Joint-space inertia matrix.
pub fn mass_matrix(model: &Model, frames: &[Frame]) -> DMatrix<f64> {
    let nq = model.nq();
    let mut m = DMatrix::zeros(nq, nq);
    for (b, body) in model.bodies.iter().enumerate() {
        if body.mass <= 0.0 {
            continue;
        }
        let (jv, jw) = com_jacobian(model, frames, b);
        m += jv.transpose() * &jv * body.mass;
        m += &jw * jw.transpose() * body.inertia;
    }
    m
}

/// Coriolis and centrifugal generalized forces.
///
/// `c_i = sum_k (dM/dq_k qvel)_i qvel_k - 0.5 qvel^T (dM/dq_i) qvel`
pub fn bias_forces(model: &Model, qpos: &[f64], qvel: &DVector<f64>) -> DVector<f64> {
    let nq = model.nq();
    let mut q = qpos.to_vec();
    let dm: Vec<DMatrix<f64>> = (0..nq)
        .map(|k| {
            let q0 = q[k];
            q[k] = q0 + FD_STEP;
            let plus = mass_matrix(model, &body_frames(model, &q));
            q[k] = q0 - FD_STEP;
            let minus = mass_matrix(model, &body_frames(model, &q));
            q[k] = q0;
            (plus - minus) / (2.0 * FD_STEP)
        })
        .collect();

    let mut c = DVector::zeros(nq);
    for (k, dm_k) in dm.iter().enumerate() {
        c += dm_k * qvel * qvel[k];
    }
    for (i, dm_i) in dm.iter().enumerate() {
        c[i] -= 0.5 * qvel.dot(&(dm_i * qvel));
    }
    c
}
