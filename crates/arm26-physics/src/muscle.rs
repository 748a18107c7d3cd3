//! Muscle actuator model.
//!
//! Each muscle pulls on a virtual tendon whose length is a linear function of
//! the joint angles (constant moment arms). Force follows the usual
//! piecewise-quadratic force-length / force-velocity / passive curves scaled
//! by a peak force `F0`, and activation lags the control signal through
//! first-order dynamics with separate rise and decay time constants.

use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-10;

// ---------------------------------------------------------------------------
// MuscleParams
// ---------------------------------------------------------------------------

/// Shape parameters shared by every muscle unless overridden.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MuscleParams {
    /// Valid control interval; controls are clipped into it.
    pub ctrl_range: [f64; 2],
    /// Operating range of normalized fibre length.
    pub length_range: [f64; 2],
    /// Shortest normalized length producing active force.
    pub lmin: f64,
    /// Longest normalized length producing active force.
    pub lmax: f64,
    /// Shortening velocity (in optimal lengths per second) at which force
    /// drops to zero.
    pub vmax: f64,
    /// Passive force at `lmax`, relative to `F0`.
    pub fpmax: f64,
    /// Force plateau during lengthening, relative to `F0`.
    pub fvmax: f64,
    /// `F0 = scale / acc0`, where `acc0` is the joint-space acceleration
    /// produced by unit tendon force at the reference pose.
    pub scale: f64,
    pub tau_activation: f64,
    pub tau_deactivation: f64,
}

impl Default for MuscleParams {
    fn default() -> Self {
        Self {
            ctrl_range: [0.0, 1.0],
            length_range: [0.75, 1.05],
            lmin: 0.5,
            lmax: 1.6,
            vmax: 1.5,
            fpmax: 1.3,
            fvmax: 1.2,
            scale: 200.0,
            tau_activation: 0.01,
            tau_deactivation: 0.04,
        }
    }
}

// ---------------------------------------------------------------------------
// Curves
// ---------------------------------------------------------------------------

/// Active force-length multiplier. Zero outside `[lmin, lmax]`, peak 1 at 1.
pub fn gain_length(length: f64, lmin: f64, lmax: f64) -> f64 {
    if length < lmin || length > lmax {
        return 0.0;
    }
    let a = 0.5 * (lmin + 1.0);
    let b = 0.5 * (1.0 + lmax);

    if length <= a {
        let x = (length - lmin) / (a - lmin).max(EPS);
        0.5 * x * x
    } else if length <= 1.0 {
        let x = (1.0 - length) / (1.0 - a).max(EPS);
        1.0 - 0.5 * x * x
    } else if length <= b {
        let x = (length - 1.0) / (b - 1.0).max(EPS);
        1.0 - 0.5 * x * x
    } else {
        let x = (lmax - length) / (lmax - b).max(EPS);
        0.5 * x * x
    }
}

/// Force-velocity multiplier. `velocity = -1` is maximal shortening.
pub fn gain_velocity(velocity: f64, fvmax: f64) -> f64 {
    let y = fvmax - 1.0;
    if velocity <= -1.0 {
        0.0
    } else if velocity <= 0.0 {
        (velocity + 1.0) * (velocity + 1.0)
    } else if velocity <= y {
        fvmax - (y - velocity) * (y - velocity) / y.max(EPS)
    } else {
        fvmax
    }
}

/// Passive elastic force, zero below optimal length.
pub fn passive_force(length: f64, lmax: f64, fpmax: f64) -> f64 {
    let b = 0.5 * (1.0 + lmax);
    if length <= 1.0 {
        0.0
    } else if length <= b {
        let x = (length - 1.0) / (b - 1.0).max(EPS);
        fpmax * 0.5 * x * x
    } else {
        let x = (length - b) / (b - 1.0).max(EPS);
        fpmax * (0.5 + x)
    }
}

/// Rate of change of activation.
///
/// Time constants scale with activation: rising slows and decay speeds up as
/// the muscle is more active.
pub fn activation_rate(ctrl: f64, act: f64, params: &MuscleParams) -> f64 {
    let a = act.clamp(0.0, 1.0);
    let scale = 0.5 + 1.5 * a;
    let delta = ctrl.clamp(0.0, 1.0) - act;
    let tau = if delta > 0.0 {
        params.tau_activation * scale
    } else {
        params.tau_deactivation / scale
    };
    delta / tau.max(EPS)
}

// ---------------------------------------------------------------------------
// Muscle
// ---------------------------------------------------------------------------

/// A compiled muscle actuator.
#[derive(Debug, Clone, PartialEq)]
pub struct Muscle {
    pub name: String,
    /// d(tendon length)/d(qpos), one entry per joint.
    pub moment: Vec<f64>,
    pub params: MuscleParams,
    /// Tendon length range reachable within the joint limits.
    pub tendon_range: [f64; 2],
    /// Peak isometric force.
    pub f0: f64,
}

impl Muscle {
    /// Tendon length at the given joint configuration.
    pub fn tendon_length(&self, qpos: &[f64]) -> f64 {
        self.moment.iter().zip(qpos).map(|(r, q)| r * q).sum()
    }

    /// Tendon velocity at the given joint velocities.
    pub fn tendon_velocity(&self, qvel: &[f64]) -> f64 {
        self.moment.iter().zip(qvel).map(|(r, v)| r * v).sum()
    }

    /// Optimal fibre length implied by the tendon and operating ranges.
    fn optimal_length(&self) -> f64 {
        let span = self.params.length_range[1] - self.params.length_range[0];
        ((self.tendon_range[1] - self.tendon_range[0]) / span).max(EPS)
    }

    /// Scalar tendon force for the given activation and tendon state.
    /// Negative values pull.
    pub fn force(&self, act: f64, length: f64, velocity: f64) -> f64 {
        let p = &self.params;
        let l0 = self.optimal_length();
        let norm_len = p.length_range[0] + (length - self.tendon_range[0]) / l0;
        let norm_vel = velocity / (l0 * p.vmax).max(EPS);

        let active = gain_length(norm_len, p.lmin, p.lmax) * gain_velocity(norm_vel, p.fvmax);
        let passive = passive_force(norm_len, p.lmax, p.fpmax);
        -self.f0 * (active * act + passive)
    }

    /// Clip a raw control value into the control range.
    pub fn clip_ctrl(&self, ctrl: f64) -> f64 {
        ctrl.clamp(self.params.ctrl_range[0], self.params.ctrl_range[1])
    }
}
