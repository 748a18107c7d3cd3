//! The [`Physics`] resource: model, simulation state and named accessors.

use bevy::prelude::Resource;
use nalgebra::{DMatrix, DVector, Vector2};

use arm26_core::time::SimTime;

use crate::dynamics::{bias_forces, mass_matrix};
use crate::error::PhysicsError;
use crate::kinematics::{Frame, body_frames, geom_positions};
use crate::model::Model;
use crate::muscle::activation_rate;
use crate::resources::{Assets, get_model_and_assets};

// ---------------------------------------------------------------------------
// Physics
// ---------------------------------------------------------------------------

/// Simulation state of a planar muscle-driven chain.
///
/// State is `(qpos, qvel, act)` plus the control vector `ctrl`. Derived
/// quantities (body frames, geom positions, tendon lengths) are refreshed by
/// [`forward`](Self::forward), which [`step`](Self::step) calls after every
/// integration step.
#[derive(Resource, Debug, Clone)]
pub struct Physics {
    model: Model,
    time: SimTime,
    dt: SimTime,
    qpos: DVector<f64>,
    qvel: DVector<f64>,
    act: DVector<f64>,
    ctrl: DVector<f64>,
    frames: Vec<Frame>,
    geom_xpos: Vec<Vector2<f64>>,
    actuator_force: DVector<f64>,
}

impl Physics {
    /// Compile a model description and build its initial state.
    pub fn from_toml(text: &str, assets: &Assets) -> Result<Self, PhysicsError> {
        Self::from_model(Model::from_toml(text, assets)?)
    }

    /// The embedded Arm26 model.
    pub fn arm26() -> Result<Self, PhysicsError> {
        let (text, assets) = get_model_and_assets()?;
        Self::from_toml(text, &assets)
    }

    pub fn from_model(model: Model) -> Result<Self, PhysicsError> {
        let nq = model.nq();
        let nu = model.nu();
        let mut physics = Self {
            time: SimTime::ZERO,
            dt: SimTime::from_secs(model.timestep),
            qpos: model.qpos0(),
            qvel: DVector::zeros(nq),
            act: DVector::zeros(nu),
            ctrl: DVector::zeros(nu),
            frames: Vec::new(),
            geom_xpos: Vec::new(),
            actuator_force: DVector::zeros(nu),
            model,
        };
        physics.forward()?;
        Ok(physics)
    }

    // -- Accessors --

    pub const fn model(&self) -> &Model {
        &self.model
    }

    pub const fn timestep(&self) -> f64 {
        self.model.timestep
    }

    /// Simulated time in seconds.
    pub fn time(&self) -> f64 {
        self.time.secs_f64()
    }

    pub const fn sim_time(&self) -> SimTime {
        self.time
    }

    pub fn qpos(&self) -> &[f64] {
        self.qpos.as_slice()
    }

    pub fn qpos_mut(&mut self) -> &mut [f64] {
        self.qpos.as_mut_slice()
    }

    pub fn qvel(&self) -> &[f64] {
        self.qvel.as_slice()
    }

    pub fn qvel_mut(&mut self) -> &mut [f64] {
        self.qvel.as_mut_slice()
    }

    /// Muscle activations.
    pub fn act(&self) -> &[f64] {
        self.act.as_slice()
    }

    pub fn act_mut(&mut self) -> &mut [f64] {
        self.act.as_mut_slice()
    }

    pub fn ctrl(&self) -> &[f64] {
        self.ctrl.as_slice()
    }

    /// Tendon forces computed by the last [`forward`](Self::forward).
    pub fn actuator_force(&self) -> &[f64] {
        self.actuator_force.as_slice()
    }

    pub fn body_frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn geom_xpos_all(&self) -> &[Vector2<f64>] {
        &self.geom_xpos
    }

    // -- Control --

    /// Write controls, clipped to each muscle's control range.
    pub fn set_control(&mut self, ctrl: &[f32]) -> Result<(), PhysicsError> {
        if ctrl.len() != self.model.nu() {
            return Err(PhysicsError::ControlSize {
                expected: self.model.nu(),
                got: ctrl.len(),
            });
        }
        for ((slot, &value), muscle) in self.ctrl.iter_mut().zip(ctrl).zip(&self.model.muscles) {
            *slot = muscle.clip_ctrl(f64::from(value));
        }
        Ok(())
    }

    // -- Lifecycle --

    /// Restore the reference state: `qpos0`, zero velocities, activations,
    /// controls and time. Model edits (geom sizes, colours, body offsets)
    /// persist.
    pub fn reset(&mut self) -> Result<(), PhysicsError> {
        self.time.reset();
        self.qpos = self.model.qpos0();
        self.qvel.fill(0.0);
        self.act.fill(0.0);
        self.ctrl.fill(0.0);
        self.forward()
    }

    /// Reset, let `f` edit the state, then recompute derived quantities.
    pub fn reset_context<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<PhysicsError>,
    {
        self.reset()?;
        let out = f(self)?;
        self.forward()?;
        Ok(out)
    }

    /// Recompute kinematics and actuator forces from the current state.
    pub fn forward(&mut self) -> Result<(), PhysicsError> {
        self.frames = body_frames(&self.model, self.qpos.as_slice());
        self.geom_xpos = geom_positions(&self.model, &self.frames);
        for (i, muscle) in self.model.muscles.iter().enumerate() {
            let len = muscle.tendon_length(self.qpos.as_slice());
            let vel = muscle.tendon_velocity(self.qvel.as_slice());
            self.actuator_force[i] = muscle.force(self.act[i], len, vel);
        }
        self.check_divergence()
    }

    /// Advance `n` physics steps.
    pub fn step(&mut self, n: u32) -> Result<(), PhysicsError> {
        for _ in 0..n {
            self.step_once()?;
        }
        Ok(())
    }

    /// Semi-implicit Euler with implicit joint damping.
    fn step_once(&mut self) -> Result<(), PhysicsError> {
        let h = self.model.timestep;
        let nq = self.model.nq();

        let mut tau = DVector::zeros(nq);
        for (i, muscle) in self.model.muscles.iter().enumerate() {
            for (j, arm) in muscle.moment.iter().enumerate() {
                tau[j] += arm * self.actuator_force[i];
            }
        }
        let damping = DVector::from_iterator(nq, self.model.joints.iter().map(|j| j.damping));
        tau -= damping.component_mul(&self.qvel);
        tau -= bias_forces(&self.model, self.qpos.as_slice(), &self.qvel);

        let m = mass_matrix(&self.model, &self.frames) + DMatrix::from_diagonal(&(damping * h));
        let qacc = m
            .cholesky()
            .ok_or(PhysicsError::SingularMassMatrix)?
            .solve(&tau);

        let act_dot: Vec<f64> = self
            .model
            .muscles
            .iter()
            .enumerate()
            .map(|(i, m)| activation_rate(self.ctrl[i], self.act[i], &m.params))
            .collect();
        for (a, rate) in self.act.iter_mut().zip(act_dot) {
            *a = (*a + h * rate).clamp(0.0, 1.0);
        }

        self.qvel += qacc * h;
        self.qpos += &self.qvel * h;
        self.enforce_limits();
        self.time.advance(self.dt, 1);
        self.forward()
    }

    /// Clamp limited joints into range and stop motion into the limit.
    fn enforce_limits(&mut self) {
        for (j, joint) in self.model.joints.iter().enumerate() {
            let Some([lo, hi]) = joint.range else {
                continue;
            };
            if self.qpos[j] < lo {
                self.qpos[j] = lo;
                self.qvel[j] = self.qvel[j].max(0.0);
            } else if self.qpos[j] > hi {
                self.qpos[j] = hi;
                self.qvel[j] = self.qvel[j].min(0.0);
            }
        }
    }

    /// Fail if any state variable is non-finite.
    pub fn check_divergence(&self) -> Result<(), PhysicsError> {
        let finite = self.qpos.iter().all(|x| x.is_finite())
            && self.qvel.iter().all(|x| x.is_finite())
            && self.act.iter().all(|x| x.is_finite());
        if finite {
            Ok(())
        } else {
            Err(PhysicsError::Diverged { time: self.time() })
        }
    }

    // -- Named access --

    pub fn geom_size(&self, name: &str) -> Result<&[f64; 3], PhysicsError> {
        let id = self.model.geom_id(name)?;
        Ok(&self.model.geoms[id].size)
    }

    pub fn geom_size_mut(&mut self, name: &str) -> Result<&mut [f64; 3], PhysicsError> {
        let id = self.model.geom_id(name)?;
        Ok(&mut self.model.geoms[id].size)
    }

    /// Body offset in its parent frame.
    pub fn body_pos(&self, name: &str) -> Result<&Vector2<f64>, PhysicsError> {
        let id = self.model.body_id(name)?;
        Ok(&self.model.bodies[id].pos)
    }

    /// Mutable body offset. Takes effect at the next [`forward`](Self::forward).
    pub fn body_pos_mut(&mut self, name: &str) -> Result<&mut Vector2<f64>, PhysicsError> {
        let id = self.model.body_id(name)?;
        Ok(&mut self.model.bodies[id].pos)
    }

    pub fn material_rgba(&self, name: &str) -> Result<[f32; 4], PhysicsError> {
        let id = self.model.material_id(name)?;
        Ok(self.model.materials[id].rgba)
    }

    pub fn material_rgba_mut(&mut self, name: &str) -> Result<&mut [f32; 4], PhysicsError> {
        let id = self.model.material_id(name)?;
        Ok(&mut self.model.materials[id].rgba)
    }

    /// World position of a geom centre.
    pub fn geom_xpos(&self, name: &str) -> Result<Vector2<f64>, PhysicsError> {
        let id = self.model.geom_id(name)?;
        Ok(self.geom_xpos[id])
    }

    /// Current angle of a named joint.
    pub fn joint_qpos(&self, name: &str) -> Result<f64, PhysicsError> {
        let id = self.model.joint_id(name)?;
        Ok(self.qpos[id])
    }

    // -- Reaching helpers --

    /// Joint angles.
    pub fn position(&self) -> Vec<f64> {
        self.qpos.iter().copied().collect()
    }

    /// Joint velocities.
    pub fn velocity(&self) -> Vec<f64> {
        self.qvel.iter().copied().collect()
    }

    /// Vector from the finger to the target in world coordinates.
    pub fn finger_to_target(&self) -> Result<Vector2<f64>, PhysicsError> {
        Ok(self.geom_xpos("target")? - self.geom_xpos("finger")?)
    }

    /// Distance from the finger to the target.
    pub fn finger_to_target_dist(&self) -> Result<f64, PhysicsError> {
        Ok(self.finger_to_target()?.norm())
    }
}
