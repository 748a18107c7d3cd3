//! Reaching behaviour shared by planar reacher tasks.
//!
//! Plain functions over [`Physics`]; a task calls the ones it needs.

use arm26_core::rewards::in_bounds;
use arm26_core::types::{BoundedArraySpec, Observation};
use arm26_env::EnvError;
use arm26_physics::Physics;

/// Name of the action spec exposed by reacher tasks.
pub const ACTION_SPEC_NAME: &str = "muscles";

/// Radius of the finger tip geom.
pub fn finger_size(physics: &Physics) -> Result<f64, EnvError> {
    Ok(physics.geom_size("finger")?[0])
}

/// Radius of the target geom.
pub fn target_size(physics: &Physics) -> Result<f64, EnvError> {
    Ok(physics.geom_size("target")?[0])
}

/// Start-of-episode cleanup run after task-specific randomization:
/// velocities, activations and controls are zeroed and kinematics refreshed.
pub fn initialize_episode(physics: &mut Physics) -> Result<(), EnvError> {
    physics.qvel_mut().fill(0.0);
    physics.act_mut().fill(0.0);
    let nu = physics.model().nu();
    physics.set_control(&vec![0.0; nu])?;
    physics.forward()?;
    Ok(())
}

/// `position`, `to_target` and `velocity`, in that order.
#[allow(clippy::cast_possible_truncation)]
pub fn observation(physics: &Physics) -> Result<Observation, EnvError> {
    let to_target = physics.finger_to_target()?;
    Ok(Observation::new()
        .with("position", physics.position().iter().map(|&q| q as f32).collect())
        .with("to_target", vec![to_target.x as f32, to_target.y as f32])
        .with("velocity", physics.velocity().iter().map(|&v| v as f32).collect()))
}

/// 1 while the finger touches the target, else 0.
#[allow(clippy::cast_possible_truncation)]
pub fn reward(physics: &Physics) -> Result<f32, EnvError> {
    let radii = target_size(physics)? + finger_size(physics)?;
    let r = in_bounds(physics.finger_to_target_dist()?, (0.0, radii))?;
    Ok(r as f32)
}

/// One bounded entry per muscle, from its control range.
#[allow(clippy::cast_possible_truncation)]
pub fn action_spec(physics: &Physics) -> BoundedArraySpec {
    let muscles = &physics.model().muscles;
    BoundedArraySpec {
        name: ACTION_SPEC_NAME.into(),
        minimum: muscles.iter().map(|m| m.params.ctrl_range[0] as f32).collect(),
        maximum: muscles.iter().map(|m| m.params.ctrl_range[1] as f32).collect(),
    }
}
