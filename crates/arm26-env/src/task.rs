//! The [`Task`] trait: what an [`Environment`](crate::Environment) asks of a
//! task at each point of the episode.

use arm26_core::types::{Action, BoundedArraySpec, Observation};
use arm26_physics::Physics;

use crate::error::EnvError;

/// Task hooks called by the environment.
///
/// Call order for one control step:
/// [`before_step`](Self::before_step), physics sub-steps,
/// [`after_step`](Self::after_step), [`get_reward`](Self::get_reward),
/// [`get_termination`](Self::get_termination),
/// [`get_observation`](Self::get_observation).
///
/// [`initialize_episode`](Self::initialize_episode) runs inside
/// [`Physics::reset_context`], after the state was restored and before
/// kinematics are recomputed.
pub trait Task: Send + Sync + 'static {
    /// Randomize or set up the physics state for a new episode.
    fn initialize_episode(&mut self, physics: &mut Physics) -> Result<(), EnvError>;

    /// Apply an action. The default writes it to the physics controls.
    fn before_step(&mut self, action: &Action, physics: &mut Physics) -> Result<(), EnvError> {
        physics.set_control(action.as_slice())?;
        Ok(())
    }

    fn after_step(&mut self, _physics: &mut Physics) -> Result<(), EnvError> {
        Ok(())
    }

    fn get_observation(&self, physics: &Physics) -> Result<Observation, EnvError>;

    fn get_reward(&self, physics: &Physics) -> Result<f32, EnvError>;

    /// Discount if the episode should end now, `None` to continue.
    fn get_termination(&self, _physics: &Physics) -> Option<f32> {
        None
    }

    /// Bounds and shape of valid actions.
    fn action_spec(&self, physics: &Physics) -> BoundedArraySpec;
}
