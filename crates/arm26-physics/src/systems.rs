//! ECS glue: the physics step system and its resources.

use bevy::prelude::*;

use crate::error::PhysicsError;
use crate::physics::Physics;

/// Number of physics steps taken per control step.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubSteps(pub u32);

impl Default for SubSteps {
    fn default() -> Self {
        Self(1)
    }
}

/// First error raised by the step system since it was last taken.
///
/// Once set, stepping stops until the fault is cleared.
#[derive(Resource, Debug, Default)]
pub struct PhysicsFault(pub Option<PhysicsError>);

impl PhysicsFault {
    pub const fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn take(&mut self) -> Option<PhysicsError> {
        self.0.take()
    }
}

/// Advance [`Physics`] by [`SubSteps`].
///
/// Runs in [`Arm26Set::Simulate`](arm26_core::Arm26Set::Simulate).
pub fn physics_step_system(
    physics: Option<ResMut<Physics>>,
    sub_steps: Res<SubSteps>,
    mut fault: ResMut<PhysicsFault>,
) {
    let Some(mut physics) = physics else {
        return;
    };
    if fault.is_set() {
        return;
    }
    if let Err(err) = physics.step(sub_steps.0) {
        error!("physics step failed: {err}");
        fault.0 = Some(err);
    }
}
