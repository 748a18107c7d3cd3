//! Bevy plugin wiring the physics step into the control loop.

use bevy::prelude::*;

use arm26_core::Arm26Set;

use crate::systems::{PhysicsFault, SubSteps, physics_step_system};

/// Registers [`physics_step_system`] in [`Arm26Set::Simulate`].
///
/// The [`Physics`](crate::Physics) resource itself is inserted by whoever
/// owns the model (usually the environment).
///
/// ```ignore
/// app.add_plugins(Arm26PhysicsPlugin::new(4));
/// ```
pub struct Arm26PhysicsPlugin {
    n_sub_steps: u32,
}

impl Arm26PhysicsPlugin {
    pub const fn new(n_sub_steps: u32) -> Self {
        Self { n_sub_steps }
    }

    pub const fn n_sub_steps(&self) -> u32 {
        self.n_sub_steps
    }
}

impl Default for Arm26PhysicsPlugin {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Plugin for Arm26PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SubSteps(self.n_sub_steps.max(1)))
            .init_resource::<PhysicsFault>()
            .add_systems(Update, physics_step_system.in_set(Arm26Set::Simulate));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arm26_core::Arm26CorePlugin;

    use crate::Physics;

    #[test]
    fn plugin_inserts_resources() {
        let mut app = App::new();
        app.add_plugins((Arm26CorePlugin, Arm26PhysicsPlugin::new(3)));
        assert_eq!(*app.world().resource::<SubSteps>(), SubSteps(3));
        assert!(!app.world().resource::<PhysicsFault>().is_set());
    }

    #[test]
    fn zero_sub_steps_clamped_to_one() {
        let mut app = App::new();
        app.add_plugins((Arm26CorePlugin, Arm26PhysicsPlugin::new(0)));
        assert_eq!(app.world().resource::<SubSteps>().0, 1);
    }

    #[test]
    fn update_steps_inserted_physics() {
        let mut app = App::new();
        app.add_plugins((Arm26CorePlugin, Arm26PhysicsPlugin::new(2)));
        app.insert_resource(Physics::arm26().unwrap());
        app.finish();
        app.cleanup();
        app.update();
        let t = app.world().resource::<Physics>().time();
        assert!((t - 0.01).abs() < 1e-12);
    }
}
