//! Bevy test app builders.

use bevy::prelude::*;

use arm26_core::Arm26CorePlugin;
use arm26_physics::{Arm26PhysicsPlugin, Physics};

/// App with only the core plugin: the [`Arm26Set`](arm26_core::Arm26Set)
/// ordering and nothing else.
pub fn minimal_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(Arm26CorePlugin);
    app.finish();
    app.cleanup();
    app
}

/// App that steps `physics` by `n_sub_steps` on every update.
pub fn physics_test_app(physics: Physics, n_sub_steps: u32) -> App {
    let mut app = App::new();
    app.add_plugins((Arm26CorePlugin, Arm26PhysicsPlugin::new(n_sub_steps)));
    app.insert_resource(physics);
    app.finish();
    app.cleanup();
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use arm26_physics::systems::PhysicsFault;

    #[test]
    fn minimal_app_updates() {
        let mut app = minimal_test_app();
        app.update();
        assert!(app.world().get_resource::<Physics>().is_none());
    }

    #[test]
    fn physics_app_advances_time() {
        let mut app = physics_test_app(Physics::arm26().unwrap(), 2);
        app.update();
        app.update();
        let physics = app.world().resource::<Physics>();
        assert!((physics.time() - 0.02).abs() < 1e-12);
        assert!(!app.world().resource::<PhysicsFault>().is_set());
    }
}
