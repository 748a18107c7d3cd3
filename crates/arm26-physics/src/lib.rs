// arm26-physics: Planar muscle-driven articulated-arm simulation.
//
// A model is described in TOML, compiled into flat arrays addressed by index
// or name, and integrated with semi-implicit Euler. Only what a planar
// reaching task needs is modelled: hinge/slide chains, capsule and sphere
// geoms, joint damping and limits, and muscle actuators with constant moment
// arms. There are no contacts.

pub mod dynamics;
pub mod error;
pub mod kinematics;
pub mod model;
pub mod muscle;
pub mod physics;
pub mod plugin;
pub mod resources;
pub mod systems;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        error::PhysicsError,
        kinematics::Frame,
        model::{GeomKind, JointKind, Model},
        physics::Physics,
        plugin::Arm26PhysicsPlugin,
        resources::{Assets, get_model_and_assets, get_resource},
        systems::{PhysicsFault, SubSteps},
    };
}

pub use error::PhysicsError;
pub use physics::Physics;
pub use plugin::Arm26PhysicsPlugin;
