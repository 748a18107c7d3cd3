//! Shared types, configuration, time and errors for the Arm26 workspace.
//!
//! Also defines [`Arm26Set`], the ordering of the per-step system phases that
//! every environment app runs through on each `update()`.

pub mod config;
pub mod error;
pub mod rewards;
pub mod seed;
pub mod time;
pub mod types;

use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Arm26Set
// ---------------------------------------------------------------------------

/// Phases of one control step, executed in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arm26Set {
    /// Task writes the pending action into physics controls.
    Act,
    /// Physics advances by `n_sub_steps`.
    Simulate,
    /// Task post-step hook, reward and termination.
    Evaluate,
    /// Observation is collected.
    Observe,
}

// ---------------------------------------------------------------------------
// Arm26CorePlugin
// ---------------------------------------------------------------------------

/// Registers the [`Arm26Set`] ordering in `Update`.
pub struct Arm26CorePlugin;

impl Plugin for Arm26CorePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                Arm26Set::Act,
                Arm26Set::Simulate,
                Arm26Set::Evaluate,
                Arm26Set::Observe,
            )
                .chain(),
        );
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::config::{EnvironmentKwargs, TaskKwargs, step_limit};
    pub use crate::error::{Arm26Error, ConfigError, ToleranceError, ValidationError};
    pub use crate::rewards::{Sigmoid, tolerance};
    pub use crate::seed::RandomSource;
    pub use crate::time::SimTime;
    pub use crate::types::{
        Action, BoundedArraySpec, FLAT_OBSERVATION_KEY, Observation, StepType, TimeStep,
    };
    pub use crate::{Arm26CorePlugin, Arm26Set};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Trace(Vec<Arm26Set>);

    fn record(set: Arm26Set) -> impl FnMut(ResMut<Trace>) {
        move |mut trace: ResMut<Trace>| trace.0.push(set)
    }

    #[test]
    fn sets_run_in_order() {
        let mut app = App::new();
        app.add_plugins(Arm26CorePlugin);
        app.init_resource::<Trace>();
        // Registered out of order on purpose.
        app.add_systems(Update, record(Arm26Set::Observe).in_set(Arm26Set::Observe));
        app.add_systems(Update, record(Arm26Set::Act).in_set(Arm26Set::Act));
        app.add_systems(Update, record(Arm26Set::Evaluate).in_set(Arm26Set::Evaluate));
        app.add_systems(Update, record(Arm26Set::Simulate).in_set(Arm26Set::Simulate));
        app.finish();
        app.cleanup();
        app.update();

        assert_eq!(
            app.world().resource::<Trace>().0,
            vec![
                Arm26Set::Act,
                Arm26Set::Simulate,
                Arm26Set::Evaluate,
                Arm26Set::Observe
            ]
        );
    }
}
