//! [`Arm26EnvPlugin`]: registers the task systems for one task type.

use std::marker::PhantomData;

use bevy::prelude::*;

use arm26_core::Arm26Set;

use crate::episode::Episode;
use crate::systems::{
    EnvFault, PendingAction, StepOutcome, before_step_system, evaluate_system, healthy,
    observe_system,
};
use crate::task::Task;

/// Adds the per-step systems for task type `T`.
///
/// Expects [`Arm26CorePlugin`](arm26_core::Arm26CorePlugin) and
/// [`Arm26PhysicsPlugin`](arm26_physics::Arm26PhysicsPlugin) to be added as
/// well, and the [`Physics`](arm26_physics::Physics) and
/// [`TaskState<T>`](crate::systems::TaskState) resources to be inserted.
/// Once a fault is recorded the remaining phases of that update are skipped.
pub struct Arm26EnvPlugin<T: Task> {
    _task: PhantomData<fn() -> T>,
}

impl<T: Task> Default for Arm26EnvPlugin<T> {
    fn default() -> Self {
        Self { _task: PhantomData }
    }
}

impl<T: Task> Plugin for Arm26EnvPlugin<T> {
    fn build(&self, app: &mut App) {
        app.init_resource::<Episode>()
            .init_resource::<PendingAction>()
            .init_resource::<StepOutcome>()
            .init_resource::<EnvFault>();

        app.configure_sets(Update, Arm26Set::Simulate.run_if(healthy))
            .configure_sets(Update, Arm26Set::Evaluate.run_if(healthy))
            .configure_sets(Update, Arm26Set::Observe.run_if(healthy));

        app.add_systems(Update, before_step_system::<T>.in_set(Arm26Set::Act))
            .add_systems(Update, evaluate_system::<T>.in_set(Arm26Set::Evaluate))
            .add_systems(Update, observe_system::<T>.in_set(Arm26Set::Observe));
    }
}
