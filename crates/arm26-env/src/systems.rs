//! Per-step systems and the resources they communicate through.

use bevy::prelude::*;

use arm26_core::types::{Action, Observation};
use arm26_physics::Physics;
use arm26_physics::systems::PhysicsFault;

use crate::episode::Episode;
use crate::error::EnvError;
use crate::task::Task;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// The task driving the environment.
#[derive(Resource)]
pub struct TaskState<T: Task>(pub T);

/// Action to apply on the next update. Consumed by [`before_step_system`].
#[derive(Resource, Clone, Debug, Default)]
pub struct PendingAction(pub Option<Action>);

/// Reward and observation produced by the last update.
#[derive(Resource, Clone, Debug, Default)]
pub struct StepOutcome {
    pub reward: f32,
    pub observation: Observation,
}

/// First task error raised during an update.
#[derive(Resource, Debug, Default)]
pub struct EnvFault(pub Option<EnvError>);

impl EnvFault {
    pub const fn is_set(&self) -> bool {
        self.0.is_some()
    }

    fn record(&mut self, err: EnvError) {
        error!("task hook failed: {err}");
        self.0.get_or_insert(err);
    }
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// True while neither the task nor the physics has failed this update.
#[allow(clippy::needless_pass_by_value)]
pub fn healthy(env: Res<EnvFault>, physics: Res<PhysicsFault>) -> bool {
    !env.is_set() && !physics.is_set()
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Hands the pending action to the task.
///
/// Runs in [`Arm26Set::Act`](arm26_core::Arm26Set::Act).
pub fn before_step_system<T: Task>(
    mut task: ResMut<TaskState<T>>,
    mut physics: ResMut<Physics>,
    mut pending: ResMut<PendingAction>,
    mut fault: ResMut<EnvFault>,
) {
    let Some(action) = pending.0.take() else {
        return;
    };
    if let Err(err) = task.0.before_step(&action, &mut physics) {
        fault.record(err);
    }
}

/// Post-step hook, reward, and episode bookkeeping.
///
/// The step limit is checked before the task's termination, so a truncated
/// step always ends with discount 1.
///
/// Runs in [`Arm26Set::Evaluate`](arm26_core::Arm26Set::Evaluate).
pub fn evaluate_system<T: Task>(
    mut task: ResMut<TaskState<T>>,
    mut physics: ResMut<Physics>,
    mut episode: ResMut<Episode>,
    mut outcome: ResMut<StepOutcome>,
    mut fault: ResMut<EnvFault>,
) {
    if let Err(err) = task.0.after_step(&mut physics) {
        fault.record(err);
        return;
    }
    let reward = match task.0.get_reward(&physics) {
        Ok(r) => r,
        Err(err) => {
            fault.record(err);
            return;
        }
    };
    outcome.reward = reward;
    episode.advance(reward);
    if !episode.check_truncation() {
        if let Some(discount) = task.0.get_termination(&physics) {
            episode.terminate(discount);
        }
    }
}

/// Collects the observation.
///
/// Runs in [`Arm26Set::Observe`](arm26_core::Arm26Set::Observe).
#[allow(clippy::needless_pass_by_value)]
pub fn observe_system<T: Task>(
    task: Res<TaskState<T>>,
    physics: Res<Physics>,
    mut outcome: ResMut<StepOutcome>,
    mut fault: ResMut<EnvFault>,
) {
    match task.0.get_observation(&physics) {
        Ok(obs) => outcome.observation = obs,
        Err(err) => fault.record(err),
    }
}
