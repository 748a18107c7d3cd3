//! Control environment for Arm26 tasks.
//!
//! [`Environment`] owns a Bevy [`App`](bevy::app::App) holding the
//! [`Physics`](arm26_physics::Physics) resource and a [`Task`]. `reset()`
//! initializes an episode directly on the world; `step()` queues the action
//! and runs one update through the [`Arm26Set`](arm26_core::Arm26Set)
//! phases.
//!
//! Timesteps follow the usual control-suite protocol: FIRST on reset with no
//! reward or discount, MID with discount 1, and LAST either when the task
//! terminates (task discount) or at the step limit (discount 1).

pub mod environment;
pub mod episode;
pub mod error;
pub mod plugin;
pub mod systems;
pub mod task;

pub use environment::Environment;
pub use error::EnvError;
pub use task::Task;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Environment, EnvError, Task,
        episode::{Episode, EpisodeState},
        plugin::Arm26EnvPlugin,
        systems::{EnvFault, PendingAction, StepOutcome, TaskState},
    };
}
