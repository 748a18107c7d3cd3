//! The Arm26 reaching domain.
//!
//! A planar two-joint arm driven by six muscles must touch a target placed
//! at random in front of it. Two variants differ only in target size:
//!
//! | Task   | Target radius | Tags                    |
//! |--------|---------------|-------------------------|
//! | `easy` | 0.15          | `benchmarking`, `easy`  |
//! | `hard` | 0.045         | `benchmarking`          |
//!
//! # Example
//!
//! ```no_run
//! use arm26_core::config::TaskKwargs;
//! use arm26_core::types::Action;
//!
//! let mut env = arm26_suite::load("easy", TaskKwargs::default().with_seed(0), None, false)?;
//! let mut ts = env.reset()?;
//! while !ts.last() {
//!     ts = env.step(&Action::one_hot(6, 0))?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod arm26;
pub mod error;
pub mod reacher;
pub mod registry;
pub mod visualize;

use bevy::log::info;

use arm26_core::config::{EnvironmentKwargs, TaskKwargs};
use arm26_env::Environment;
use arm26_physics::Physics;
use arm26_physics::resources::get_model_and_assets;

pub use arm26::Arm26;
pub use error::SuiteError;
pub use registry::{ALL_TASKS, Registry, TaskVariant};

/// Episode length in seconds unless overridden.
pub const DEFAULT_TIME_LIMIT: f64 = 20.0;
/// Target radius of the `easy` task.
pub const BIG_TARGET: f64 = 0.15;
/// Target radius of the `hard` task.
pub const SMALL_TARGET: f64 = 0.045;

/// Muscle names in actuator order.
pub const MUSCLE_NAMES: [&str; 6] = ["SF", "SE", "EF", "EE", "BF", "BE"];

/// Build the environment for `variant`.
pub fn build(
    variant: TaskVariant,
    task_kwargs: &TaskKwargs,
    environment_kwargs: &EnvironmentKwargs,
) -> Result<Environment<Arm26>, SuiteError> {
    task_kwargs.validate()?;
    let (model, assets) = get_model_and_assets()?;
    let physics = Physics::from_toml(model, &assets)?;
    let time_limit = task_kwargs.time_limit.unwrap_or(DEFAULT_TIME_LIMIT);
    let task = Arm26::new(variant.target_size(), task_kwargs.seed.into());
    info!(
        "Loading arm26/{} (target_size={}, time_limit={time_limit}s, seed={})",
        variant.name(),
        variant.target_size(),
        task.seed()
    );
    Ok(Environment::new(physics, task, time_limit, environment_kwargs)?)
}

/// The `easy` task.
pub fn easy(
    task_kwargs: &TaskKwargs,
    environment_kwargs: &EnvironmentKwargs,
) -> Result<Environment<Arm26>, SuiteError> {
    build(TaskVariant::Easy, task_kwargs, environment_kwargs)
}

/// The `hard` task.
pub fn hard(
    task_kwargs: &TaskKwargs,
    environment_kwargs: &EnvironmentKwargs,
) -> Result<Environment<Arm26>, SuiteError> {
    build(TaskVariant::Hard, task_kwargs, environment_kwargs)
}

/// Load a task by name.
///
/// Unknown names fail before anything is built. `visualize_reward` turns on
/// reward colouring of the arm in rendered frames.
pub fn load(
    task_name: &str,
    task_kwargs: TaskKwargs,
    environment_kwargs: Option<EnvironmentKwargs>,
    visualize_reward: bool,
) -> Result<Environment<Arm26>, SuiteError> {
    let registry = Registry::new();
    let variant = registry
        .get(task_name)
        .ok_or_else(|| SuiteError::UnknownTask {
            name: task_name.to_owned(),
        })?;
    let mut env = build(
        variant,
        &task_kwargs,
        &environment_kwargs.unwrap_or_default(),
    )?;
    env.task_mut().set_visualize_reward(visualize_reward);
    Ok(env)
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ALL_TASKS, Arm26, BIG_TARGET, DEFAULT_TIME_LIMIT, MUSCLE_NAMES, Registry, SMALL_TARGET,
        SuiteError, TaskVariant, load,
    };
}
