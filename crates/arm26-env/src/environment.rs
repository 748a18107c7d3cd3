//! [`Environment`]: reset/step control loop around a Bevy [`App`].

use std::marker::PhantomData;

use bevy::prelude::*;

use arm26_core::Arm26CorePlugin;
use arm26_core::config::{EnvironmentKwargs, step_limit};
use arm26_core::error::ConfigError;
use arm26_core::types::{Action, BoundedArraySpec, Observation, TimeStep};
use arm26_physics::systems::PhysicsFault;
use arm26_physics::{Arm26PhysicsPlugin, Physics};

use crate::episode::Episode;
use crate::error::EnvError;
use crate::plugin::Arm26EnvPlugin;
use crate::systems::{EnvFault, PendingAction, StepOutcome, TaskState};
use crate::task::Task;

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// A task bound to a physics instance, stepped at a fixed control rate.
///
/// Each [`step`](Self::step) runs one `app.update()`: the task applies the
/// action, physics advances `n_sub_steps`, then reward, termination and the
/// observation are read. After a LAST timestep the next `step` resets
/// instead.
///
/// ```ignore
/// let mut env = Environment::new(physics, task, 20.0, &EnvironmentKwargs::default())?;
/// let mut ts = env.reset()?;
/// while !ts.last() {
///     ts = env.step(&Action::zeros(6))?;
/// }
/// ```
pub struct Environment<T: Task> {
    app: App,
    action_spec: BoundedArraySpec,
    n_sub_steps: u32,
    control_timestep: f64,
    flat_observation: bool,
    reset_next_step: bool,
    _task: PhantomData<fn() -> T>,
}

impl<T: Task> Environment<T> {
    /// Build the app and bind `task` to `physics`.
    ///
    /// `time_limit` is in seconds and may be infinite.
    pub fn new(
        physics: Physics,
        task: T,
        time_limit: f64,
        kwargs: &EnvironmentKwargs,
    ) -> Result<Self, EnvError> {
        if time_limit.is_nan() || time_limit <= 0.0 {
            return Err(ConfigError::InvalidTimeLimit(time_limit).into());
        }
        let n_sub_steps = kwargs.resolve_sub_steps(physics.timestep())?;
        let control_timestep = f64::from(n_sub_steps) * physics.timestep();
        let limit = step_limit(time_limit, control_timestep);
        let action_spec = task.action_spec(&physics);

        info!(
            "Environment '{}': control_timestep={control_timestep}s, n_sub_steps={n_sub_steps}, step_limit={limit:?}",
            physics.model().name
        );

        let mut app = App::new();
        app.add_plugins((
            Arm26CorePlugin,
            Arm26PhysicsPlugin::new(n_sub_steps),
            Arm26EnvPlugin::<T>::default(),
        ));
        app.insert_resource(physics)
            .insert_resource(TaskState(task))
            .insert_resource(Episode::with_step_limit(limit));
        app.finish();
        app.cleanup();

        Ok(Self {
            app,
            action_spec,
            n_sub_steps,
            control_timestep,
            flat_observation: kwargs.flat_observation,
            reset_next_step: true,
            _task: PhantomData,
        })
    }

    /// Start a new episode.
    ///
    /// Restores the physics state, lets the task initialize the episode and
    /// returns a FIRST timestep with no reward or discount.
    pub fn reset(&mut self) -> Result<TimeStep, EnvError> {
        self.reset_next_step = true;
        let world = self.app.world_mut();
        world.resource_mut::<EnvFault>().0 = None;
        world.resource_mut::<PhysicsFault>().0 = None;
        world.resource_mut::<PendingAction>().0 = None;

        let observation =
            world.resource_scope(|world, mut physics: Mut<Physics>| -> Result<_, EnvError> {
                let mut task = world.resource_mut::<TaskState<T>>();
                physics.reset_context(|p| task.0.initialize_episode(p))?;
                task.0.get_observation(&physics)
            })?;

        let mut episode = world.resource_mut::<Episode>();
        episode.reset();
        debug!("Episode {} started", episode.episode_number);

        self.reset_next_step = false;
        Ok(TimeStep::restart(self.shape_observation(observation)))
    }

    /// Advance one control step with `action`.
    ///
    /// Calls [`reset`](Self::reset) instead when no episode is in progress.
    /// Any error ends the episode; the following `step` resets.
    pub fn step(&mut self, action: &Action) -> Result<TimeStep, EnvError> {
        if self.reset_next_step {
            return self.reset();
        }
        self.action_spec.validate(action)?;

        self.app.world_mut().resource_mut::<PendingAction>().0 = Some(action.clone());
        self.app.update();
        if let Err(err) = self.take_fault() {
            self.reset_next_step = true;
            return Err(err);
        }

        let world = self.app.world();
        let StepOutcome {
            reward,
            observation,
        } = world.resource::<StepOutcome>().clone();
        let final_discount = world.resource::<Episode>().final_discount;
        let observation = self.shape_observation(observation);

        Ok(match final_discount {
            Some(discount) => {
                let episode = world.resource::<Episode>();
                debug!(
                    "Episode {} ended after {} steps, return {:.3}",
                    episode.episode_number, episode.step_count, episode.total_reward
                );
                self.reset_next_step = true;
                TimeStep::termination(reward, discount, observation)
            }
            None => TimeStep::transition(reward, 1.0, observation),
        })
    }

    fn take_fault(&mut self) -> Result<(), EnvError> {
        let world = self.app.world_mut();
        if let Some(err) = world.resource_mut::<EnvFault>().0.take() {
            return Err(err);
        }
        if let Some(err) = world.resource_mut::<PhysicsFault>().take() {
            return Err(err.into());
        }
        Ok(())
    }

    fn shape_observation(&self, observation: Observation) -> Observation {
        if self.flat_observation {
            observation.into_flat()
        } else {
            observation
        }
    }

    // -- Accessors --

    pub const fn action_spec(&self) -> &BoundedArraySpec {
        &self.action_spec
    }

    /// Seconds of simulated time per [`step`](Self::step).
    pub const fn control_timestep(&self) -> f64 {
        self.control_timestep
    }

    pub const fn n_sub_steps(&self) -> u32 {
        self.n_sub_steps
    }

    pub fn step_limit(&self) -> Option<u64> {
        self.episode().step_limit
    }

    pub fn physics(&self) -> &Physics {
        self.app.world().resource::<Physics>()
    }

    pub fn physics_mut(&mut self) -> &mut Physics {
        self.app.world_mut().resource_mut::<Physics>().into_inner()
    }

    pub fn task(&self) -> &T {
        &self.app.world().resource::<TaskState<T>>().0
    }

    pub fn task_mut(&mut self) -> &mut T {
        &mut self.app.world_mut().resource_mut::<TaskState<T>>().into_inner().0
    }

    pub fn episode(&self) -> &Episode {
        self.app.world().resource::<Episode>()
    }

    pub const fn app(&self) -> &App {
        &self.app
    }

    pub const fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}
