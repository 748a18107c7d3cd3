//! Environment protocol tests with a minimal reaching-style task.

use arm26_core::config::EnvironmentKwargs;
use arm26_core::error::{ConfigError, ValidationError};
use arm26_core::types::{Action, BoundedArraySpec, Observation, StepType};
use arm26_env::prelude::*;
use arm26_physics::{Physics, PhysicsError};

/// Puts the target at a fixed spot and rewards closeness.
struct Reach {
    target: (f64, f64),
    resets: u32,
    terminate_at: Option<f64>,
}

impl Reach {
    fn new() -> Self {
        Self {
            target: (0.2, 0.6),
            resets: 0,
            terminate_at: None,
        }
    }
}

impl Task for Reach {
    fn initialize_episode(&mut self, physics: &mut Physics) -> Result<(), EnvError> {
        self.resets += 1;
        let pos = physics.body_pos_mut("target")?;
        pos.x = self.target.0;
        pos.y = self.target.1;
        physics.qpos_mut()[0] = 0.5;
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn get_observation(&self, physics: &Physics) -> Result<Observation, EnvError> {
        let to_target = physics.finger_to_target()?;
        Ok(Observation::new()
            .with("position", physics.position().iter().map(|&q| q as f32).collect())
            .with("to_target", vec![to_target.x as f32, to_target.y as f32])
            .with("velocity", physics.velocity().iter().map(|&v| v as f32).collect()))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn get_reward(&self, physics: &Physics) -> Result<f32, EnvError> {
        Ok((-physics.finger_to_target_dist()?) as f32)
    }

    fn get_termination(&self, physics: &Physics) -> Option<f32> {
        self.terminate_at
            .filter(|&t| physics.time() >= t - 1e-9)
            .map(|_| 0.0)
    }

    fn action_spec(&self, physics: &Physics) -> BoundedArraySpec {
        BoundedArraySpec::uniform("muscles", physics.model().nu(), 0.0, 1.0)
    }
}

fn env(time_limit: f64, kwargs: &EnvironmentKwargs) -> Environment<Reach> {
    Environment::new(Physics::arm26().unwrap(), Reach::new(), time_limit, kwargs).unwrap()
}

#[test]
fn reset_returns_first_without_reward() {
    let mut env = env(1.0, &EnvironmentKwargs::default());
    let ts = env.reset().unwrap();
    assert_eq!(ts.step_type, StepType::First);
    assert_eq!(ts.reward, None);
    assert_eq!(ts.discount, None);
    let names: Vec<_> = ts.observation.names().collect();
    assert_eq!(names, ["position", "to_target", "velocity"]);
    assert!((ts.observation.get("position").unwrap()[0] - 0.5).abs() < 1e-6);
    assert_eq!(env.task().resets, 1);
}

#[test]
fn step_before_reset_resets() {
    let mut env = env(1.0, &EnvironmentKwargs::default());
    let ts = env.step(&Action::zeros(6)).unwrap();
    assert!(ts.first());
}

#[test]
fn episode_length_matches_time_limit() {
    let mut env = env(0.1, &EnvironmentKwargs::default());
    assert_eq!(env.step_limit(), Some(20));
    let mut ts = env.reset().unwrap();
    let mut steps = 0;
    while !ts.last() {
        ts = env.step(&Action::zeros(6)).unwrap();
        steps += 1;
        if !ts.last() {
            assert_eq!(ts.discount, Some(1.0));
        }
    }
    assert_eq!(steps, 20);
    assert_eq!(ts.discount, Some(1.0));
    assert!((env.physics().time() - 0.1).abs() < 1e-9);
}

#[test]
fn step_after_last_auto_resets() {
    let mut env = env(0.01, &EnvironmentKwargs::default());
    env.reset().unwrap();
    assert!(env.step(&Action::zeros(6)).unwrap().mid());
    assert!(env.step(&Action::zeros(6)).unwrap().last());
    let ts = env.step(&Action::zeros(6)).unwrap();
    assert!(ts.first());
    assert_eq!(env.task().resets, 2);
    assert!(env.physics().time().abs() < 1e-12);
}

#[test]
fn n_sub_steps_scales_control_timestep() {
    let kwargs = EnvironmentKwargs::default().with_n_sub_steps(4);
    let mut env = env(0.1, &kwargs);
    assert!((env.control_timestep() - 0.02).abs() < 1e-12);
    assert_eq!(env.step_limit(), Some(5));
    env.reset().unwrap();
    env.step(&Action::zeros(6)).unwrap();
    assert!((env.physics().time() - 0.02).abs() < 1e-9);
}

#[test]
fn control_timestep_resolves_sub_steps() {
    let kwargs = EnvironmentKwargs::default().with_control_timestep(0.01);
    let env = env(1.0, &kwargs);
    assert_eq!(env.n_sub_steps(), 2);
}

#[test]
fn flat_observation_single_field() {
    let kwargs = EnvironmentKwargs::default().with_flat_observation(true);
    let mut env = env(1.0, &kwargs);
    let ts = env.reset().unwrap();
    assert_eq!(ts.observation.num_fields(), 1);
    assert_eq!(ts.observation.get("observations").unwrap().len(), 6);
}

#[test]
fn task_termination_ends_with_task_discount() {
    let mut env = env(10.0, &EnvironmentKwargs::default());
    env.task_mut().terminate_at = Some(0.015);
    env.reset().unwrap();
    let mut ts = env.step(&Action::zeros(6)).unwrap();
    let mut steps = 1;
    while !ts.last() {
        ts = env.step(&Action::zeros(6)).unwrap();
        steps += 1;
    }
    assert_eq!(steps, 3);
    assert_eq!(ts.discount, Some(0.0));
}

#[test]
fn infinite_time_limit_never_truncates() {
    let mut env = env(f64::INFINITY, &EnvironmentKwargs::default());
    assert_eq!(env.step_limit(), None);
    env.reset().unwrap();
    for _ in 0..50 {
        assert!(env.step(&Action::zeros(6)).unwrap().mid());
    }
}

#[test]
fn invalid_time_limit_rejected() {
    for t in [0.0, -1.0, f64::NAN] {
        let result = Environment::new(
            Physics::arm26().unwrap(),
            Reach::new(),
            t,
            &EnvironmentKwargs::default(),
        );
        assert!(matches!(
            result,
            Err(EnvError::Config(ConfigError::InvalidTimeLimit(_)))
        ));
    }
}

#[test]
fn wrong_action_size_rejected_without_stepping() {
    let mut env = env(1.0, &EnvironmentKwargs::default());
    env.reset().unwrap();
    let err = env.step(&Action::zeros(3)).unwrap_err();
    assert!(matches!(
        err,
        EnvError::Action(ValidationError::ActionDimMismatch {
            expected: 6,
            got: 3
        })
    ));
    assert!(env.physics().time().abs() < 1e-12);
    assert!(env.step(&Action::zeros(6)).unwrap().mid());
}

#[test]
fn missing_target_is_fatal_on_reset() {
    struct NoTarget;
    impl Task for NoTarget {
        fn initialize_episode(&mut self, physics: &mut Physics) -> Result<(), EnvError> {
            physics.geom_size_mut("nowhere")?[0] = 1.0;
            Ok(())
        }
        fn get_observation(&self, _: &Physics) -> Result<Observation, EnvError> {
            Ok(Observation::new())
        }
        fn get_reward(&self, _: &Physics) -> Result<f32, EnvError> {
            Ok(0.0)
        }
        fn action_spec(&self, physics: &Physics) -> BoundedArraySpec {
            BoundedArraySpec::uniform("a", physics.model().nu(), 0.0, 1.0)
        }
    }

    let mut env = Environment::new(
        Physics::arm26().unwrap(),
        NoTarget,
        1.0,
        &EnvironmentKwargs::default(),
    )
    .unwrap();
    let err = env.reset().unwrap_err();
    assert!(matches!(
        err,
        EnvError::Physics(PhysicsError::UnknownName { kind: "geom", .. })
    ));
}

#[test]
fn actions_reach_physics_controls() {
    let mut env = env(1.0, &EnvironmentKwargs::default());
    env.reset().unwrap();
    env.step(&Action::one_hot(6, 4)).unwrap();
    assert!((env.physics().ctrl()[4] - 1.0).abs() < 1e-12);
    assert!(env.physics().act()[4] > 0.0);
}

#[test]
fn task_owned_by_environment_is_typed() {
    let mut env = env(0.1, &EnvironmentKwargs::default());
    env.task_mut().target = (-0.3, 0.5);
    env.reset().unwrap();
    env.reset().unwrap();

    let task: &Reach = env.task();
    assert_eq!(task.resets, 2);
    let pos = env.physics().body_pos("target").unwrap();
    assert!((pos.x + 0.3).abs() < 1e-12 && (pos.y - 0.5).abs() < 1e-12);
    assert_eq!(env.step_limit(), Some(20));
}
