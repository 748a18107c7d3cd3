//! The Arm26 task: reach a randomly placed target with a six-muscle arm.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use bevy::log::debug;
use nalgebra::Vector2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arm26_core::seed::RandomSource;
use arm26_core::types::{Action, BoundedArraySpec, Observation};
use arm26_domain_rand::randomize_limited_and_rotational_joints;
use arm26_domain_rand::ranges::RandomizationRange;
use arm26_env::{EnvError, Task};
use arm26_physics::Physics;

use crate::{reacher, visualize};

/// Polar angle of the target, measured from +y towards +x.
pub const TARGET_ANGLE: RandomizationRange = RandomizationRange::Uniform {
    low: -FRAC_PI_2,
    high: FRAC_PI_4,
};

/// Distance of the target from the shoulder.
pub const TARGET_RADIUS: RandomizationRange = RandomizationRange::Uniform {
    low: 0.3,
    high: 1.0,
};

/// Target placement drawn for one episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSample {
    pub angle: f64,
    pub radius: f64,
}

impl TargetSample {
    /// Planar position: `x = r sin(angle)`, `y = r cos(angle)`.
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(
            self.radius * self.angle.sin(),
            self.radius * self.angle.cos(),
        )
    }
}

/// Draw the angle, then the radius.
pub fn sample_target<R: Rng + ?Sized>(rng: &mut R) -> TargetSample {
    let angle = TARGET_ANGLE.sample(rng);
    let radius = TARGET_RADIUS.sample(rng);
    TargetSample { angle, radius }
}

// ---------------------------------------------------------------------------
// Arm26
// ---------------------------------------------------------------------------

/// Reaching task with a fixed target size.
pub struct Arm26 {
    target_size: f64,
    seed: u64,
    rng: ChaCha8Rng,
    visualize_reward: bool,
    last_target: Option<TargetSample>,
}

impl Arm26 {
    pub fn new(target_size: f64, random: RandomSource) -> Self {
        let seed = random.seed();
        Self {
            target_size,
            seed,
            rng: RandomSource::Seed(seed).rng(),
            visualize_reward: false,
            last_target: None,
        }
    }

    pub const fn target_size(&self) -> f64 {
        self.target_size
    }

    /// Seed the task's RNG was built from.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub const fn visualize_reward(&self) -> bool {
        self.visualize_reward
    }

    pub const fn set_visualize_reward(&mut self, on: bool) {
        self.visualize_reward = on;
    }

    /// Target drawn at the most recent reset.
    pub const fn last_target(&self) -> Option<TargetSample> {
        self.last_target
    }
}

impl Task for Arm26 {
    fn initialize_episode(&mut self, physics: &mut Physics) -> Result<(), EnvError> {
        physics.geom_size_mut("target")?[0] = self.target_size;
        randomize_limited_and_rotational_joints(physics, &mut self.rng)?;

        let target = sample_target(&mut self.rng);
        let pos = target.position();
        let body = physics.body_pos_mut("target")?;
        body.x = pos.x;
        body.y = pos.y;
        self.last_target = Some(target);
        debug!(
            "Arm26 episode: target at ({:.3}, {:.3}), angle {:.3}, radius {:.3}",
            pos.x, pos.y, target.angle, target.radius
        );

        reacher::initialize_episode(physics)
    }

    fn before_step(&mut self, action: &Action, physics: &mut Physics) -> Result<(), EnvError> {
        physics.set_control(action.as_slice())?;
        Ok(())
    }

    fn after_step(&mut self, physics: &mut Physics) -> Result<(), EnvError> {
        if self.visualize_reward {
            let reward = reacher::reward(physics)?;
            visualize::visualize_reward(physics, reward)?;
        }
        Ok(())
    }

    fn get_observation(&self, physics: &Physics) -> Result<Observation, EnvError> {
        reacher::observation(physics)
    }

    fn get_reward(&self, physics: &Physics) -> Result<f32, EnvError> {
        reacher::reward(physics)
    }

    fn action_spec(&self, physics: &Physics) -> BoundedArraySpec {
        reacher::action_spec(physics)
    }
}
