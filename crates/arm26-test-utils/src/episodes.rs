//! Rollout helpers: run one full episode with a constant action.

use thiserror::Error;

use arm26_core::types::{Action, TimeStep};
use arm26_env::{EnvError, Environment, Task};
use arm26_render::{FrameBuffer, RenderError, Renderer};

/// Errors from a rollout.
#[derive(Debug, Error)]
pub enum RolloutError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Every timestep of one episode, FIRST through LAST, and optionally one
/// frame per timestep.
#[derive(Debug, Clone, Default)]
pub struct Rollout {
    pub timesteps: Vec<TimeStep>,
    pub frames: Vec<FrameBuffer>,
}

impl Rollout {
    /// Number of `step` calls taken.
    pub fn steps(&self) -> usize {
        self.timesteps.len().saturating_sub(1)
    }

    /// Sum of rewards over the episode.
    pub fn total_reward(&self) -> f64 {
        self.timesteps
            .iter()
            .filter_map(|ts| ts.reward)
            .map(f64::from)
            .sum()
    }
}

/// Reset, then step with `action` until the episode ends.
pub fn rollout<T: Task>(env: &mut Environment<T>, action: &Action) -> Result<Rollout, EnvError> {
    let mut ts = env.reset()?;
    let mut out = Rollout::default();
    while !ts.last() {
        out.timesteps.push(ts);
        ts = env.step(action)?;
    }
    out.timesteps.push(ts);
    Ok(out)
}

/// Like [`rollout`], rendering a frame after the reset and after every step.
pub fn rollout_with_frames<T: Task>(
    env: &mut Environment<T>,
    action: &Action,
    renderer: &Renderer,
) -> Result<Rollout, RolloutError> {
    let mut ts = env.reset()?;
    let mut out = Rollout::default();
    out.frames.push(renderer.render(env.physics())?);
    while !ts.last() {
        out.timesteps.push(ts);
        ts = env.step(action)?;
        out.frames.push(renderer.render(env.physics())?);
    }
    out.timesteps.push(ts);
    Ok(out)
}
