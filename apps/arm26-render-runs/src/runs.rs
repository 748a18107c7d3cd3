//! One rendered episode per muscle.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use bevy::log::{debug, info};

use arm26_core::types::Action;
use arm26_env::{Environment, Task};
use arm26_record::write_video;
use arm26_render::{FrameBuffer, Renderer};
use arm26_suite::{MUSCLE_NAMES, load};

use crate::config::RunConfig;

/// Result of one muscle's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuscleRun {
    pub muscle: &'static str,
    pub path: PathBuf,
    pub steps: usize,
    pub frames_written: usize,
}

/// Reset, then hold `action` until the episode ends, rendering after the
/// reset and after every step.
pub fn render_episode<T: Task>(
    env: &mut Environment<T>,
    action: &Action,
    renderer: &Renderer,
) -> Result<Vec<FrameBuffer>> {
    let mut ts = env.reset()?;
    let mut frames = vec![renderer.render(env.physics())?];
    while !ts.last() {
        ts = env.step(action)?;
        frames.push(renderer.render(env.physics())?);
    }
    Ok(frames)
}

/// One single-muscle drive per entry of [`MUSCLE_NAMES`].
///
/// Fails when the action size does not match the muscle list.
pub fn muscle_actions(n_muscles: usize) -> Result<Vec<(&'static str, Action)>> {
    ensure!(
        n_muscles == MUSCLE_NAMES.len(),
        "model has {n_muscles} muscle actuators, expected {}",
        MUSCLE_NAMES.len()
    );
    Ok(MUSCLE_NAMES
        .iter()
        .enumerate()
        .map(|(k, &muscle)| (muscle, Action::one_hot(n_muscles, k)))
        .collect())
}

/// Render every muscle in turn into `config.out_dir`.
///
/// Stops at the first error; files already written are left in place.
pub fn run_all(config: &RunConfig) -> Result<Vec<MuscleRun>> {
    config.validate()?;
    std::fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating {}", config.out_dir.display()))?;

    let mut env = load(
        &config.task,
        config.task_kwargs(),
        None,
        config.visualize_reward,
    )?;
    let renderer = Renderer::new(config.render());
    let video = config.video();
    let actions = muscle_actions(env.action_spec().minimum.len())?;

    let mut runs = Vec::with_capacity(actions.len());
    for (muscle, action) in actions {
        let frames = render_episode(&mut env, &action, &renderer)
            .with_context(|| format!("rendering muscle {muscle}"))?;
        debug!("{muscle}: {} frames rendered", frames.len());

        let path = config.out_dir.join(format!("{muscle}.gif"));
        let frames_written = write_video(&path, &frames, &video)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("{muscle}: wrote {frames_written} frames to {}", path.display());

        runs.push(MuscleRun {
            muscle,
            path,
            steps: frames.len() - 1,
            frames_written,
        });
    }
    Ok(runs)
}
