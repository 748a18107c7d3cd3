//! Render one Arm26 reaching episode per muscle.
//!
//! Each run resets the task and drives a single muscle at full activation
//! until the episode ends, writing `<out_dir>/<muscle>.gif`.
//!
//! ```text
//! arm26-render-runs --task hard --seed 3 --out-dir runs/
//! RUST_LOG=debug arm26-render-runs --config runs.toml
//! ```

mod config;
mod runs;

use std::path::PathBuf;

use anyhow::Result;
use bevy::log::info;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::RunConfig;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Render one GIF per muscle of the Arm26 reaching task.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// TOML file with run settings; flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Task level (`easy` or `hard`).
    #[arg(short, long)]
    task: Option<String>,

    /// Episode length in seconds.
    #[arg(long)]
    time_limit: Option<f64>,

    /// Random seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory videos are written to.
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Video frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Keep one rendered frame out of every N.
    #[arg(long)]
    frame_stride: Option<usize>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Camera index.
    #[arg(long)]
    camera: Option<usize>,

    /// Leave the arm its default colour instead of shading it by reward.
    #[arg(long)]
    no_visualize_reward: bool,
}

impl Cli {
    fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(task) = self.task {
            config.task = task;
        }
        if let Some(time_limit) = self.time_limit {
            config.time_limit = time_limit;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(out_dir) = self.out_dir {
            config.out_dir = out_dir;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(stride) = self.frame_stride {
            config.frame_stride = stride;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(camera) = self.camera {
            config.camera = camera;
        }
        if self.no_visualize_reward {
            config.visualize_reward = false;
        }
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config()?;
    info!(
        "Rendering arm26/{} for {}s into {}",
        config.task,
        config.time_limit,
        config.out_dir.display()
    );
    let runs = runs::run_all(&config)?;
    info!("Wrote {} videos", runs.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "arm26-render-runs",
            "--task",
            "hard",
            "--seed",
            "9",
            "--frame-stride",
            "3",
            "--no-visualize-reward",
        ]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.task, "hard");
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.frame_stride, 3);
        assert!(!config.visualize_reward);
        assert_eq!(config.fps, 60);
    }

    #[test]
    fn invalid_override_rejected() {
        let cli = Cli::parse_from(["arm26-render-runs", "--fps", "0"]);
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
