//! Run settings: defaults, TOML overlay and command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use arm26_core::config::TaskKwargs;
use arm26_record::VideoConfig;
use arm26_render::RenderConfig;

/// Everything one batch of muscle runs needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub task: String,
    /// Episode length in seconds.
    pub time_limit: f64,
    pub seed: Option<u64>,
    pub out_dir: PathBuf,
    pub fps: u32,
    pub frame_stride: usize,
    pub width: u32,
    pub height: u32,
    pub camera: usize,
    pub visualize_reward: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            task: "easy".into(),
            time_limit: 2.0,
            seed: None,
            out_dir: PathBuf::from("./arm26-video-runs"),
            fps: VideoConfig::DEFAULT_FPS,
            frame_stride: VideoConfig::DEFAULT_STRIDE,
            width: 320,
            height: 240,
            camera: 0,
            visualize_reward: true,
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("parsing run config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_limit.is_nan() || self.time_limit <= 0.0 || self.time_limit.is_infinite() {
            bail!("time_limit must be positive and finite, got {}", self.time_limit);
        }
        if self.width == 0 || self.height == 0 {
            bail!("frame size must be nonzero, got {}x{}", self.width, self.height);
        }
        self.video().validate()?;
        Ok(())
    }

    pub fn task_kwargs(&self) -> TaskKwargs {
        let kwargs = TaskKwargs::default().with_time_limit(self.time_limit);
        match self.seed {
            Some(seed) => kwargs.with_seed(seed),
            None => kwargs,
        }
    }

    pub const fn video(&self) -> VideoConfig {
        VideoConfig::new(self.fps, self.frame_stride)
    }

    pub const fn render(&self) -> RenderConfig {
        RenderConfig::new(self.width, self.height).with_camera(self.camera)
    }
}
