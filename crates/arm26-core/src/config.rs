//! Task and environment configuration.
//!
//! [`TaskKwargs`] and [`EnvironmentKwargs`] are the two option bags accepted
//! when loading an environment. Both deserialize from TOML so that runs can
//! be configured from a file as well as in code.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tolerance used when checking that a control timestep is an integer
/// multiple of the physics timestep.
const SUB_STEP_TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// TaskKwargs
// ---------------------------------------------------------------------------

/// Per-task options: episode time limit and random seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskKwargs {
    /// Episode length in seconds of simulated time. `None` keeps the task
    /// default.
    pub time_limit: Option<f64>,

    /// Seed for the task's random source. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl TaskKwargs {
    /// Builder: set the time limit.
    #[must_use]
    pub const fn with_time_limit(mut self, time_limit: f64) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Builder: set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limit) = self.time_limit {
            // +inf is a legal "never truncate" limit.
            if limit.is_nan() || limit <= 0.0 {
                return Err(ConfigError::InvalidTimeLimit(limit));
            }
        }
        Ok(())
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let kwargs: Self = toml::from_str(content)?;
        kwargs.validate()?;
        Ok(kwargs)
    }
}

// ---------------------------------------------------------------------------
// EnvironmentKwargs
// ---------------------------------------------------------------------------

/// Options forwarded to the control environment wrapper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentKwargs {
    /// Duration of one agent step in seconds. Must be a multiple of the
    /// physics timestep. Mutually exclusive with `n_sub_steps`.
    pub control_timestep: Option<f64>,

    /// Number of physics steps per agent step. Mutually exclusive with
    /// `control_timestep`.
    pub n_sub_steps: Option<u32>,

    /// Concatenate all observation fields into a single flat entry.
    pub flat_observation: bool,
}

impl EnvironmentKwargs {
    /// Builder: set the control timestep.
    #[must_use]
    pub const fn with_control_timestep(mut self, control_timestep: f64) -> Self {
        self.control_timestep = Some(control_timestep);
        self
    }

    /// Builder: set the number of physics sub-steps.
    #[must_use]
    pub const fn with_n_sub_steps(mut self, n_sub_steps: u32) -> Self {
        self.n_sub_steps = Some(n_sub_steps);
        self
    }

    /// Builder: request flat observations.
    #[must_use]
    pub const fn with_flat_observation(mut self, flat: bool) -> Self {
        self.flat_observation = flat;
        self
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.control_timestep.is_some() && self.n_sub_steps.is_some() {
            return Err(ConfigError::Incompatible(
                "both control_timestep and n_sub_steps were set".into(),
            ));
        }
        if let Some(dt) = self.control_timestep
            && (!dt.is_finite() || dt <= 0.0)
        {
            return Err(ConfigError::InvalidControlTimestep(dt));
        }
        if self.n_sub_steps == Some(0) {
            return Err(ConfigError::ZeroSubSteps);
        }
        Ok(())
    }

    /// Number of physics steps per control step given the physics timestep.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resolve_sub_steps(&self, physics_timestep: f64) -> Result<u32, ConfigError> {
        self.validate()?;
        if let Some(n) = self.n_sub_steps {
            return Ok(n);
        }
        let Some(control) = self.control_timestep else {
            return Ok(1);
        };
        let ratio = control / physics_timestep;
        let rounded = ratio.round();
        if rounded < 1.0 || (ratio - rounded).abs() > SUB_STEP_TOLERANCE {
            return Err(ConfigError::TimestepNotMultiple {
                control,
                physics: physics_timestep,
            });
        }
        Ok(rounded as u32)
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let kwargs: Self = toml::from_str(content)?;
        kwargs.validate()?;
        Ok(kwargs)
    }
}

// ---------------------------------------------------------------------------
// Step limit
// ---------------------------------------------------------------------------

/// Number of agent steps after which an episode with the given time limit
/// ends. `None` means the episode never truncates.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn step_limit(time_limit: f64, control_timestep: f64) -> Option<u64> {
    if time_limit.is_infinite() {
        return None;
    }
    let steps = (time_limit / control_timestep - SUB_STEP_TOLERANCE).ceil();
    Some(steps.max(1.0) as u64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
