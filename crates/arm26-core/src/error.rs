use thiserror::Error;

/// Top-level error type for arm26-core.
#[derive(Debug, Error)]
pub enum Arm26Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Tolerance error: {0}")]
    Tolerance(#[from] ToleranceError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid time_limit: {0} (must be > 0)")]
    InvalidTimeLimit(f64),

    #[error("Invalid control_timestep: {0} (must be > 0)")]
    InvalidControlTimestep(f64),

    #[error("n_sub_steps must be >= 1")]
    ZeroSubSteps,

    #[error("control_timestep {control} is not a multiple of physics timestep {physics}")]
    TimestepNotMultiple { control: f64, physics: f64 },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Incompatible configuration: {0}")]
    Incompatible(String),
}

/// Action/observation validation errors.
///
/// Copy + static messages for cheap propagation in hot paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Action dimension mismatch: expected {expected}, got {got}")]
    ActionDimMismatch { expected: usize, got: usize },

    #[error("Action contains NaN")]
    ActionContainsNan,

    #[error("Action contains Inf")]
    ActionContainsInf,
}

/// Invalid arguments to [`tolerance`](crate::rewards::tolerance).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ToleranceError {
    #[error("Lower bound {lower} exceeds upper bound {upper}")]
    BoundsOrder { lower: f64, upper: f64 },

    #[error("Margin must be non-negative, got {0}")]
    NegativeMargin(f64),

    #[error("value_at_margin {value} is outside the range allowed by the {sigmoid} sigmoid")]
    ValueAtMargin { value: f64, sigmoid: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm26_error_from_config_error() {
        let err = ConfigError::InvalidTimeLimit(-1.0);
        let top: Arm26Error = err.into();
        assert!(matches!(top, Arm26Error::Config(_)));
        assert!(top.to_string().contains("-1"));
    }

    #[test]
    fn arm26_error_from_validation_error() {
        let err = ValidationError::ActionContainsNan;
        let top: Arm26Error = err.into();
        assert!(matches!(top, Arm26Error::Validation(_)));
    }

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let config_err: ConfigError = io_err.into();
        assert!(matches!(config_err, ConfigError::Io(_)));
    }

    #[test]
    fn timestep_error_names_both_values() {
        let err = ConfigError::TimestepNotMultiple {
            control: 0.013,
            physics: 0.005,
        };
        let msg = err.to_string();
        assert!(msg.contains("0.013"));
        assert!(msg.contains("0.005"));
    }

    #[test]
    fn validation_error_display_messages() {
        assert_eq!(
            ValidationError::ActionDimMismatch {
                expected: 6,
                got: 3
            }
            .to_string(),
            "Action dimension mismatch: expected 6, got 3"
        );
        assert_eq!(
            ValidationError::ActionContainsNan.to_string(),
            "Action contains NaN"
        );
        assert_eq!(
            ValidationError::ActionContainsInf.to_string(),
            "Action contains Inf"
        );
    }
}
