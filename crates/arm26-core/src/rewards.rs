//! Smooth reward shaping.
//!
//! [`tolerance`] returns 1 inside `[lower, upper]` and decays outside it over
//! `margin` following a [`Sigmoid`], reaching `value_at_margin` at distance
//! `margin` from the nearest bound.

use std::f64::consts::PI;

use crate::error::ToleranceError;

/// Default value reached at the margin.
pub const DEFAULT_VALUE_AT_MARGIN: f64 = 0.1;

// ---------------------------------------------------------------------------
// Sigmoid
// ---------------------------------------------------------------------------

/// Shape of the decay outside the bounds.
///
/// Each maps a normalized distance `x >= 0` to `(0, 1]`, with `f(0) = 1` and
/// `f(1) = value_at_1`. The bounded kinds (`Cosine`, `Linear`, `Quadratic`)
/// reach exactly zero and accept `value_at_1 = 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Sigmoid {
    #[default]
    Gaussian,
    Hyperbolic,
    LongTail,
    Reciprocal,
    Cosine,
    Linear,
    Quadratic,
    TanhSquared,
}

impl Sigmoid {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Hyperbolic => "hyperbolic",
            Self::LongTail => "long_tail",
            Self::Reciprocal => "reciprocal",
            Self::Cosine => "cosine",
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::TanhSquared => "tanh_squared",
        }
    }

    const fn bounded(self) -> bool {
        matches!(self, Self::Cosine | Self::Linear | Self::Quadratic)
    }

    fn check(self, value_at_1: f64) -> Result<(), ToleranceError> {
        let ok = if self.bounded() {
            (0.0..1.0).contains(&value_at_1)
        } else {
            value_at_1 > 0.0 && value_at_1 < 1.0
        };
        if ok {
            Ok(())
        } else {
            Err(ToleranceError::ValueAtMargin {
                value: value_at_1,
                sigmoid: self.name(),
            })
        }
    }

    /// Evaluate at `x`, scaled so that `f(1) = value_at_1`.
    pub fn eval(self, x: f64, value_at_1: f64) -> Result<f64, ToleranceError> {
        self.check(value_at_1)?;
        let v = value_at_1;
        Ok(match self {
            Self::Gaussian => {
                let scale = (-2.0 * v.ln()).sqrt();
                (-0.5 * (x * scale).powi(2)).exp()
            }
            Self::Hyperbolic => {
                let scale = (1.0 / v).acosh();
                1.0 / (x * scale).cosh()
            }
            Self::LongTail => {
                let scale = (1.0 / v - 1.0).sqrt();
                1.0 / ((x * scale).powi(2) + 1.0)
            }
            Self::Reciprocal => {
                let scale = 1.0 / v - 1.0;
                1.0 / (x.abs() * scale + 1.0)
            }
            Self::Cosine => {
                let sx = x * (2.0 * v - 1.0).acos() / PI;
                if sx.abs() < 1.0 {
                    (1.0 + (PI * sx).cos()) / 2.0
                } else {
                    0.0
                }
            }
            Self::Linear => {
                let sx = x * (1.0 - v);
                if sx.abs() < 1.0 { 1.0 - sx } else { 0.0 }
            }
            Self::Quadratic => {
                let sx = x * (1.0 - v).sqrt();
                if sx.abs() < 1.0 { 1.0 - sx * sx } else { 0.0 }
            }
            Self::TanhSquared => {
                let scale = (1.0 - v).sqrt().atanh();
                1.0 - (x * scale).tanh().powi(2)
            }
        })
    }
}

// ---------------------------------------------------------------------------
// tolerance
// ---------------------------------------------------------------------------

/// 1 when `x` lies in `bounds`, otherwise a sigmoid of the distance to the
/// nearest bound divided by `margin`. With `margin == 0` the result is a
/// step: 1 inside, 0 outside.
pub fn tolerance(
    x: f64,
    bounds: (f64, f64),
    margin: f64,
    sigmoid: Sigmoid,
    value_at_margin: f64,
) -> Result<f64, ToleranceError> {
    let (lower, upper) = bounds;
    if lower > upper {
        return Err(ToleranceError::BoundsOrder { lower, upper });
    }
    if margin < 0.0 {
        return Err(ToleranceError::NegativeMargin(margin));
    }

    let in_bounds = lower <= x && x <= upper;
    if in_bounds {
        return Ok(1.0);
    }
    if margin == 0.0 {
        return Ok(0.0);
    }
    let d = (if x < lower { lower - x } else { x - upper }) / margin;
    sigmoid.eval(d, value_at_margin)
}

/// [`tolerance`] with zero margin: an indicator of `x` lying in `bounds`.
pub fn in_bounds(x: f64, bounds: (f64, f64)) -> Result<f64, ToleranceError> {
    tolerance(x, bounds, 0.0, Sigmoid::Gaussian, DEFAULT_VALUE_AT_MARGIN)
}
