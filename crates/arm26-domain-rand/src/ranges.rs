//! Randomization ranges for parameter sampling.
//!
//! A [`RandomizationRange`] describes how a single scalar parameter should
//! be drawn at episode start. Call [`sample`](RandomizationRange::sample)
//! with an RNG to draw a value.

use rand::Rng;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from constructing a randomization range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RangeError {
    #[error("invalid bounds: low ({low}) >= high ({high})")]
    InvalidBounds { low: f64, high: f64 },

    #[error("value is not finite: {0}")]
    NonFinite(f64),
}

// ---------------------------------------------------------------------------
// RandomizationRange
// ---------------------------------------------------------------------------

/// Describes how a parameter should be randomized on episode reset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RandomizationRange {
    /// Always returns the same value.
    Fixed(f64),

    /// Uniform distribution over `[low, high)`.
    Uniform { low: f64, high: f64 },
}

impl RandomizationRange {
    /// Create a fixed (constant) range.
    pub const fn fixed(value: f64) -> Result<Self, RangeError> {
        if !value.is_finite() {
            return Err(RangeError::NonFinite(value));
        }
        Ok(Self::Fixed(value))
    }

    /// Create a uniform range.
    pub fn uniform(low: f64, high: f64) -> Result<Self, RangeError> {
        if !low.is_finite() {
            return Err(RangeError::NonFinite(low));
        }
        if !high.is_finite() {
            return Err(RangeError::NonFinite(high));
        }
        if low >= high {
            return Err(RangeError::InvalidBounds { low, high });
        }
        Ok(Self::Uniform { low, high })
    }

    /// Sample a value from this range using the given RNG.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Fixed(v) => v,
            Self::Uniform { low, high } => rng.gen_range(low..high),
        }
    }

    /// Inclusive lower and exclusive upper bound of possible samples.
    pub const fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Fixed(v) => (v, v),
            Self::Uniform { low, high } => (low, high),
        }
    }

    /// True if `value` can be produced by [`sample`](Self::sample).
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Self::Fixed(v) => (value - v).abs() < f64::EPSILON,
            Self::Uniform { low, high } => (low..high).contains(&value),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn fixed_always_same() {
        let r = RandomizationRange::fixed(5.0).unwrap();
        let mut rng = rng();
        for _ in 0..10 {
            assert!((r.sample(&mut rng) - 5.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn fixed_rejects_nan() {
        assert!(RandomizationRange::fixed(f64::NAN).is_err());
    }

    #[test]
    fn uniform_samples_in_range() {
        let r = RandomizationRange::uniform(-std::f64::consts::FRAC_PI_2, 0.25).unwrap();
        let mut rng = rng();
        for _ in 0..1000 {
            let v = r.sample(&mut rng);
            assert!(r.contains(v), "{v} out of range");
        }
    }

    #[test]
    fn uniform_rejects_bad_bounds() {
        assert_eq!(
            RandomizationRange::uniform(1.0, 1.0),
            Err(RangeError::InvalidBounds {
                low: 1.0,
                high: 1.0
            })
        );
        assert!(RandomizationRange::uniform(2.0, 1.0).is_err());
        assert!(RandomizationRange::uniform(f64::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    fn sampling_is_deterministic() {
        let r = RandomizationRange::uniform(0.3, 1.0).unwrap();
        let mut a = rng();
        let mut b = rng();
        for _ in 0..5 {
            assert!((r.sample(&mut a) - r.sample(&mut b)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn bounds_report() {
        assert_eq!(
            RandomizationRange::uniform(0.3, 1.0).unwrap().bounds(),
            (0.3, 1.0)
        );
        assert_eq!(RandomizationRange::fixed(2.0).unwrap().bounds(), (2.0, 2.0));
    }
}
