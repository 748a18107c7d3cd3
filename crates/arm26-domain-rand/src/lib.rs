//! Episode-start randomization of joint state.
//!
//! [`RandomizationRange`](ranges::RandomizationRange) describes how one scalar
//! is drawn; [`randomize_limited_and_rotational_joints`] applies the standard
//! per-joint rules to a [`Physics`](arm26_physics::Physics) instance.
//!
//! # Example
//!
//! ```no_run
//! use arm26_domain_rand::prelude::*;
//! use arm26_physics::Physics;
//! use rand::SeedableRng;
//!
//! let mut physics = Physics::arm26().unwrap();
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
//! randomize_limited_and_rotational_joints(&mut physics, &mut rng).unwrap();
//! ```

pub mod randomizers;
pub mod ranges;

pub use randomizers::randomize_limited_and_rotational_joints;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        randomizers::{joint_range, randomize_limited_and_rotational_joints},
        ranges::{RandomizationRange, RangeError},
    };
}
