//! Joint-state randomizers applied at episode start.

use std::f64::consts::PI;

use rand::Rng;

use arm26_physics::Physics;
use arm26_physics::model::{Joint, JointKind};

use crate::ranges::{RandomizationRange, RangeError};

/// Range a joint's position is drawn from, or `None` if it is left alone.
///
/// - hinge, limited: its range
/// - hinge, unlimited: `[-pi, pi)`
/// - slide, limited: its range
/// - slide, unlimited: untouched
pub fn joint_range(joint: &Joint) -> Result<Option<RandomizationRange>, RangeError> {
    match (joint.kind, joint.range) {
        (_, Some([lo, hi])) => RandomizationRange::uniform(lo, hi).map(Some),
        (JointKind::Hinge, None) => RandomizationRange::uniform(-PI, PI).map(Some),
        (JointKind::Slide, None) => Ok(None),
    }
}

/// Draw a new position for every limited joint and every hinge.
///
/// Joints are visited in model order, one draw each, so a seeded RNG gives
/// the same configuration every time.
pub fn randomize_limited_and_rotational_joints<R: Rng + ?Sized>(
    physics: &mut Physics,
    rng: &mut R,
) -> Result<(), RangeError> {
    let ranges = physics
        .model()
        .joints
        .iter()
        .map(joint_range)
        .collect::<Result<Vec<_>, _>>()?;

    let qpos = physics.qpos_mut();
    for (j, range) in ranges.iter().enumerate() {
        if let Some(range) = range {
            qpos[j] = range.sample(rng);
        }
    }
    Ok(())
}
