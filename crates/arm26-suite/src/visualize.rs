//! Reward visualization through material colours.

use arm26_physics::{Physics, PhysicsError};

/// Materials recoloured by reward. Each needs `<name>_default` and
/// `<name>_highlight` companions in the model.
pub const REWARD_MATERIALS: [&str; 2] = ["self", "effector"];

/// Blend each of [`REWARD_MATERIALS`] between its default and highlight
/// colour by `reward`, clipped to `[0, 1]`.
pub fn visualize_reward(physics: &mut Physics, reward: f32) -> Result<(), PhysicsError> {
    let r = reward.clamp(0.0, 1.0);
    for name in REWARD_MATERIALS {
        let default = physics.material_rgba(&format!("{name}_default"))?;
        let highlight = physics.material_rgba(&format!("{name}_highlight"))?;
        let rgba = physics.material_rgba_mut(name)?;
        for (c, (d, h)) in rgba.iter_mut().zip(default.iter().zip(&highlight)) {
            *c = r * h + (1.0 - r) * d;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn zero_reward_is_default_colour() {
        let mut physics = Physics::arm26().unwrap();
        visualize_reward(&mut physics, 0.0).unwrap();
        for name in REWARD_MATERIALS {
            let want = physics.material_rgba(&format!("{name}_default")).unwrap();
            assert!(close(physics.material_rgba(name).unwrap(), want));
        }
    }

    #[test]
    fn full_reward_is_highlight_colour() {
        let mut physics = Physics::arm26().unwrap();
        visualize_reward(&mut physics, 1.0).unwrap();
        let want = physics.material_rgba("self_highlight").unwrap();
        assert!(close(physics.material_rgba("self").unwrap(), want));
    }

    #[test]
    fn reward_is_clipped() {
        let mut a = Physics::arm26().unwrap();
        let mut b = Physics::arm26().unwrap();
        visualize_reward(&mut a, 5.0).unwrap();
        visualize_reward(&mut b, 1.0).unwrap();
        assert_eq!(
            a.material_rgba("effector").unwrap(),
            b.material_rgba("effector").unwrap()
        );
    }

    #[test]
    fn half_reward_blends() {
        let mut physics = Physics::arm26().unwrap();
        visualize_reward(&mut physics, 0.5).unwrap();
        let d = physics.material_rgba("self_default").unwrap();
        let h = physics.material_rgba("self_highlight").unwrap();
        let want = std::array::from_fn(|i| 0.5 * (d[i] + h[i]));
        assert!(close(physics.material_rgba("self").unwrap(), want));
    }
}
