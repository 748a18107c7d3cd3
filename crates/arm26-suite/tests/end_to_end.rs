//! Loading and running whole Arm26 episodes through the public API.

use arm26_core::config::TaskKwargs;
use arm26_core::types::Action;
use arm26_render::{RenderConfig, Renderer};
use arm26_suite::{BIG_TARGET, MUSCLE_NAMES, SMALL_TARGET, SuiteError, load};
use arm26_test_utils::{random_action, rollout, rollout_with_frames};

fn seeded(seed: u64) -> TaskKwargs {
    TaskKwargs::default().with_seed(seed)
}

#[test]
fn easy_and_hard_set_target_size() {
    for (name, size) in [("easy", BIG_TARGET), ("hard", SMALL_TARGET)] {
        let mut env = load(name, seeded(0), None, false).unwrap();
        env.reset().unwrap();
        let radius = env.physics().geom_size("target").unwrap()[0];
        assert!((radius - size).abs() < f64::EPSILON, "{name}: {radius}");
    }
}

#[test]
fn unknown_level_is_named_in_error() {
    let err = load("nope", TaskKwargs::default(), None, false)
        .err()
        .unwrap();
    assert!(matches!(err, SuiteError::UnknownTask { ref name } if name == "nope"));
    assert!(err.to_string().contains("nope"));
}

#[test]
fn same_seed_same_episodes() {
    let mut a = load("easy", seeded(11), None, false).unwrap();
    let mut b = load("easy", seeded(11), None, false).unwrap();
    for _ in 0..3 {
        let ta = a.reset().unwrap();
        let tb = b.reset().unwrap();
        assert_eq!(ta.observation, tb.observation);
        assert_eq!(a.physics().qpos(), b.physics().qpos());
        assert_eq!(
            a.physics().body_pos("target").unwrap(),
            b.physics().body_pos("target").unwrap()
        );
    }
}

#[test]
fn target_size_constant_across_resets() {
    let mut env = load("hard", seeded(5), None, false).unwrap();
    for _ in 0..5 {
        env.reset().unwrap();
        let radius = env.physics().geom_size("target").unwrap()[0];
        assert!((radius - SMALL_TARGET).abs() < f64::EPSILON);
    }
}

#[test]
fn target_within_sampling_annulus() {
    let mut env = load("easy", seeded(21), None, false).unwrap();
    for _ in 0..20 {
        env.reset().unwrap();
        let pos = env.physics().body_pos("target").unwrap();
        let r = pos.norm();
        assert!((0.3 - 1e-9..1.0).contains(&r), "radius {r}");
    }
}

#[test]
fn two_second_episode_with_frames() {
    let mut env = load("easy", seeded(0).with_time_limit(2.0), None, false).unwrap();
    let renderer = Renderer::new(RenderConfig::new(160, 120));
    let run = rollout_with_frames(&mut env, &Action::one_hot(6, 0), &renderer).unwrap();

    assert_eq!(run.steps(), 400);
    assert_eq!(run.frames.len(), 401);
    assert!(run.timesteps[0].first());
    assert!(run.timesteps.last().unwrap().last());
    assert!(run.frames.iter().all(|f| f.shape() == (120, 160, 3)));
}

#[test]
fn muscle_drives_change_the_pose() {
    let action = Action::one_hot(6, 0);
    let mut flex = load("easy", seeded(3).with_time_limit(0.5), None, false).unwrap();
    let mut ext = load("easy", seeded(3).with_time_limit(0.5), None, false).unwrap();
    rollout(&mut flex, &action).unwrap();
    rollout(&mut ext, &Action::one_hot(6, 1)).unwrap();
    assert_ne!(flex.physics().qpos(), ext.physics().qpos());
}

#[test]
fn random_actions_keep_physics_finite() {
    let mut env = load("hard", seeded(8).with_time_limit(1.0), None, false).unwrap();
    let run = rollout(&mut env, &random_action(6, 8)).unwrap();
    assert!(run.total_reward() >= 0.0);
    assert!(env.physics().qpos().iter().all(|q| q.is_finite()));
}

#[test]
fn visualize_reward_recolours_arm() {
    let mut plain = load("easy", seeded(2), None, false).unwrap();
    let mut shaded = load("easy", seeded(2), None, true).unwrap();
    for env in [&mut plain, &mut shaded] {
        env.reset().unwrap();
        let finger = env.physics().geom_xpos("finger").unwrap();
        *env.physics_mut().body_pos_mut("target").unwrap() = finger;
        env.physics_mut().forward().unwrap();
        let ts = env.step(&Action::zeros(6)).unwrap();
        assert!((ts.reward.unwrap() - 1.0).abs() < f32::EPSILON);
    }
    let physics = shaded.physics();
    assert_eq!(
        physics.material_rgba("self").unwrap(),
        physics.material_rgba("self_highlight").unwrap()
    );
    assert_eq!(
        plain.physics().material_rgba("self").unwrap(),
        plain.physics().material_rgba("self_default").unwrap()
    );
}

#[test]
fn muscle_names_match_model() {
    let env = load("easy", seeded(0), None, false).unwrap();
    let names: Vec<_> = env
        .physics()
        .model()
        .muscles
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, MUSCLE_NAMES);
    assert_eq!(env.action_spec().minimum.len(), MUSCLE_NAMES.len());
}
