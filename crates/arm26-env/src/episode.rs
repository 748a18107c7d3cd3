//! Episode state machine.
//!
//! An episode runs from a reset to the step where the task terminates it or
//! the step limit truncates it. The [`Episode`] resource tracks state, step
//! count, accumulated reward and the discount of the final step.

use bevy::prelude::*;

// ---------------------------------------------------------------------------
// EpisodeState
// ---------------------------------------------------------------------------

/// Lifecycle state of an episode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EpisodeState {
    /// Before the first reset.
    #[default]
    Idle,
    /// Actively stepping.
    Running,
    /// Ended by the task.
    Terminated,
    /// Ended by the step limit.
    Truncated,
}

impl EpisodeState {
    /// Returns `true` if the episode is finished (Terminated or Truncated).
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated | Self::Truncated)
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

// ---------------------------------------------------------------------------
// Episode
// ---------------------------------------------------------------------------

/// Bevy resource tracking the current episode.
#[derive(Resource, Clone, Debug, Default)]
pub struct Episode {
    pub state: EpisodeState,
    /// Steps taken this episode.
    pub step_count: u64,
    /// Steps after which the episode is truncated. `None` never truncates.
    pub step_limit: Option<u64>,
    /// Sum of rewards this episode.
    pub total_reward: f64,
    /// Discount of the final step, set when the episode ends.
    pub final_discount: Option<f32>,
    /// Number of resets since the environment was built.
    pub episode_number: u32,
}

impl Episode {
    #[must_use]
    pub fn with_step_limit(step_limit: Option<u64>) -> Self {
        Self {
            step_limit,
            ..Self::default()
        }
    }

    /// Start a new episode. The step limit is kept.
    pub const fn reset(&mut self) {
        self.state = EpisodeState::Running;
        self.step_count = 0;
        self.total_reward = 0.0;
        self.final_discount = None;
        self.episode_number += 1;
    }

    /// Count one step and its reward. Returns `false` if not running.
    pub fn advance(&mut self, reward: f32) -> bool {
        if self.state != EpisodeState::Running {
            return false;
        }
        self.step_count += 1;
        self.total_reward += f64::from(reward);
        true
    }

    /// End the episode with a task-provided discount.
    pub const fn terminate(&mut self, discount: f32) {
        self.state = EpisodeState::Terminated;
        self.final_discount = Some(discount);
    }

    /// End the episode at the step limit. The final discount is 1.
    pub const fn truncate(&mut self) {
        self.state = EpisodeState::Truncated;
        self.final_discount = Some(1.0);
    }

    /// Truncate if the step limit is reached. Returns `true` if it was.
    pub fn check_truncation(&mut self) -> bool {
        match self.step_limit {
            Some(limit) if self.step_count >= limit && self.is_running() => {
                self.truncate();
                true
            }
            _ => false,
        }
    }

    pub const fn is_done(&self) -> bool {
        self.state.is_terminal()
    }

    pub const fn is_running(&self) -> bool {
        self.state.is_running()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_terminal_detection() {
        assert!(!EpisodeState::Idle.is_terminal());
        assert!(!EpisodeState::Running.is_terminal());
        assert!(EpisodeState::Terminated.is_terminal());
        assert!(EpisodeState::Truncated.is_terminal());
    }

    #[test]
    fn default_is_idle() {
        let ep = Episode::default();
        assert_eq!(ep.state, EpisodeState::Idle);
        assert_eq!(ep.step_count, 0);
        assert_eq!(ep.step_limit, None);
        assert_eq!(ep.episode_number, 0);
    }

    #[test]
    fn reset_starts_running_and_keeps_limit() {
        let mut ep = Episode::with_step_limit(Some(5));
        ep.reset();
        assert!(ep.is_running());
        assert_eq!(ep.step_limit, Some(5));
        assert_eq!(ep.episode_number, 1);
    }

    #[test]
    fn advance_accumulates() {
        let mut ep = Episode::default();
        ep.reset();
        assert!(ep.advance(1.0));
        assert!(ep.advance(0.5));
        assert_eq!(ep.step_count, 2);
        assert!((ep.total_reward - 1.5).abs() < 1e-12);
    }

    #[test]
    fn advance_fails_when_not_running() {
        let mut ep = Episode::default();
        assert!(!ep.advance(1.0));
        ep.reset();
        ep.terminate(0.0);
        assert!(!ep.advance(1.0));
    }

    #[test]
    fn truncation_at_limit_has_unit_discount() {
        let mut ep = Episode::with_step_limit(Some(3));
        ep.reset();
        for _ in 0..2 {
            ep.advance(0.0);
            assert!(!ep.check_truncation());
        }
        ep.advance(0.0);
        assert!(ep.check_truncation());
        assert_eq!(ep.state, EpisodeState::Truncated);
        assert_eq!(ep.final_discount, Some(1.0));
    }

    #[test]
    fn no_limit_never_truncates() {
        let mut ep = Episode::default();
        ep.reset();
        for _ in 0..10_000 {
            ep.advance(0.0);
        }
        assert!(!ep.check_truncation());
        assert!(ep.is_running());
    }

    #[test]
    fn terminate_records_discount() {
        let mut ep = Episode::default();
        ep.reset();
        ep.terminate(0.0);
        assert!(ep.is_done());
        assert_eq!(ep.final_discount, Some(0.0));
        ep.reset();
        assert_eq!(ep.final_discount, None);
        assert_eq!(ep.episode_number, 2);
    }
}
