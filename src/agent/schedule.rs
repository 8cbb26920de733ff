//! Linear epsilon decay over a window of episodes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Linear decay of the exploration rate.
///
/// Epsilon starts at `start_value` and drops by a fixed step on every episode
/// in `start_episode..=end_episode`, so it reaches zero at the end of the
/// window.
///
/// # Example
/// ```
/// use kinarow::agent::EpsilonSchedule;
///
/// let schedule = EpsilonSchedule::for_episodes(1_000_000);
/// assert_eq!(schedule.start_episode, 200_000);
/// assert_eq!(schedule.end_episode, 500_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    /// Initial exploration rate.
    pub start_value: f64,

    /// First episode (1-based) on which epsilon decays.
    pub start_episode: u64,

    /// Last episode on which epsilon decays.
    pub end_episode: u64,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self::for_episodes(10_000)
    }
}

impl EpsilonSchedule {
    /// Exploration rate every schedule starts from unless told otherwise.
    pub const DEFAULT_START_VALUE: f64 = 0.5;

    /// Create a schedule with an explicit window.
    pub fn new(start_value: f64, start_episode: u64, end_episode: u64) -> Self {
        Self {
            start_value,
            start_episode,
            end_episode,
        }
    }

    /// Decay begins after a fifth of `episodes` and ends at the halfway mark.
    ///
    /// Runs too short for that window still get one episode of decay.
    pub fn for_episodes(episodes: u64) -> Self {
        let start = episodes / 5;
        let end = (episodes / 2).max(start + 1);
        Self::new(Self::DEFAULT_START_VALUE, start, end)
    }

    /// Amount subtracted per in-window episode.
    pub fn step(&self) -> f64 {
        let width = self.end_episode.saturating_sub(self.start_episode).max(1);
        self.start_value / width as f64
    }

    /// Check whether `episode` falls inside the decay window.
    pub fn in_range(&self, episode: u64) -> bool {
        (self.start_episode..=self.end_episode).contains(&episode)
    }

    /// Epsilon after the end-of-episode hook for `episode`.
    ///
    /// Never returns a negative rate.
    pub fn decay(&self, epsilon: f64, episode: u64) -> f64 {
        if self.in_range(episode) {
            (epsilon - self.step()).max(0.0)
        } else {
            epsilon
        }
    }

    /// Validate the schedule.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.start_value) {
            return Err(Error::config(format!(
                "epsilon start value must be in [0, 1], got {}",
                self.start_value
            )));
        }
        if self.end_episode <= self.start_episode {
            return Err(Error::config(format!(
                "epsilon decay window must end after it starts, got {}..={}",
                self.start_episode, self.end_episode
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_episodes() {
        let schedule = EpsilonSchedule::for_episodes(1000);
        assert_eq!(schedule, EpsilonSchedule::new(0.5, 200, 500));
        assert!((schedule.step() - 0.5 / 300.0).abs() < 1e-15);
    }

    #[test]
    fn test_reaches_zero_at_window_end() {
        let schedule = EpsilonSchedule::new(0.5, 200, 500);
        let mut epsilon = schedule.start_value;
        let mut in_range_calls = 0;
        for episode in 200..=499 {
            epsilon = schedule.decay(epsilon, episode);
            in_range_calls += 1;
        }
        assert_eq!(in_range_calls, 300);
        assert!(epsilon.abs() < 1e-9);

        // the boundary episode is still inside the window but cannot go negative
        epsilon = schedule.decay(epsilon, 500);
        assert_eq!(epsilon, 0.0);
    }

    #[test]
    fn test_outside_window_is_noop() {
        let schedule = EpsilonSchedule::new(0.5, 200, 500);
        assert_eq!(schedule.decay(0.5, 1), 0.5);
        assert_eq!(schedule.decay(0.5, 199), 0.5);
        assert_eq!(schedule.decay(0.3, 501), 0.3);
        assert!(schedule.decay(0.5, 200) < 0.5);
    }

    #[test]
    fn test_validate() {
        assert!(EpsilonSchedule::default().validate().is_ok());
        assert!(EpsilonSchedule::new(0.5, 10, 10).validate().is_err());
        assert!(EpsilonSchedule::new(0.5, 10, 5).validate().is_err());
        assert!(EpsilonSchedule::new(1.5, 0, 5).validate().is_err());
        assert!(EpsilonSchedule::new(-0.1, 0, 5).validate().is_err());
    }

    #[test]
    fn test_short_runs_get_a_window() {
        for episodes in 0..5 {
            assert!(EpsilonSchedule::for_episodes(episodes).validate().is_ok());
        }
        let schedule = EpsilonSchedule::for_episodes(1);
        assert_eq!(schedule, EpsilonSchedule::new(0.5, 0, 1));
        assert_eq!(schedule.decay(0.5, 1), 0.0);
    }
}
