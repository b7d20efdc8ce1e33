use std::time::Duration;

use serde_with::serde_as;
use serde_with::DurationSeconds;

pub const TICK: Duration = Duration::from_secs(1);

/// Per-round countdown. Time only moves when the host delivers a tick, so
/// the state is a pure value: every transition returns a new `TimerState`.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimerState {
    #[serde_as(as = "DurationSeconds<u64>")]
    pub duration: Duration,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub time_left: Duration,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl TimerState {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            time_left: duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.time_left.is_zero()
    }

    /// Time spent so far in the current round.
    pub fn elapsed(&self) -> Duration {
        self.duration.saturating_sub(self.time_left)
    }

    pub fn ticked(&self) -> TimerState {
        let mut new_state = self.clone();
        new_state.time_left = new_state.time_left.saturating_sub(TICK);
        new_state
    }

    pub fn restarted(&self) -> TimerState {
        Self::new(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_after_ticks() {
        let timer = TimerState::new(Duration::from_secs(10)).ticked().ticked().ticked();
        assert_eq!(timer.time_left, Duration::from_secs(7));
        assert_eq!(timer.elapsed(), Duration::from_secs(3));
        assert!(!timer.is_expired());
    }

    #[test]
    fn test_ticks_saturate_at_zero() {
        let mut timer = TimerState::new(Duration::from_secs(2));
        for _ in 0..5 {
            timer = timer.ticked();
        }
        assert!(timer.is_expired());
        assert_eq!(timer.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn test_restarted_keeps_duration() {
        let timer = TimerState::new(Duration::from_secs(15)).ticked();
        let restarted = timer.restarted();
        assert_eq!(restarted.time_left, Duration::from_secs(15));
        assert_eq!(restarted.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_serializes_seconds() {
        let timer = TimerState::new(Duration::from_secs(5)).ticked();
        let json = serde_json::to_string(&timer).unwrap();
        assert_eq!(json, r#"{"duration":5,"time_left":4}"#);
    }
}
