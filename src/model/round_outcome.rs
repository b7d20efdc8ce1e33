use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DurationSeconds;
use std::time::Duration;

use super::{Money, RoundKind};

/// Result of one resolved round, recorded on submission or timeout.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round_index: usize,
    pub round_kind: RoundKind,
    pub submitted_answer: String,
    pub expected_answer: Money,
    pub is_correct: bool,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub time_spent: Duration,
}

impl RoundOutcome {
    pub fn time_spent_secs(&self) -> f64 {
        self.time_spent.as_secs_f64()
    }
}
