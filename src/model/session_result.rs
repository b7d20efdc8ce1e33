use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Currency, GameMode, Level, RoundOutcome, SessionConfig};

/// Summary of a finished session, handed to the stats aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub mode: GameMode,
    pub level: Level,
    pub currency: Currency,
    pub target_currency: Option<Currency>,
    pub total_rounds: u32,
    pub correct_rounds: u32,
    /// Fraction of rounds answered correctly, in `[0, 1]`.
    pub accuracy: f64,
    /// Mean seconds spent per round.
    pub average_time: f64,
    pub rounds: Vec<RoundOutcome>,
}

impl SessionResult {
    pub fn from_outcomes(session_id: Uuid, config: &SessionConfig, rounds: Vec<RoundOutcome>) -> Self {
        let total_rounds = rounds.len() as u32;
        let correct_rounds = rounds.iter().filter(|r| r.is_correct).count() as u32;
        let (accuracy, average_time) = if total_rounds == 0 {
            (0.0, 0.0)
        } else {
            let total_time: f64 = rounds.iter().map(|r| r.time_spent_secs()).sum();
            (
                correct_rounds as f64 / total_rounds as f64,
                total_time / total_rounds as f64,
            )
        };

        Self {
            session_id,
            completed_at: Utc::now(),
            mode: config.mode,
            level: config.level,
            currency: config.currency,
            target_currency: config.target_currency,
            total_rounds,
            correct_rounds,
            accuracy,
            average_time,
            rounds,
        }
    }
}
