use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DurationSeconds;
use std::time::Duration;

use super::{Currency, GameMode, Level};

pub const ROUNDS_PER_SESSION: usize = 10;

/// Everything `start_session` needs to set up a game.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub currency: Currency,
    pub target_currency: Option<Currency>,
    pub level: Level,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub timer_duration: Duration,
}

impl SessionConfig {
    pub fn new(mode: GameMode, currency: Currency, level: Level, timer_duration: Duration) -> Self {
        Self {
            mode,
            currency,
            target_currency: None,
            level,
            timer_duration,
        }
    }

    pub fn with_target_currency(mut self, target_currency: Currency) -> Self {
        self.target_currency = Some(target_currency);
        self
    }
}
