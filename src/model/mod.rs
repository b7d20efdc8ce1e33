mod currency;
mod denomination;
mod difficulty;
mod game_mode;
mod game_stats;
mod money;
mod round;
mod round_outcome;
mod session_config;
mod session_event;
mod session_result;
mod timer_state;

pub use currency::{Currency, NumberStyle, SymbolPosition};
pub use denomination::{bills_of, denominations_of, Denomination, DenominationKind};
pub use difficulty::{Level, LevelRange};
pub use game_mode::{GameMode, RoundKind};
pub use game_stats::{GameStats, HighScore, HighScores, RunningStats};
pub use money::{Money, CENTS_PER_UNIT, MAX_CENTS};
pub use round::{CurrencyConvertRound, GiveChangeRound, Round, TotalCountRound};
pub use round_outcome::RoundOutcome;
pub use session_config::{SessionConfig, ROUNDS_PER_SESSION};
pub use session_event::{SessionCommand, SessionEvent};
pub use session_result::SessionResult;
pub use timer_state::{TimerState, TICK};
