pub mod evaluator;
pub mod exchange_rates;
pub mod game_engine;
pub mod round_generator;
pub mod session;
pub mod settings;
pub mod stats_manager;
pub mod store;

pub use evaluator::{evaluate, Evaluation, CONVERSION_TOLERANCE_PERCENT};
pub use exchange_rates::conversion_rate;
pub use game_engine::GameEngine;
pub use round_generator::{
    clamped_total_count, generate_currency_convert, generate_give_change, generate_round,
    generate_total_count, RoundGenerator, MAX_DRAW_ATTEMPTS, MAX_REGENERATE_ATTEMPTS,
};
pub use session::{Session, SessionPhase, RESULT_PAUSE_TICKS};
pub use settings::Settings;
pub use stats_manager::{RecordedSession, StatsManager};
pub use store::{JsonFileStore, MemoryStore, StatsStore};
