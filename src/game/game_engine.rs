use log::{info, trace};
use std::time::Duration;

use super::session::Session;
use super::stats_manager::{RecordedSession, StatsManager};
use super::store::StatsStore;
use crate::error::GameError;
use crate::events::{Channel, EventEmitter, EventObserver};
use crate::model::{
    Currency, GameMode, GameStats, HighScore, HighScores, Level, RoundOutcome, SessionCommand,
    SessionConfig, SessionEvent, SessionResult,
};

/// Entry point for hosts: runs one session at a time and folds each finished
/// session into the stats exactly once.
pub struct GameEngine<S: StatsStore> {
    stats_manager: StatsManager<S>,
    session: Option<Session>,
    last_recorded: Option<RecordedSession>,
    seed: Option<u64>,
    event_emitter: EventEmitter<SessionEvent>,
    event_observer: EventObserver<SessionEvent>,
}

impl<S: StatsStore> GameEngine<S> {
    pub fn new(store: S) -> Self {
        let (event_emitter, event_observer) = Channel::new();
        Self {
            stats_manager: StatsManager::new(store),
            session: None,
            last_recorded: None,
            seed: None,
            event_emitter,
            event_observer,
        }
    }

    /// Every session started afterwards generates the same rounds.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Subscribe here to render rounds, ticks and results.
    pub fn observer(&self) -> EventObserver<SessionEvent> {
        self.event_observer.clone()
    }

    /// Starts a fresh session, abandoning any session still in progress.
    pub fn start_session(
        &mut self,
        mode: GameMode,
        currency: Currency,
        level: Level,
        timer_duration: Duration,
        target_currency: Option<Currency>,
    ) -> Result<&Session, GameError> {
        let config = SessionConfig {
            mode,
            currency,
            target_currency,
            level,
            timer_duration,
        };
        self.start_with_config(config)
    }

    pub fn start_with_config(&mut self, config: SessionConfig) -> Result<&Session, GameError> {
        if let Some(previous) = self.session.as_ref().filter(|s| !s.is_complete()) {
            info!(
                target: "session",
                "Abandoning session {} after {} rounds",
                previous.id(),
                previous.outcomes().len()
            );
        }
        let session = Session::start(config, self.seed, self.event_emitter.clone())?;
        self.last_recorded = None;
        Ok(self.session.insert(session))
    }

    pub fn update_draft(&mut self, text: &str) {
        if let Some(session) = self.session.as_mut() {
            session.update_draft(text);
        }
    }

    pub fn submit_answer(&mut self, text: &str) -> Option<RoundOutcome> {
        let outcome = self.session.as_mut()?.submit_answer(text);
        self.record_if_complete();
        outcome
    }

    pub fn on_tick(&mut self) -> Result<(), GameError> {
        if let Some(session) = self.session.as_mut() {
            session.on_tick()?;
        }
        self.record_if_complete();
        Ok(())
    }

    pub fn handle_command(&mut self, command: SessionCommand) -> Result<(), GameError> {
        match command {
            SessionCommand::UpdateDraft(text) => self.update_draft(&text),
            SessionCommand::SubmitAnswer(text) => {
                self.submit_answer(&text);
            }
            SessionCommand::Tick => self.on_tick()?,
        }
        Ok(())
    }

    fn record_if_complete(&mut self) {
        if self.last_recorded.is_some() {
            return;
        }
        let Some(result) = self.session.as_ref().and_then(|s| s.result()) else {
            return;
        };
        trace!(target: "stats", "Recording session {}", result.session_id);
        self.last_recorded = Some(self.stats_manager.record_session(result));
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The result of the current session once it has completed.
    pub fn session_result(&self) -> Option<&SessionResult> {
        self.session.as_ref().and_then(|s| s.result())
    }

    /// What recording the completed session changed, including the
    /// new-high-score flag.
    pub fn last_recorded(&self) -> Option<&RecordedSession> {
        self.last_recorded.as_ref()
    }

    pub fn stats(&self) -> &GameStats {
        self.stats_manager.stats()
    }

    pub fn high_score(&self, currency: Currency) -> Option<HighScore> {
        self.stats_manager.high_score(currency)
    }

    pub fn high_scores(&self) -> &HighScores {
        self.stats_manager.high_scores()
    }

    pub fn reset_stats(&mut self) -> &GameStats {
        self.stats_manager.reset_stats()
    }

    pub fn store(&self) -> &S {
        self.stats_manager.store()
    }
}
