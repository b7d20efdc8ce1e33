use log::{info, warn};
use std::collections::HashSet;
use uuid::Uuid;

use super::store::StatsStore;
use crate::model::{Currency, GameStats, HighScore, HighScores, SessionResult};

/// What recording a session changed, for the result screen.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSession {
    pub stats: GameStats,
    pub is_new_high_score: bool,
    pub previous_high_score: Option<HighScore>,
}

/// Owns the cumulative stats and per-currency high scores and writes them
/// through to a `StatsStore`.
#[derive(Debug)]
pub struct StatsManager<S: StatsStore> {
    store: S,
    stats: GameStats,
    high_scores: HighScores,
    recorded_sessions: HashSet<Uuid>,
}

impl<S: StatsStore> StatsManager<S> {
    /// Loads both records. Anything missing or unreadable starts empty.
    pub fn new(store: S) -> Self {
        let stats = match store.load_stats() {
            Ok(Some(stats)) => stats,
            Ok(None) => GameStats::default(),
            Err(err) => {
                warn!(target: "stats", "Could not load stats, starting fresh: {}", err);
                GameStats::default()
            }
        };
        let high_scores = match store.load_high_scores() {
            Ok(Some(high_scores)) => high_scores,
            Ok(None) => HighScores::new(),
            Err(err) => {
                warn!(target: "stats", "Could not load high scores, starting fresh: {}", err);
                HighScores::new()
            }
        };

        Self {
            store,
            stats,
            high_scores,
            recorded_sessions: HashSet::new(),
        }
    }

    /// Folds a finished session into every stats group and the currency's high
    /// score. All groups are updated on a copy and committed together; a
    /// session that was already recorded is ignored.
    pub fn record_session(&mut self, result: &SessionResult) -> RecordedSession {
        let previous_high_score = self.high_score(result.currency);
        if self.recorded_sessions.contains(&result.session_id) {
            warn!(
                target: "stats",
                "Session {} already recorded; ignoring",
                result.session_id
            );
            return RecordedSession {
                stats: self.stats.clone(),
                is_new_high_score: false,
                previous_high_score,
            };
        }

        let mut stats = self.stats.clone();
        stats.record(result);

        let is_new_high_score = previous_high_score
            .map(|best| result.accuracy > best.accuracy)
            .unwrap_or(true);
        let mut high_scores = self.high_scores.clone();
        if is_new_high_score {
            high_scores.insert(result.currency, HighScore::from_result(result));
        }

        self.stats = stats;
        self.high_scores = high_scores;
        self.recorded_sessions.insert(result.session_id);
        info!(
            target: "stats",
            "Recorded session {}: {}/{} correct in {} ({} games total){}",
            result.session_id,
            result.correct_rounds,
            result.total_rounds,
            result.currency,
            self.stats.total_games,
            if is_new_high_score { "; new high score" } else { "" }
        );

        self.persist_stats();
        if is_new_high_score {
            self.persist_high_scores();
        }

        RecordedSession {
            stats: self.stats.clone(),
            is_new_high_score,
            previous_high_score,
        }
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn high_score(&self, currency: Currency) -> Option<HighScore> {
        self.high_scores.get(&currency).copied()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Clears the cumulative stats. High scores are kept.
    pub fn reset_stats(&mut self) -> &GameStats {
        self.stats = GameStats::default();
        self.persist_stats();
        &self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist_stats(&mut self) {
        if let Err(err) = self.store.save_stats(&self.stats) {
            warn!(target: "stats", "Skipped writing stats: {}", err);
        }
    }

    fn persist_high_scores(&mut self) {
        if let Err(err) = self.store.save_high_scores(&self.high_scores) {
            warn!(target: "stats", "Skipped writing high scores: {}", err);
        }
    }
}
