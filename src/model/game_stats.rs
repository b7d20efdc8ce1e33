use crate::model::{Currency, GameMode, Level, SessionResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running totals for one group of sessions (one mode, one level, one currency).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RunningStats {
    pub games_played: u32,
    pub total_rounds: u32,
    pub correct_rounds: u32,
    pub best_accuracy: f64,
    pub average_time: f64,
}

impl RunningStats {
    /// Folds one session in. `average_time` is an incremental mean over games.
    pub fn record(&mut self, result: &SessionResult) {
        self.games_played += 1;
        self.total_rounds += result.total_rounds;
        self.correct_rounds += result.correct_rounds;
        self.best_accuracy = self.best_accuracy.max(result.accuracy);
        let n = self.games_played as f64;
        self.average_time = (self.average_time * (n - 1.0) + result.average_time) / n;
    }

    /// Lifetime fraction of correct rounds in this group.
    pub fn overall_accuracy(&self) -> f64 {
        if self.total_rounds == 0 {
            0.0
        } else {
            self.correct_rounds as f64 / self.total_rounds as f64
        }
    }
}

/// Cumulative statistics across every finished session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameStats {
    pub total_games: u32,
    pub total_rounds: u32,
    pub correct_rounds: u32,
    pub best_accuracy: f64,
    pub average_time: f64,
    pub mode_stats: BTreeMap<GameMode, RunningStats>,
    pub level_stats: BTreeMap<Level, RunningStats>,
    pub currency_stats: BTreeMap<Currency, RunningStats>,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            total_games: 0,
            total_rounds: 0,
            correct_rounds: 0,
            best_accuracy: 0.0,
            average_time: 0.0,
            mode_stats: GameMode::all()
                .into_iter()
                .map(|mode| (mode, RunningStats::default()))
                .collect(),
            level_stats: Level::all()
                .into_iter()
                .map(|level| (level, RunningStats::default()))
                .collect(),
            currency_stats: Currency::all()
                .into_iter()
                .map(|currency| (currency, RunningStats::default()))
                .collect(),
        }
    }
}

impl GameStats {
    pub fn overall(&self) -> RunningStats {
        RunningStats {
            games_played: self.total_games,
            total_rounds: self.total_rounds,
            correct_rounds: self.correct_rounds,
            best_accuracy: self.best_accuracy,
            average_time: self.average_time,
        }
    }

    fn set_overall(&mut self, overall: RunningStats) {
        self.total_games = overall.games_played;
        self.total_rounds = overall.total_rounds;
        self.correct_rounds = overall.correct_rounds;
        self.best_accuracy = overall.best_accuracy;
        self.average_time = overall.average_time;
    }

    /// Updates the overall, mode, level and currency groups for one session.
    pub fn record(&mut self, result: &SessionResult) {
        let mut overall = self.overall();
        overall.record(result);
        self.set_overall(overall);

        self.mode_stats.entry(result.mode).or_default().record(result);
        self.level_stats.entry(result.level).or_default().record(result);
        self.currency_stats
            .entry(result.currency)
            .or_default()
            .record(result);
    }

    pub fn mode(&self, mode: GameMode) -> RunningStats {
        self.mode_stats.get(&mode).copied().unwrap_or_default()
    }

    pub fn level(&self, level: Level) -> RunningStats {
        self.level_stats.get(&level).copied().unwrap_or_default()
    }

    pub fn currency(&self, currency: Currency) -> RunningStats {
        self.currency_stats.get(&currency).copied().unwrap_or_default()
    }
}

/// Best accuracy ever reached in one currency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HighScore {
    pub accuracy: f64,
    pub correct_rounds: u32,
    pub total_rounds: u32,
}

impl HighScore {
    pub fn from_result(result: &SessionResult) -> Self {
        Self {
            accuracy: result.accuracy,
            correct_rounds: result.correct_rounds,
            total_rounds: result.total_rounds,
        }
    }
}

pub type HighScores = BTreeMap<Currency, HighScore>;
