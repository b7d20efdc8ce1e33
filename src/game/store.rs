use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::model::{GameStats, HighScores};

/// Persistence for the two process-wide records. `Ok(None)` means the record
/// has never been written.
pub trait StatsStore {
    fn load_stats(&self) -> Result<Option<GameStats>, StoreError>;
    fn save_stats(&mut self, stats: &GameStats) -> Result<(), StoreError>;
    fn load_high_scores(&self) -> Result<Option<HighScores>, StoreError>;
    fn save_high_scores(&mut self, high_scores: &HighScores) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub stats: Option<GameStats>,
    pub high_scores: Option<HighScores>,
}

impl StatsStore for MemoryStore {
    fn load_stats(&self) -> Result<Option<GameStats>, StoreError> {
        Ok(self.stats.clone())
    }

    fn save_stats(&mut self, stats: &GameStats) -> Result<(), StoreError> {
        self.stats = Some(stats.clone());
        Ok(())
    }

    fn load_high_scores(&self) -> Result<Option<HighScores>, StoreError> {
        Ok(self.high_scores.clone())
    }

    fn save_high_scores(&mut self, high_scores: &HighScores) -> Result<(), StoreError> {
        self.high_scores = Some(high_scores.clone());
        Ok(())
    }
}

/// JSON files in a data directory: `stats.json` and `high_scores.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `<user data dir>/money-counter`, if the platform has one.
    pub fn default_location() -> Option<Self> {
        dirs::data_dir().map(|dir| Self::new(dir.join("money-counter")))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn stats_path(&self) -> PathBuf {
        self.data_dir.join("stats.json")
    }

    fn high_scores_path(&self) -> PathBuf {
        self.data_dir.join("high_scores.json")
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents)?;
    trace!(target: "store", "Wrote {}", path.display());
    Ok(())
}

impl StatsStore for JsonFileStore {
    fn load_stats(&self) -> Result<Option<GameStats>, StoreError> {
        read_json(&self.stats_path())
    }

    fn save_stats(&mut self, stats: &GameStats) -> Result<(), StoreError> {
        write_json(&self.stats_path(), stats)
    }

    fn load_high_scores(&self) -> Result<Option<HighScores>, StoreError> {
        read_json(&self.high_scores_path())
    }

    fn save_high_scores(&mut self, high_scores: &HighScores) -> Result<(), StoreError> {
        write_json(&self.high_scores_path(), high_scores)
    }
}
