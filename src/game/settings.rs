use crate::model::{Currency, GameMode, Level, SessionConfig};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Countdown lengths a player can pick, in seconds.
pub const TIMER_OPTIONS: [u64; 4] = [5, 10, 15, 20];
pub const DEFAULT_TIMER_SECS: u64 = 10;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    pub mode: GameMode,

    #[serde(default)]
    pub currency: Currency,

    #[serde(default)]
    pub target_currency: Option<Currency>,

    #[serde(default)]
    pub level: Level,

    #[serde(default = "default_timer_secs")]
    pub timer_secs: u64,
}

fn default_version() -> u32 {
    2
}
fn default_timer_secs() -> u64 {
    DEFAULT_TIMER_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: 2,
            mode: GameMode::default(),
            currency: Currency::default(),
            target_currency: None,
            level: Level::default(),
            timer_secs: DEFAULT_TIMER_SECS,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Settings::default(),
        }
    }

    /// A missing file is created with defaults. An unreadable one is left in
    /// place and defaults are used for this run.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let default = Settings::default();
                if let Err(err) = default.save_to(path) {
                    warn!(target: "settings", "Could not write {}: {}", path.display(), err);
                }
                return default;
            }
            Err(err) => {
                warn!(target: "settings", "Could not read {}: {}", path.display(), err);
                return Settings::default();
            }
        };
        match serde_json::from_str::<Settings>(&contents) {
            Ok(mut settings) => {
                settings.migrate();
                settings
            }
            Err(err) => {
                warn!(
                    target: "settings",
                    "Ignoring malformed {}: {}; using defaults",
                    path.display(),
                    err
                );
                Settings::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        match Self::settings_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string(self)?;
        fs::write(path, contents)
    }

    fn settings_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("money-counter").join("settings.json"))
    }

    fn migrate(&mut self) {
        match self.version {
            // version 1 stored free-form timer lengths
            0 | 1 => {
                self.version = 2;
            }
            _ => (),
        }
        if !self.has_valid_timer() {
            self.timer_secs = DEFAULT_TIMER_SECS;
        }
        if self.target_currency == Some(self.currency) {
            self.target_currency = None;
        }
    }

    pub fn has_valid_timer(&self) -> bool {
        TIMER_OPTIONS.contains(&self.timer_secs)
    }

    pub fn timer_duration(&self) -> Duration {
        Duration::from_secs(self.timer_secs)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            mode: self.mode,
            currency: self.currency,
            target_currency: self.target_currency,
            level: self.level,
            timer_duration: self.timer_duration(),
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }
}
