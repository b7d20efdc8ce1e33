use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::GameError;

/// The concrete kind of a single round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoundKind {
    TotalCount,
    GiveChange,
    CurrencyConvert,
}

impl RoundKind {
    pub fn all() -> Vec<RoundKind> {
        vec![
            RoundKind::TotalCount,
            RoundKind::GiveChange,
            RoundKind::CurrencyConvert,
        ]
    }
}

/// What a session plays: one fixed round kind, or a fresh kind every round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameMode {
    TotalCount,
    GiveChange,
    CurrencyConvert,
    MixedMode,
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::TotalCount
    }
}

impl GameMode {
    pub fn all() -> Vec<GameMode> {
        vec![
            GameMode::TotalCount,
            GameMode::GiveChange,
            GameMode::CurrencyConvert,
            GameMode::MixedMode,
        ]
    }

    /// The fixed round kind, `None` for mixed mode.
    pub fn round_kind(&self) -> Option<RoundKind> {
        match self {
            GameMode::TotalCount => Some(RoundKind::TotalCount),
            GameMode::GiveChange => Some(RoundKind::GiveChange),
            GameMode::CurrencyConvert => Some(RoundKind::CurrencyConvert),
            GameMode::MixedMode => None,
        }
    }
}

impl From<RoundKind> for GameMode {
    fn from(kind: RoundKind) -> Self {
        match kind {
            RoundKind::TotalCount => GameMode::TotalCount,
            RoundKind::GiveChange => GameMode::GiveChange,
            RoundKind::CurrencyConvert => GameMode::CurrencyConvert,
        }
    }
}

impl Display for RoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        GameMode::from(*self).fmt(f)
    }
}

impl Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameMode::TotalCount => "Total Count",
            GameMode::GiveChange => "Give Change",
            GameMode::CurrencyConvert => "Currency Convert",
            GameMode::MixedMode => "Mixed Mode",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for GameMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "totalcount" | "count" => Ok(GameMode::TotalCount),
            "givechange" | "change" => Ok(GameMode::GiveChange),
            "currencyconvert" | "convert" => Ok(GameMode::CurrencyConvert),
            "mixedmode" | "mixed" => Ok(GameMode::MixedMode),
            _ => Err(GameError::InvalidInput(format!("unknown game mode: {:?}", s))),
        }
    }
}
