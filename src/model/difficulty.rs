use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::{Denomination, Money};
use crate::error::GameError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Default for Level {
    fn default() -> Self {
        Level::Easy
    }
}

/// Closed interval a generated total, price or amount must land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRange {
    pub min: Money,
    pub max: Money,
}

impl LevelRange {
    pub fn contains(&self, amount: Money) -> bool {
        self.min <= amount && amount <= self.max
    }

    /// Nearest bound when `amount` falls outside the interval.
    pub fn clamp(&self, amount: Money) -> Money {
        amount.clamp(self.min, self.max)
    }
}

impl Level {
    pub fn all() -> Vec<Level> {
        vec![Level::Easy, Level::Medium, Level::Hard]
    }

    pub fn range(&self) -> LevelRange {
        let (min, max) = match self {
            Level::Easy => (10, 100),
            Level::Medium => (20, 500),
            Level::Hard => (100, 2000),
        };
        LevelRange {
            min: Money::from_units(min),
            max: Money::from_units(max),
        }
    }

    /// How many bills a total-count round shows.
    pub fn bill_count(&self) -> RangeInclusive<usize> {
        match self {
            Level::Easy => 2..=4,
            Level::Medium => 3..=5,
            Level::Hard => 4..=6,
        }
    }

    /// The face-value band bills are drawn from. `bills` must be sorted
    /// ascending; Easy keeps the small faces, Hard the large ones.
    pub fn bill_band<'a>(&self, bills: &'a [Denomination]) -> &'a [Denomination] {
        let n = bills.len();
        if n == 0 {
            return bills;
        }
        match self {
            Level::Easy => &bills[..(n / 2 + 1).min(n)],
            Level::Medium => &bills[..(n - 1).max(1)],
            Level::Hard => &bills[n / 2..],
        }
    }

    /// Hard rounds avoid repeating a bill until the band is exhausted.
    pub fn prefers_distinct(&self) -> bool {
        matches!(self, Level::Hard)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Level::Easy => "Easy",
            Level::Medium => "Medium",
            Level::Hard => "Hard",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Level {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Level::Easy),
            "medium" => Ok(Level::Medium),
            "hard" => Ok(Level::Hard),
            other => Err(GameError::InvalidInput(format!("unknown level: {:?}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{bills_of, Currency};

    #[test]
    fn test_ranges_widen_with_level() {
        let levels = Level::all();
        for pair in levels.windows(2) {
            let lower = pair[0].range();
            let higher = pair[1].range();
            assert!(higher.min > lower.min);
            assert!(higher.max > lower.max);
            assert!(higher.max - higher.min > lower.max - lower.min);
        }
    }

    #[test]
    fn test_range_bounds_are_whole_tens() {
        // the total-count clamp fallback rebuilds piles from bills; every
        // catalog can express a multiple of ten
        for level in Level::all() {
            let range = level.range();
            assert_eq!(range.min.cents() % 1000, 0);
            assert_eq!(range.max.cents() % 1000, 0);
        }
    }

    #[test]
    fn test_clamp() {
        let range = Level::Easy.range();
        assert_eq!(range.clamp(Money::from_units(5)), range.min);
        assert_eq!(range.clamp(Money::from_units(500)), range.max);
        assert_eq!(range.clamp(Money::from_units(42)), Money::from_units(42));
    }

    #[test]
    fn test_bill_band() {
        let bills = bills_of(Currency::Usd);
        let faces = |band: &[Denomination]| {
            band.iter()
                .map(|b| b.face_value.cents() / 100)
                .collect::<Vec<_>>()
        };
        assert_eq!(faces(Level::Easy.bill_band(&bills)), vec![1, 2, 5, 10]);
        assert_eq!(
            faces(Level::Medium.bill_band(&bills)),
            vec![1, 2, 5, 10, 20, 50]
        );
        assert_eq!(faces(Level::Hard.bill_band(&bills)), vec![10, 20, 50, 100]);
    }

    #[test]
    fn test_parse_round_trip() {
        for level in Level::all() {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
        assert!("extreme".parse::<Level>().is_err());
    }
}
