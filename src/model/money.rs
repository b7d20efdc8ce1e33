use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, Sub};

use super::currency::{Currency, SymbolPosition};

pub const CENTS_PER_UNIT: i64 = 100;

/// Largest magnitude, in cents, accepted from outside the catalog.
pub const MAX_CENTS: i64 = i64::MAX / 1000;

/// An amount of money stored as a whole number of cents.
///
/// Every currency in the catalog has a smallest unit of 0.01, so cents are
/// exact for all generated amounts and "round to two decimals" is `f64::round`
/// at the boundary where a rate or a typed answer enters.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn from_units(units: i64) -> Self {
        Money(units * CENTS_PER_UNIT)
    }

    /// Rounds to the nearest cent. Returns `None` for NaN, infinities and
    /// anything beyond `MAX_CENTS`.
    pub fn from_f64(value: f64) -> Option<Self> {
        let cents = (value * CENTS_PER_UNIT as f64).round();
        if !cents.is_finite() || cents.abs() > MAX_CENTS as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by `rate` and rounds to two decimals.
    pub fn scale(&self, rate: f64) -> Money {
        Money((self.0 as f64 * rate).round() as i64)
    }

    /// Saturates at `i64::MAX` cents.
    pub fn abs_diff(&self, other: Money) -> Money {
        let diff = (self.0 as i128 - other.0 as i128).unsigned_abs();
        Money(i64::try_from(diff).unwrap_or(i64::MAX))
    }

    /// Parses player input. Accepts `.` or `,` as the decimal separator and
    /// ignores surrounding whitespace.
    pub fn parse(text: &str) -> Option<Money> {
        let normalized = text.trim().replace(',', ".");
        if normalized.is_empty() {
            return None;
        }
        normalized
            .parse::<f64>()
            .ok()
            .and_then(Money::from_f64)
    }

    /// Formats the amount with the currency's locale conventions, e.g.
    /// `$1,234.50`, `1.234,50 €`, `1.234,50 MDL`.
    pub fn format(&self, currency: Currency) -> String {
        let style = currency.number_style();
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let digits = (abs / CENTS_PER_UNIT as u64)
            .to_string()
            .chars()
            .collect::<Vec<_>>();
        let grouped = digits
            .rchunks(3)
            .rev()
            .map(|chunk| chunk.iter().collect::<String>())
            .join(&style.group_separator.to_string());
        let number = format!(
            "{}{}{:02}",
            grouped,
            style.decimal_separator,
            abs % CENTS_PER_UNIT as u64
        );

        match style.symbol_position {
            SymbolPosition::Prefix => format!("{}{}{}", sign, style.symbol, number),
            SymbolPosition::Suffix => format!("{}{} {}", sign, number, style.symbol),
        }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{}{}.{:02}",
            sign,
            abs / CENTS_PER_UNIT as u64,
            abs % CENTS_PER_UNIT as u64
        )
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}
