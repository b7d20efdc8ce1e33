use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::GameError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Currency {
    #[serde(rename = "MDL")]
    Mdl,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Usd
    }
}

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// Locale-style number formatting used when showing amounts of a currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    pub symbol: &'static str,
    pub symbol_position: SymbolPosition,
    pub group_separator: char,
    pub decimal_separator: char,
}

impl Currency {
    pub fn all() -> Vec<Currency> {
        vec![Currency::Mdl, Currency::Usd, Currency::Eur]
    }

    pub fn index(&self) -> usize {
        match self {
            Currency::Mdl => 0,
            Currency::Usd => 1,
            Currency::Eur => 2,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Mdl => "MDL",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn number_style(&self) -> NumberStyle {
        match self {
            // ro-RO
            Currency::Mdl => NumberStyle {
                symbol: "MDL",
                symbol_position: SymbolPosition::Suffix,
                group_separator: '.',
                decimal_separator: ',',
            },
            // en-US
            Currency::Usd => NumberStyle {
                symbol: "$",
                symbol_position: SymbolPosition::Prefix,
                group_separator: ',',
                decimal_separator: '.',
            },
            // de-DE
            Currency::Eur => NumberStyle {
                symbol: "€",
                symbol_position: SymbolPosition::Suffix,
                group_separator: '.',
                decimal_separator: ',',
            },
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MDL" => Ok(Currency::Mdl),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            other => Err(GameError::InvalidInput(format!(
                "unknown currency: {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_codes() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" EUR ".parse::<Currency>().unwrap(), Currency::Eur);
        assert!(matches!(
            "GBP".parse::<Currency>(),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Currency::Mdl).unwrap(), "\"MDL\"");
        let parsed: Currency = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(parsed, Currency::Eur);
    }
}
