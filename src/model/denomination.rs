use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{Currency, Money};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DenominationKind {
    Coin,
    Bill,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Denomination {
    pub face_value: Money,
    pub kind: DenominationKind,
    pub currency: Currency,
}

impl Denomination {
    const fn coin(cents: i64, currency: Currency) -> Self {
        Denomination {
            face_value: Money::from_cents(cents),
            kind: DenominationKind::Coin,
            currency,
        }
    }

    const fn bill(units: i64, currency: Currency) -> Self {
        Denomination {
            face_value: Money::from_units(units),
            kind: DenominationKind::Bill,
            currency,
        }
    }

    pub fn is_bill(&self) -> bool {
        self.kind == DenominationKind::Bill
    }
}

impl Display for Denomination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.face_value.format(self.currency))
    }
}

const MDL_DENOMINATIONS: [Denomination; 15] = [
    Denomination::coin(1, Currency::Mdl),
    Denomination::coin(5, Currency::Mdl),
    Denomination::coin(10, Currency::Mdl),
    Denomination::coin(25, Currency::Mdl),
    Denomination::coin(50, Currency::Mdl),
    Denomination::coin(100, Currency::Mdl),
    Denomination::coin(200, Currency::Mdl),
    Denomination::coin(500, Currency::Mdl),
    Denomination::bill(10, Currency::Mdl),
    Denomination::bill(20, Currency::Mdl),
    Denomination::bill(50, Currency::Mdl),
    Denomination::bill(100, Currency::Mdl),
    Denomination::bill(200, Currency::Mdl),
    Denomination::bill(500, Currency::Mdl),
    Denomination::bill(1000, Currency::Mdl),
];

const USD_DENOMINATIONS: [Denomination; 13] = [
    Denomination::coin(1, Currency::Usd),
    Denomination::coin(5, Currency::Usd),
    Denomination::coin(10, Currency::Usd),
    Denomination::coin(25, Currency::Usd),
    Denomination::coin(50, Currency::Usd),
    Denomination::coin(100, Currency::Usd),
    Denomination::bill(1, Currency::Usd),
    Denomination::bill(2, Currency::Usd),
    Denomination::bill(5, Currency::Usd),
    Denomination::bill(10, Currency::Usd),
    Denomination::bill(20, Currency::Usd),
    Denomination::bill(50, Currency::Usd),
    Denomination::bill(100, Currency::Usd),
];

const EUR_DENOMINATIONS: [Denomination; 15] = [
    Denomination::coin(1, Currency::Eur),
    Denomination::coin(2, Currency::Eur),
    Denomination::coin(5, Currency::Eur),
    Denomination::coin(10, Currency::Eur),
    Denomination::coin(20, Currency::Eur),
    Denomination::coin(50, Currency::Eur),
    Denomination::coin(100, Currency::Eur),
    Denomination::coin(200, Currency::Eur),
    Denomination::bill(5, Currency::Eur),
    Denomination::bill(10, Currency::Eur),
    Denomination::bill(20, Currency::Eur),
    Denomination::bill(50, Currency::Eur),
    Denomination::bill(100, Currency::Eur),
    Denomination::bill(200, Currency::Eur),
    Denomination::bill(500, Currency::Eur),
];

/// All coins and bills of a currency, coins first, each group ascending by face value.
pub fn denominations_of(currency: Currency) -> &'static [Denomination] {
    match currency {
        Currency::Mdl => &MDL_DENOMINATIONS,
        Currency::Usd => &USD_DENOMINATIONS,
        Currency::Eur => &EUR_DENOMINATIONS,
    }
}

/// Bills of a currency, ascending by face value.
pub fn bills_of(currency: Currency) -> Vec<Denomination> {
    denominations_of(currency)
        .iter()
        .filter(|d| d.is_bill())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_denomination_belongs_to_its_currency() {
        for currency in Currency::all() {
            let denominations = denominations_of(currency);
            assert!(!denominations.is_empty());
            for d in denominations {
                assert_eq!(d.currency, currency);
                assert!(d.face_value > Money::ZERO);
            }
        }
    }

    #[test]
    fn test_bills_are_ascending() {
        for currency in Currency::all() {
            let bills = bills_of(currency);
            assert!(bills.len() >= 7, "{} has {} bills", currency, bills.len());
            assert!(bills.iter().all(|b| b.is_bill()));
            assert!(bills
                .windows(2)
                .all(|pair| pair[0].face_value < pair[1].face_value));
        }
    }

    #[test]
    fn test_usd_bills() {
        let faces = bills_of(Currency::Usd)
            .iter()
            .map(|b| b.face_value.cents() / 100)
            .collect::<Vec<_>>();
        assert_eq!(faces, vec![1, 2, 5, 10, 20, 50, 100]);
    }

    #[test]
    fn test_display_uses_currency_format() {
        assert_eq!(bills_of(Currency::Eur)[0].to_string(), "5,00 €");
    }
}
