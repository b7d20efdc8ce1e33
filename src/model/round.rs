use serde::{Deserialize, Serialize};

use super::{Currency, Denomination, Money, RoundKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalCountRound {
    pub currency: Currency,
    pub items: Vec<Denomination>,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiveChangeRound {
    pub currency: Currency,
    pub price: Money,
    pub given_amount: Money,
    pub correct_change: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConvertRound {
    pub source_amount: Money,
    pub source_currency: Currency,
    pub target_currency: Currency,
    pub conversion_rate: f64,
    pub converted_amount: Money,
}

/// One puzzle shown to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Round {
    TotalCount(TotalCountRound),
    GiveChange(GiveChangeRound),
    CurrencyConvert(CurrencyConvertRound),
}

impl Round {
    pub fn kind(&self) -> RoundKind {
        match self {
            Round::TotalCount(_) => RoundKind::TotalCount,
            Round::GiveChange(_) => RoundKind::GiveChange,
            Round::CurrencyConvert(_) => RoundKind::CurrencyConvert,
        }
    }

    pub fn expected_answer(&self) -> Money {
        match self {
            Round::TotalCount(round) => round.total,
            Round::GiveChange(round) => round.correct_change,
            Round::CurrencyConvert(round) => round.converted_amount,
        }
    }

    /// Currency the answer is expressed in.
    pub fn answer_currency(&self) -> Currency {
        match self {
            Round::TotalCount(round) => round.currency,
            Round::GiveChange(round) => round.currency,
            Round::CurrencyConvert(round) => round.target_currency,
        }
    }

    /// Checks the structural invariants every round must hold before it is
    /// shown to a player. Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            Round::TotalCount(round) => {
                if round.items.is_empty() {
                    return Err("total count round has no items");
                }
                if round.items.iter().any(|d| d.currency != round.currency) {
                    return Err("total count item from another currency");
                }
                if round.total.is_negative() {
                    return Err("negative total");
                }
                if round.items.iter().map(|d| d.face_value).sum::<Money>() != round.total {
                    return Err("items do not add up to total");
                }
            }
            Round::GiveChange(round) => {
                if round.price.is_negative() {
                    return Err("negative price");
                }
                if round.given_amount <= round.price {
                    return Err("given amount does not exceed price");
                }
                if round.correct_change != round.given_amount - round.price {
                    return Err("change does not match given amount minus price");
                }
            }
            Round::CurrencyConvert(round) => {
                if round.source_currency == round.target_currency {
                    return Err("conversion between identical currencies");
                }
                if !(round.conversion_rate.is_finite() && round.conversion_rate > 0.0) {
                    return Err("conversion rate must be positive");
                }
                if round.source_amount.is_negative() || round.converted_amount.is_negative() {
                    return Err("negative conversion amount");
                }
                if round.source_amount.scale(round.conversion_rate) != round.converted_amount {
                    return Err("converted amount does not match rate");
                }
            }
        }
        Ok(())
    }
}
