use log::trace;

use crate::model::{Money, Round};

/// Relative tolerance for conversion answers, in percent of the expected amount.
pub const CONVERSION_TOLERANCE_PERCENT: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub is_correct: bool,
    pub expected_answer: Money,
}

/// Scores free-form player input against a round. Never fails: text that
/// doesn't parse as a number is simply wrong.
pub fn evaluate(round: &Round, submitted_text: &str) -> Evaluation {
    let expected_answer = round.expected_answer();
    let submitted = Money::parse(submitted_text);

    let is_correct = match (round, submitted) {
        (_, None) => false,
        (Round::TotalCount(_), Some(amount)) | (Round::GiveChange(_), Some(amount)) => {
            amount == expected_answer
        }
        (Round::CurrencyConvert(_), Some(amount)) => {
            within_tolerance(amount, expected_answer, CONVERSION_TOLERANCE_PERCENT)
        }
    };
    trace!(
        target: "evaluator",
        "Submitted {:?} ({:?}) against {}: {}",
        submitted_text,
        submitted,
        expected_answer,
        is_correct
    );

    Evaluation {
        is_correct,
        expected_answer,
    }
}

/// `|submitted - expected| <= percent% of expected`, compared in whole cents
/// so the boundary is exact. Products are taken in u128 so no input overflows.
fn within_tolerance(submitted: Money, expected: Money, percent: i64) -> bool {
    let diff = submitted.abs_diff(expected).cents().unsigned_abs() as u128;
    diff * 100 <= expected.cents().unsigned_abs() as u128 * percent.unsigned_abs() as u128
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        bills_of, Currency, CurrencyConvertRound, GiveChangeRound, TotalCountRound,
    };

    fn total_count_45() -> Round {
        let bills = bills_of(Currency::Usd);
        // 20 + 20 + 5
        Round::TotalCount(TotalCountRound {
            currency: Currency::Usd,
            items: vec![bills[4], bills[4], bills[2]],
            total: Money::from_units(45),
        })
    }

    fn convert_to_100() -> Round {
        Round::CurrencyConvert(CurrencyConvertRound {
            source_amount: Money::from_cents(10753),
            source_currency: Currency::Usd,
            target_currency: Currency::Eur,
            conversion_rate: 0.93,
            converted_amount: Money::from_units(100),
        })
    }

    #[test]
    fn test_exact_match_boundary() {
        let round = total_count_45();
        assert!(evaluate(&round, "45").is_correct);
        assert!(evaluate(&round, "45,00").is_correct);
        assert!(evaluate(&round, "45.0").is_correct);
        assert!(evaluate(&round, " 45 ").is_correct);
        assert!(!evaluate(&round, "45.01").is_correct);
        assert!(!evaluate(&round, "44.99").is_correct);
        assert_eq!(evaluate(&round, "45").expected_answer, Money::from_units(45));
    }

    #[test]
    fn test_give_change_exact() {
        let round = Round::GiveChange(GiveChangeRound {
            currency: Currency::Mdl,
            price: Money::from_cents(1234),
            given_amount: Money::from_units(20),
            correct_change: Money::from_cents(766),
        });
        assert!(evaluate(&round, "7,66").is_correct);
        assert!(evaluate(&round, "7.66").is_correct);
        assert!(!evaluate(&round, "7.67").is_correct);
    }

    #[test]
    fn test_conversion_tolerance_boundary() {
        let round = convert_to_100();
        assert!(evaluate(&round, "100").is_correct);
        assert!(evaluate(&round, "101.00").is_correct);
        assert!(evaluate(&round, "99,00").is_correct);
        assert!(!evaluate(&round, "101.01").is_correct);
        assert!(!evaluate(&round, "98.99").is_correct);
    }

    #[test]
    fn test_unparseable_is_incorrect() {
        for round in [total_count_45(), convert_to_100()] {
            for text in ["", "   ", "forty five", "45$", "1,234.5"] {
                let evaluation = evaluate(&round, text);
                assert!(!evaluation.is_correct, "{:?} accepted", text);
                assert_eq!(evaluation.expected_answer, round.expected_answer());
            }
        }
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let round = convert_to_100();
        for text in ["100.5", "101.01", "abc", "100"] {
            assert_eq!(evaluate(&round, text), evaluate(&round, text));
        }
    }

    #[test]
    fn test_huge_answers_are_incorrect() {
        for round in [total_count_45(), convert_to_100()] {
            for text in ["99999999999999999999", "-99999999999999999999", "1e30", "-1e30"] {
                let evaluation = evaluate(&round, text);
                assert!(!evaluation.is_correct, "{:?} accepted", text);
                assert_eq!(evaluation.expected_answer, round.expected_answer());
            }
        }
    }

    #[test]
    fn test_tolerance_at_extreme_amounts() {
        let largest = Money::from_cents(i64::MAX);
        let smallest = Money::from_cents(i64::MIN);
        assert!(!within_tolerance(largest, Money::from_units(100), 1));
        assert!(!within_tolerance(smallest, Money::from_units(100), 1));
        assert!(within_tolerance(largest, largest, 1));
        assert!(!within_tolerance(smallest, largest, 1));
    }

    #[test]
    fn test_zero_conversion_requires_exact() {
        assert!(within_tolerance(Money::ZERO, Money::ZERO, 1));
        assert!(!within_tolerance(Money::from_cents(1), Money::ZERO, 1));
    }
}
