use log::{trace, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore, SeedableRng};

use super::exchange_rates::conversion_rate;
use crate::error::GameError;
use crate::model::{
    bills_of, Currency, CurrencyConvertRound, Denomination, GiveChangeRound, Level, Money, Round,
    RoundKind, TotalCountRound,
};

/// Draws a total-count pile at most this many times before clamping.
pub const MAX_DRAW_ATTEMPTS: usize = 15;

/// A round failing validation is regenerated at most this many times.
pub const MAX_REGENERATE_ATTEMPTS: usize = 5;

/// Seeded source of rounds for one session.
pub struct RoundGenerator {
    rng: StdRng,
    seed: u64,
}

impl RoundGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        trace!(target: "round_generator", "Seeding generator with {}", seed);
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generate_total_count(&mut self, currency: Currency, level: Level) -> TotalCountRound {
        generate_total_count(&mut self.rng, currency, level)
    }

    pub fn generate_give_change(&mut self, currency: Currency, level: Level) -> GiveChangeRound {
        generate_give_change(&mut self.rng, currency, level)
    }

    pub fn generate_currency_convert(
        &mut self,
        source_currency: Currency,
        target_currency: Option<Currency>,
        level: Level,
    ) -> Result<CurrencyConvertRound, GameError> {
        generate_currency_convert(&mut self.rng, source_currency, target_currency, level)
    }

    /// Produces a validated round of `kind`. Only an invalid currency pair for
    /// a conversion round is reported as an error.
    pub fn generate(
        &mut self,
        kind: RoundKind,
        currency: Currency,
        target_currency: Option<Currency>,
        level: Level,
    ) -> Result<Round, GameError> {
        generate_round(&mut self.rng, kind, currency, target_currency, level)
    }

    /// Mixed mode: a uniformly random round kind.
    pub fn pick_round_kind(&mut self) -> RoundKind {
        let kinds = RoundKind::all();
        kinds[self.rng.random_range(0..kinds.len())]
    }

    /// A random currency other than `source`.
    pub fn pick_target_currency(&mut self, source: Currency) -> Currency {
        let others = Currency::all()
            .into_iter()
            .filter(|c| *c != source)
            .collect::<Vec<_>>();
        others[self.rng.random_range(0..others.len())]
    }
}

pub fn generate_round<R: Rng + ?Sized>(
    rng: &mut R,
    kind: RoundKind,
    currency: Currency,
    target_currency: Option<Currency>,
    level: Level,
) -> Result<Round, GameError> {
    for attempt in 1..=MAX_REGENERATE_ATTEMPTS {
        let round = match kind {
            RoundKind::TotalCount => Round::TotalCount(generate_total_count(rng, currency, level)),
            RoundKind::GiveChange => Round::GiveChange(generate_give_change(rng, currency, level)),
            RoundKind::CurrencyConvert => Round::CurrencyConvert(generate_currency_convert(
                rng,
                currency,
                target_currency,
                level,
            )?),
        };
        match round.validate() {
            Ok(()) => return Ok(round),
            Err(reason) => warn!(
                target: "round_generator",
                "Discarding malformed {} round (attempt {}): {}; {:?}",
                kind,
                attempt,
                reason,
                round
            ),
        }
    }
    warn!(
        target: "round_generator",
        "Regeneration exhausted for {} round; using fixed fallback",
        kind
    );
    fallback_round(kind, currency, target_currency, level)
}

/// A round that is valid by construction, built from the level's lower bound.
fn fallback_round(
    kind: RoundKind,
    currency: Currency,
    target_currency: Option<Currency>,
    level: Level,
) -> Result<Round, GameError> {
    let range = level.range();
    let round = match kind {
        RoundKind::TotalCount => {
            let items = pile_for_amount(currency, range.min);
            Round::TotalCount(TotalCountRound {
                currency,
                total: items.iter().map(|d| d.face_value).sum(),
                items,
            })
        }
        RoundKind::GiveChange => {
            let price = range.min;
            let given_amount = range.max.min(price + price);
            Round::GiveChange(GiveChangeRound {
                currency,
                price,
                given_amount,
                correct_change: given_amount - price,
            })
        }
        RoundKind::CurrencyConvert => {
            let target_currency = require_target(currency, target_currency)?;
            let conversion_rate = conversion_rate(currency, target_currency);
            Round::CurrencyConvert(CurrencyConvertRound {
                source_amount: range.min,
                source_currency: currency,
                target_currency,
                conversion_rate,
                converted_amount: range.min.scale(conversion_rate),
            })
        }
    };
    Ok(round)
}

pub fn generate_total_count<R: Rng + ?Sized>(
    rng: &mut R,
    currency: Currency,
    level: Level,
) -> TotalCountRound {
    let bills = bills_of(currency);
    let band = level.bill_band(&bills);
    let range = level.range();

    let mut last_total = Money::ZERO;
    for attempt in 1..=MAX_DRAW_ATTEMPTS {
        let count = rng.random_range(level.bill_count());
        let items = draw_bills(rng, band, count, level.prefers_distinct());
        let total: Money = items.iter().map(|d| d.face_value).sum();
        trace!(
            target: "round_generator",
            "Total count draw {}: {} bills, total {}",
            attempt,
            items.len(),
            total
        );
        if !items.is_empty() && range.contains(total) {
            return TotalCountRound {
                currency,
                items,
                total,
            };
        }
        last_total = total;
    }

    clamped_total_count(currency, level, last_total)
}

/// Fallback once every draw missed the level interval: the total snaps to the
/// nearest bound and the pile is rebuilt to add up to it.
pub fn clamped_total_count(currency: Currency, level: Level, missed_total: Money) -> TotalCountRound {
    let total = level.range().clamp(missed_total);
    warn!(
        target: "round_generator",
        "No {} draw landed in {:?} after {} attempts (last {}); clamping to {}",
        currency,
        level,
        MAX_DRAW_ATTEMPTS,
        missed_total,
        total
    );
    let items = pile_for_amount(currency, total);
    TotalCountRound {
        currency,
        total: items.iter().map(|d| d.face_value).sum(),
        items,
    }
}

/// Greedy decomposition of `amount` into the currency's bills, largest first.
fn pile_for_amount(currency: Currency, amount: Money) -> Vec<Denomination> {
    let mut remaining = amount;
    let mut items = Vec::new();
    for bill in bills_of(currency).iter().rev() {
        while bill.face_value <= remaining {
            items.push(*bill);
            remaining = remaining - bill.face_value;
        }
    }
    if remaining > Money::ZERO {
        warn!(
            target: "round_generator",
            "{} cannot be expressed in {} bills; {} left over",
            amount,
            currency,
            remaining
        );
    }
    items
}

fn draw_bills<R: Rng + ?Sized>(
    rng: &mut R,
    band: &[Denomination],
    count: usize,
    distinct: bool,
) -> Vec<Denomination> {
    let mut items = if distinct {
        band.choose_multiple(rng, count.min(band.len()))
            .copied()
            .collect::<Vec<_>>()
    } else {
        Vec::with_capacity(count)
    };
    while items.len() < count {
        match band.choose(rng) {
            Some(bill) => items.push(*bill),
            None => break,
        }
    }
    items
}

pub fn generate_give_change<R: Rng + ?Sized>(
    rng: &mut R,
    currency: Currency,
    level: Level,
) -> GiveChangeRound {
    let range = level.range();
    // strictly below the ceiling so there is always room for a larger payment
    let price = Money::from_cents(rng.random_range(range.min.cents()..range.max.cents()));
    let ceiling = (price.cents() * 2).min(range.max.cents());
    let given_amount = Money::from_cents(rng.random_range(price.cents() + 1..=ceiling));
    trace!(
        target: "round_generator",
        "Give change: price {}, given {}",
        price,
        given_amount
    );

    GiveChangeRound {
        currency,
        price,
        given_amount,
        correct_change: given_amount - price,
    }
}

fn require_target(
    source_currency: Currency,
    target_currency: Option<Currency>,
) -> Result<Currency, GameError> {
    match target_currency {
        None => Err(GameError::InvalidInput(
            "currency convert round needs a target currency".to_string(),
        )),
        Some(target) if target == source_currency => Err(GameError::InvalidInput(format!(
            "target currency must differ from source currency {}",
            source_currency
        ))),
        Some(target) => Ok(target),
    }
}

pub fn generate_currency_convert<R: Rng + ?Sized>(
    rng: &mut R,
    source_currency: Currency,
    target_currency: Option<Currency>,
    level: Level,
) -> Result<CurrencyConvertRound, GameError> {
    let target_currency = require_target(source_currency, target_currency)?;
    let range = level.range();
    let source_amount = Money::from_cents(rng.random_range(range.min.cents()..=range.max.cents()));
    let conversion_rate = conversion_rate(source_currency, target_currency);
    let converted_amount = source_amount.scale(conversion_rate);
    trace!(
        target: "round_generator",
        "Convert {} {} -> {} {} at {}",
        source_amount,
        source_currency,
        converted_amount,
        target_currency,
        conversion_rate
    );

    Ok(CurrencyConvertRound {
        source_amount,
        source_currency,
        target_currency,
        conversion_rate,
        converted_amount,
    })
}
