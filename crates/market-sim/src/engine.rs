//! Price mutation rules: the per-second dice roll and the three special
//! events. Both operate on an explicit ledger and draw every random value
//! from the supplied [`RandomSource`].

use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    config::Settings,
    events::{Direction, MarketEvent},
    instrument::Instrument,
    ledger::PriceLedger,
    rng::RandomSource,
    round::RoundState,
};

pub const DICE_PER_ROLL: usize = 3;
pub const ROLL_MAGNITUDE_FACTOR: f64 = 0.20;
pub const ROCKET_WINDOW_SECS: u32 = 10;
pub const ROCKET_PRICE_CEILING: f64 = 10.0;
pub const BOOM_PRICE_CEILING: f64 = 10.0;
pub const BOOM_PICKS: usize = 3;

/// One dice roll. Draw order: three dice, direction, instrument.
///
/// Returns `None` when the drawn instrument is in `removed`; the draws are
/// still consumed.
pub fn roll_step<R: RandomSource + ?Sized>(
    ledger: &mut PriceLedger,
    removed: &BTreeSet<Instrument>,
    rng: &mut R,
) -> Option<MarketEvent> {
    let total: u32 = (0..DICE_PER_ROLL)
        .map(|_| u32::from(rng.dice_roll()))
        .sum();
    let magnitude = (f64::from(total) * ROLL_MAGNITUDE_FACTOR).floor() as u8;
    let direction = if rng.uniform() < 0.5 {
        Direction::Down
    } else {
        Direction::Up
    };
    let instrument = Instrument::ALL[rng.pick_index(Instrument::COUNT)];

    if removed.contains(&instrument) {
        debug!(%instrument, "roll skipped for removed instrument");
        return None;
    }

    let price = ledger.apply_delta(instrument, f64::from(magnitude) * direction.sign());
    Some(MarketEvent::Roll {
        instrument,
        magnitude,
        direction,
        price,
    })
}

/// Crash, rocket and boom, in that order. Each rule reads the ledger as left
/// by the rule before it.
pub fn special_events<R: RandomSource + ?Sized>(
    ledger: &mut PriceLedger,
    round: RoundState,
    settings: &Settings,
    rng: &mut R,
) -> Vec<MarketEvent> {
    let mut events = Vec::new();
    events.extend(crash_rule(ledger, round, settings, rng));
    events.extend(rocket_rule(ledger, round, settings, rng));
    events.extend(boom_rule(ledger, settings, rng));
    events
}

fn crash_rule<R: RandomSource + ?Sized>(
    ledger: &mut PriceLedger,
    round: RoundState,
    settings: &Settings,
    rng: &mut R,
) -> Option<MarketEvent> {
    if !round.in_second_half() || rng.uniform() >= settings.stock_crash_chance {
        return None;
    }

    let instrument = ledger.highest();
    let current = ledger.current_price(instrument);
    let price = ledger.apply_delta(instrument, current / settings.stock_crash_divider - current);
    Some(MarketEvent::Crash {
        instrument,
        divider: settings.stock_crash_divider,
        price,
    })
}

fn rocket_rule<R: RandomSource + ?Sized>(
    ledger: &mut PriceLedger,
    round: RoundState,
    settings: &Settings,
    rng: &mut R,
) -> Option<MarketEvent> {
    if round.remaining_time > ROCKET_WINDOW_SECS || rng.uniform() >= settings.stock_rocket_chance {
        return None;
    }

    let eligible = ledger.below(ROCKET_PRICE_CEILING);
    if eligible.is_empty() {
        return None;
    }

    let instrument = eligible[rng.pick_index(eligible.len())];
    let current = ledger.current_price(instrument);
    let price = ledger.apply_delta(instrument, current * (settings.rocket_multiplier - 1.0));
    Some(MarketEvent::Rocket {
        instrument,
        multiplier: settings.rocket_multiplier,
        price,
    })
}

fn boom_rule<R: RandomSource + ?Sized>(
    ledger: &mut PriceLedger,
    settings: &Settings,
    rng: &mut R,
) -> Vec<MarketEvent> {
    if ledger.below(BOOM_PRICE_CEILING).len() != Instrument::COUNT
        || rng.uniform() >= settings.market_boom_chance
    {
        return Vec::new();
    }

    // Partial Fisher-Yates: only the first BOOM_PICKS slots are needed.
    let mut order = Instrument::ALL;
    for slot in 0..BOOM_PICKS {
        let swap_with = slot + rng.pick_index(order.len() - slot);
        order.swap(slot, swap_with);
    }

    order[..BOOM_PICKS]
        .iter()
        .map(|&instrument| {
            let price = ledger.apply_delta(instrument, settings.market_boom_increase);
            MarketEvent::Boom {
                instrument,
                increase: settings.market_boom_increase,
                price,
            }
        })
        .collect()
}
