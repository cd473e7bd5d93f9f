use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    config::Settings,
    error::SimError,
    instrument::Instrument,
    ledger::PriceLedger,
    predictions::{spike_candidates, spike_message},
    round::{RoundClock, RoundPhase, RoundState},
};

/// The whole mutable simulation: prices, the removed set and the round clock.
#[derive(Debug, Clone, PartialEq)]
pub struct SimState {
    pub ledger: PriceLedger,
    pub removed: BTreeSet<Instrument>,
    pub clock: RoundClock,
}

impl SimState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            ledger: PriceLedger::new(settings.stock_start_value),
            removed: BTreeSet::new(),
            clock: RoundClock::new(),
        }
    }

    pub fn from_parts(
        ledger: PriceLedger,
        removed: BTreeSet<Instrument>,
        clock: RoundClock,
    ) -> Self {
        Self {
            ledger,
            removed,
            clock,
        }
    }

    /// Starts (or restarts) a round. Prices carry over; the removed set does not.
    pub fn start_round(&mut self, initial_time: i64) -> Result<RoundState, SimError> {
        let round = self.clock.start(initial_time)?;
        self.removed.clear();
        Ok(round)
    }

    /// Excludes an instrument from rolling until the next round starts.
    pub fn exclude(&mut self, instrument: Instrument) -> bool {
        self.removed.insert(instrument)
    }

    pub fn is_removed(&self, instrument: Instrument) -> bool {
        self.removed.contains(&instrument)
    }

    pub fn snapshot(&self) -> MarketSnapshot {
        let prices = Instrument::ALL
            .into_iter()
            .map(|instrument| {
                let price = (!self.is_removed(instrument))
                    .then(|| self.ledger.current_price(instrument));
                (instrument, price)
            })
            .collect();

        let predictions = spike_candidates(&self.ledger);
        let prediction_messages = predictions.iter().copied().map(spike_message).collect();

        MarketSnapshot {
            prices,
            histories: self.ledger.histories(),
            round: self.clock.round(),
            phase: self.clock.phase(),
            removed: self.removed.iter().copied().collect(),
            predictions,
            prediction_messages,
        }
    }
}

/// What the presentation layer is handed after each mutation. Removed
/// instruments carry no current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub prices: BTreeMap<Instrument, Option<f64>>,
    pub histories: BTreeMap<Instrument, Vec<f64>>,
    pub round: Option<RoundState>,
    pub phase: RoundPhase,
    pub removed: Vec<Instrument>,
    pub predictions: Vec<Instrument>,
    /// Display text for `predictions`, e.g. "Gold may spike.".
    pub prediction_messages: Vec<String>,
}
