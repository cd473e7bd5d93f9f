use std::collections::BTreeMap;

use crate::{error::SimError, instrument::Instrument};

/// Append-only price histories, one per instrument. Every history is
/// non-empty and every recorded value is non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLedger {
    histories: [Vec<f64>; Instrument::COUNT],
}

impl PriceLedger {
    pub fn new(start_value: f64) -> Self {
        assert!(
            start_value.is_finite() && start_value >= 0.0,
            "start_value must be finite and non-negative"
        );

        Self {
            histories: std::array::from_fn(|_| vec![start_value]),
        }
    }

    pub fn from_histories(mut histories: BTreeMap<Instrument, Vec<f64>>) -> Result<Self, SimError> {
        let mut ordered: [Vec<f64>; Instrument::COUNT] = Default::default();

        for instrument in Instrument::ALL {
            let history = histories.remove(&instrument).ok_or_else(|| {
                SimError::MalformedPersistedState(format!("missing history for {instrument}"))
            })?;
            if history.is_empty() {
                return Err(SimError::MalformedPersistedState(format!(
                    "history for {instrument} is empty"
                )));
            }
            if let Some(value) = history
                .iter()
                .find(|value| !value.is_finite() || **value < 0.0)
            {
                return Err(SimError::MalformedPersistedState(format!(
                    "history for {instrument} contains invalid price {value}"
                )));
            }
            ordered[instrument.index()] = history;
        }

        Ok(Self { histories: ordered })
    }

    pub fn current_price(&self, instrument: Instrument) -> f64 {
        let history = &self.histories[instrument.index()];
        history[history.len() - 1]
    }

    /// Appends `max(0, current + delta)` and returns it.
    pub fn apply_delta(&mut self, instrument: Instrument, delta: f64) -> f64 {
        let next = (self.current_price(instrument) + delta).max(0.0);
        self.histories[instrument.index()].push(next);
        next
    }

    pub fn history(&self, instrument: Instrument) -> &[f64] {
        &self.histories[instrument.index()]
    }

    pub fn histories(&self) -> BTreeMap<Instrument, Vec<f64>> {
        Instrument::ALL
            .into_iter()
            .map(|instrument| (instrument, self.history(instrument).to_vec()))
            .collect()
    }

    /// Highest current price; ties resolve to the first instrument in
    /// canonical order.
    pub fn highest(&self) -> Instrument {
        Instrument::ALL
            .into_iter()
            .fold(Instrument::ALL[0], |best, candidate| {
                if self.current_price(candidate) > self.current_price(best) {
                    candidate
                } else {
                    best
                }
            })
    }

    pub fn below(&self, ceiling: f64) -> Vec<Instrument> {
        Instrument::ALL
            .into_iter()
            .filter(|instrument| self.current_price(*instrument) < ceiling)
            .collect()
    }
}
