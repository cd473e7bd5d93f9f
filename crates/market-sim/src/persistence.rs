use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    error::SimError,
    instrument::Instrument,
    ledger::PriceLedger,
    round::{RoundClock, RoundState},
    state::SimState,
};

/// Serializable save: price histories, round timer and removed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveBundle {
    pub histories: BTreeMap<Instrument, Vec<f64>>,
    pub round: Option<RoundState>,
    pub removed: Vec<Instrument>,
}

impl SaveBundle {
    pub fn capture(state: &SimState) -> Self {
        Self {
            histories: state.ledger.histories(),
            round: state.clock.round(),
            removed: state.removed.iter().copied().collect(),
        }
    }

    /// Builds a fresh state from the bundle. Nothing is returned unless every
    /// part validates.
    pub fn restore(self) -> Result<SimState, SimError> {
        let ledger = PriceLedger::from_histories(self.histories)?;

        if let Some(round) = &self.round {
            round.validate()?;
        }

        let mut removed = BTreeSet::new();
        for instrument in self.removed {
            if !removed.insert(instrument) {
                return Err(SimError::MalformedPersistedState(format!(
                    "{instrument} listed twice in removed set"
                )));
            }
        }

        Ok(SimState::from_parts(
            ledger,
            removed,
            RoundClock::restored(self.round),
        ))
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| SimError::MalformedPersistedState(err.to_string()))
    }

    pub fn from_json(payload: &str) -> Result<Self, SimError> {
        serde_json::from_str(payload).map_err(|err| SimError::MalformedPersistedState(err.to_string()))
    }
}
