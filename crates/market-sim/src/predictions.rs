use crate::{instrument::Instrument, ledger::PriceLedger};

/// Instruments whose latest move was upward, given more than two recorded
/// prices. Canonical order.
pub fn spike_candidates(ledger: &PriceLedger) -> Vec<Instrument> {
    Instrument::ALL
        .into_iter()
        .filter(|instrument| match ledger.history(*instrument) {
            [.., previous, last] if ledger.history(*instrument).len() > 2 => last > previous,
            _ => false,
        })
        .collect()
}

pub fn spike_message(instrument: Instrument) -> String {
    format!("{instrument} may spike.")
}
