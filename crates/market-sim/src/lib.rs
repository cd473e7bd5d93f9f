mod config;
pub mod engine;
mod error;
mod events;
mod instrument;
mod ledger;
mod persistence;
mod predictions;
mod rng;
mod round;
mod state;

pub use config::Settings;
pub use engine::{roll_step, special_events};
pub use error::SimError;
pub use events::{Direction, MarketEvent};
pub use instrument::Instrument;
pub use ledger::PriceLedger;
pub use persistence::SaveBundle;
pub use predictions::{spike_candidates, spike_message};
pub use rng::{RandomSource, ScriptedSource, SeededSource};
pub use round::{Countdown, RoundClock, RoundPhase, RoundState};
pub use state::{MarketSnapshot, SimState};

#[cfg(test)]
mod tests {
    use super::{roll_step, special_events, Instrument, ScriptedSource, Settings, SimState};

    #[test]
    fn twenty_second_round_with_max_up_rolls() {
        let settings = Settings::default();
        let mut state = SimState::new(&settings);
        state.start_round(20).unwrap();
        // Uniform 0.99: no special event, every roll up, always grain.
        let mut rng = ScriptedSource::constant(0.99, 6);

        while let Some(countdown) = state.clock.tick() {
            special_events(&mut state.ledger, countdown.round, &settings, &mut rng);
            roll_step(&mut state.ledger, &state.removed, &mut rng);
        }

        assert_eq!(state.ledger.current_price(Instrument::Grain), 70.0);
        assert_eq!(state.ledger.history(Instrument::Grain).len(), 21);
        assert_eq!(state.ledger.history(Instrument::Gold), &[10.0]);
    }

    #[test]
    fn untouched_instruments_keep_their_history_each_tick() {
        let settings = Settings::default();
        let mut state = SimState::new(&settings);
        let mut rng = ScriptedSource::constant(0.0, 3);

        let event = roll_step(&mut state.ledger, &state.removed, &mut rng).unwrap();
        let mutated = event.instrument().unwrap();

        for instrument in Instrument::ALL {
            let expected = if instrument == mutated { 2 } else { 1 };
            assert_eq!(state.ledger.history(instrument).len(), expected);
        }
    }
}
