use market_sim::{
    roll_step, special_events, Instrument, MarketEvent, MarketSnapshot, RandomSource, RoundPhase,
    RoundState, SaveBundle, SeededSource, Settings, SimError, SimState,
};
use tracing::{debug, info};

use crate::{
    events::{ScheduleKind, TickReport},
    sink::{InMemorySink, PresentationSink},
};

pub const ROUND_OVER_MESSAGE: &str = "Buy or Sell Stocks!";
pub const SAVED_MESSAGE: &str = "Game saved!";
pub const LOADED_MESSAGE: &str = "Game loaded successfully!";
pub const NO_SAVE_MESSAGE: &str = "No saved game found.";

/// Owns the simulation state, its randomness and its presentation sink.
/// Each method is one synchronous unit of work; scheduling lives elsewhere.
pub struct GameEngine<R, S> {
    settings: Settings,
    state: SimState,
    rng: R,
    sink: S,
    tick: u64,
}

impl GameEngine<SeededSource, InMemorySink> {
    pub fn for_test_seed(seed: u64) -> Self {
        let settings = Settings::default();
        Self {
            state: SimState::new(&settings),
            settings,
            rng: SeededSource::new(seed),
            sink: InMemorySink::new(),
            tick: 0,
        }
    }
}

impl<R: RandomSource, S: PresentationSink> GameEngine<R, S> {
    /// Fails with `InvalidConfiguration` when any setting is out of range.
    pub fn new(settings: Settings, rng: R, sink: S) -> Result<Self, SimError> {
        settings.validate()?;
        Ok(Self {
            state: SimState::new(&settings),
            settings,
            rng,
            sink,
            tick: 0,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.clock.phase()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn snapshot(&self) -> MarketSnapshot {
        self.state.snapshot()
    }

    pub fn start_round(&mut self, initial_time: i64) -> Result<RoundState, SimError> {
        let round = self.state.start_round(initial_time)?;
        info!(initial_time = round.initial_time, "round started");
        self.publish_snapshot();
        Ok(round)
    }

    pub fn pause(&mut self) -> Result<RoundPhase, SimError> {
        self.state.clock.pause()?;
        info!(remaining = ?self.remaining_time(), "round paused");
        self.publish_snapshot();
        Ok(self.phase())
    }

    pub fn resume(&mut self) -> Result<RoundPhase, SimError> {
        self.state.clock.resume()?;
        info!(remaining = ?self.remaining_time(), "round resumed");
        self.publish_snapshot();
        Ok(self.phase())
    }

    /// Removes an instrument from rolling for the rest of the round.
    pub fn exclude(&mut self, instrument: Instrument) -> bool {
        let newly_removed = self.state.exclude(instrument);
        if newly_removed {
            info!(%instrument, "instrument removed from rolling");
            self.publish_snapshot();
        }
        newly_removed
    }

    /// One countdown second: decrement, then the special events.
    pub fn countdown_once(&mut self) -> TickReport {
        let Some(countdown) = self.state.clock.tick() else {
            return TickReport::new(self.tick, ScheduleKind::Countdown);
        };
        self.tick += 1;

        let mut report = TickReport::new(self.tick, ScheduleKind::Countdown);
        report.round = Some(countdown.round);
        report.events = special_events(
            &mut self.state.ledger,
            countdown.round,
            &self.settings,
            &mut self.rng,
        );
        if countdown.expired {
            info!(tick = self.tick, "round expired");
            report.events.push(MarketEvent::info(ROUND_OVER_MESSAGE));
        }

        self.publish_events(&report.events);
        self.publish_snapshot();
        report
    }

    /// One dice roll. Does nothing unless the round is running.
    pub fn roll_once(&mut self) -> TickReport {
        if !self.state.clock.is_running() {
            return TickReport::new(self.tick, ScheduleKind::Roll);
        }
        self.tick += 1;

        let mut report = TickReport::new(self.tick, ScheduleKind::Roll);
        report.round = self.state.clock.round();
        if let Some(event) = roll_step(&mut self.state.ledger, &self.state.removed, &mut self.rng) {
            report.events.push(event);
            self.publish_events(&report.events);
            self.publish_snapshot();
        }
        report
    }

    /// Captures the current state. Nothing is announced until the bundle has
    /// been persisted and `report_saved` is called.
    pub fn save(&self) -> SaveBundle {
        SaveBundle::capture(&self.state)
    }

    pub fn report_saved(&mut self) {
        info!(tick = self.tick, "game saved");
        self.publish_info(SAVED_MESSAGE);
    }

    /// Replaces the whole state. On error nothing changes.
    pub fn load(&mut self, bundle: SaveBundle) -> Result<MarketSnapshot, SimError> {
        self.state = bundle.restore()?;
        info!(phase = %self.phase(), "game loaded");
        self.publish_info(LOADED_MESSAGE);
        let snapshot = self.snapshot();
        self.sink.publish_snapshot(&snapshot);
        Ok(snapshot)
    }

    pub fn report_missing_save(&mut self) {
        self.publish_info(NO_SAVE_MESSAGE);
    }

    fn remaining_time(&self) -> Option<u32> {
        self.state.clock.round().map(|round| round.remaining_time)
    }

    fn publish_info(&mut self, message: &str) {
        self.publish_events(&[MarketEvent::info(message)]);
    }

    fn publish_events(&mut self, events: &[MarketEvent]) {
        for event in events {
            match event {
                MarketEvent::Roll { .. } => debug!(tick = self.tick, %event, "roll"),
                MarketEvent::Info { .. } => debug!(tick = self.tick, %event, "news"),
                _ => info!(tick = self.tick, kind = event.kind(), %event, "special event"),
            }
            self.sink.publish_event(self.tick, event);
        }
    }

    fn publish_snapshot(&mut self) {
        let snapshot = self.state.snapshot();
        self.sink.publish_snapshot(&snapshot);
    }
}
