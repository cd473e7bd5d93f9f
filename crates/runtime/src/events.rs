use market_sim::{MarketEvent, RoundState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    Countdown,
    Roll,
}

impl ScheduleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Countdown => "countdown",
            Self::Roll => "roll",
        }
    }
}

/// Outcome of one scheduled firing.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub schedule: ScheduleKind,
    pub round: Option<RoundState>,
    pub events: Vec<MarketEvent>,
}

impl TickReport {
    pub fn new(tick: u64, schedule: ScheduleKind) -> Self {
        Self {
            tick,
            schedule,
            round: None,
            events: Vec::new(),
        }
    }

    pub fn mutated(&self) -> bool {
        self.events.iter().any(|event| event.price().is_some())
    }
}
