use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Idle,
    Running,
    Paused,
    Expired,
}

impl RoundPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub remaining_time: u32,
    pub initial_time: u32,
}

impl RoundState {
    pub fn new(initial_time: i64) -> Result<Self, SimError> {
        if initial_time <= 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "initial_time must be positive, got {initial_time}"
            )));
        }
        let initial_time = u32::try_from(initial_time).map_err(|_| {
            SimError::InvalidConfiguration(format!("initial_time {initial_time} is too large"))
        })?;

        Ok(Self {
            remaining_time: initial_time,
            initial_time,
        })
    }

    /// Crash window: strictly less than half the round remains.
    pub fn in_second_half(&self) -> bool {
        f64::from(self.remaining_time) < f64::from(self.initial_time) / 2.0
    }

    pub(crate) fn validate(&self) -> Result<(), SimError> {
        if self.initial_time == 0 {
            return Err(SimError::MalformedPersistedState(
                "initial_time must be positive".to_string(),
            ));
        }
        if self.remaining_time > self.initial_time {
            return Err(SimError::MalformedPersistedState(format!(
                "remaining_time {} exceeds initial_time {}",
                self.remaining_time, self.initial_time
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub round: RoundState,
    pub expired: bool,
}

/// Round timer state machine: `Idle -> Running <-> Paused -> ... -> Expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundClock {
    phase: RoundPhase,
    round: Option<RoundState>,
}

impl Default for RoundClock {
    fn default() -> Self {
        Self {
            phase: RoundPhase::Idle,
            round: None,
        }
    }
}

impl RoundClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock restored from a save: paused if time remains, otherwise expired.
    pub fn restored(round: Option<RoundState>) -> Self {
        let phase = match round {
            None => RoundPhase::Idle,
            Some(state) if state.remaining_time == 0 => RoundPhase::Expired,
            Some(_) => RoundPhase::Paused,
        };
        Self { phase, round }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> Option<RoundState> {
        self.round
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn start(&mut self, initial_time: i64) -> Result<RoundState, SimError> {
        let round = RoundState::new(initial_time)?;
        self.round = Some(round);
        self.phase = RoundPhase::Running;
        Ok(round)
    }

    pub fn pause(&mut self) -> Result<(), SimError> {
        self.transition(RoundPhase::Running, RoundPhase::Paused, "pause")
    }

    pub fn resume(&mut self) -> Result<(), SimError> {
        self.transition(RoundPhase::Paused, RoundPhase::Running, "resume")
    }

    /// One elapsed second. Returns `None` unless the round is running.
    pub fn tick(&mut self) -> Option<Countdown> {
        if !self.is_running() {
            return None;
        }
        let round = self.round.as_mut()?;
        round.remaining_time = round.remaining_time.saturating_sub(1);
        let expired = round.remaining_time == 0;
        let snapshot = *round;
        if expired {
            self.phase = RoundPhase::Expired;
        }

        Some(Countdown {
            round: snapshot,
            expired,
        })
    }

    fn transition(
        &mut self,
        from: RoundPhase,
        to: RoundPhase,
        action: &'static str,
    ) -> Result<(), SimError> {
        if self.phase != from {
            return Err(SimError::InvalidTransition {
                phase: self.phase,
                action,
            });
        }
        self.phase = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{RoundClock, RoundPhase, RoundState};
    use crate::error::SimError;

    #[test]
    fn rejects_non_positive_initial_time() {
        assert!(matches!(
            RoundState::new(0),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(RoundState::new(-5).is_err());
        assert!(RoundState::new(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn second_half_is_strictly_below_half() {
        let mut round = RoundState::new(20).unwrap();

        round.remaining_time = 10;
        assert!(!round.in_second_half());

        round.remaining_time = 9;
        assert!(round.in_second_half());
    }

    #[test]
    fn odd_initial_time_uses_fractional_half() {
        let mut round = RoundState::new(21).unwrap();

        round.remaining_time = 10;
        assert!(round.in_second_half());

        round.remaining_time = 11;
        assert!(!round.in_second_half());
    }

    #[test]
    fn clock_counts_down_and_expires_at_zero() {
        let mut clock = RoundClock::new();
        clock.start(2).unwrap();

        let first = clock.tick().unwrap();
        assert_eq!(first.round.remaining_time, 1);
        assert!(!first.expired);
        assert_eq!(clock.phase(), RoundPhase::Running);

        let second = clock.tick().unwrap();
        assert_eq!(second.round.remaining_time, 0);
        assert!(second.expired);
        assert_eq!(clock.phase(), RoundPhase::Expired);

        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn paused_clock_does_not_count() {
        let mut clock = RoundClock::new();
        clock.start(5).unwrap();
        clock.pause().unwrap();

        assert_eq!(clock.tick(), None);
        assert_eq!(clock.round().unwrap().remaining_time, 5);

        clock.resume().unwrap();
        assert_eq!(clock.tick().unwrap().round.remaining_time, 4);
    }

    #[test]
    fn illegal_transitions_leave_phase_unchanged() {
        let mut clock = RoundClock::new();

        assert_eq!(
            clock.pause(),
            Err(SimError::InvalidTransition {
                phase: RoundPhase::Idle,
                action: "pause",
            })
        );

        clock.start(1).unwrap();
        assert!(clock.resume().is_err());
        clock.tick();
        assert!(clock.resume().is_err());
        assert_eq!(clock.phase(), RoundPhase::Expired);
    }

    #[test]
    fn restart_from_expired_runs_again() {
        let mut clock = RoundClock::new();
        clock.start(1).unwrap();
        clock.tick();

        let round = clock.start(30).unwrap();

        assert_eq!(round.remaining_time, 30);
        assert_eq!(clock.phase(), RoundPhase::Running);
    }

    #[test]
    fn restored_clock_phase_follows_remaining_time() {
        let paused = RoundClock::restored(Some(RoundState {
            remaining_time: 4,
            initial_time: 10,
        }));
        let expired = RoundClock::restored(Some(RoundState {
            remaining_time: 0,
            initial_time: 10,
        }));

        assert_eq!(paused.phase(), RoundPhase::Paused);
        assert_eq!(expired.phase(), RoundPhase::Expired);
        assert_eq!(RoundClock::restored(None).phase(), RoundPhase::Idle);
    }
}
