use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::events::ScheduleKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleLifecycle {
    Idle,
    Running,
    Cancelled,
}

/// The countdown and roll cadences. They are independent intervals: when both
/// are due at the same instant, which fires first is unspecified.
#[derive(Debug)]
pub struct Schedules {
    cadence: Duration,
    countdown: Option<Interval>,
    roll: Option<Interval>,
    lifecycle: ScheduleLifecycle,
}

impl Schedules {
    pub fn new(cadence: Duration) -> Self {
        assert!(!cadence.is_zero(), "schedule cadence must be non-zero");

        Self {
            cadence,
            countdown: None,
            roll: None,
            lifecycle: ScheduleLifecycle::Idle,
        }
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn lifecycle(&self) -> ScheduleLifecycle {
        self.lifecycle
    }

    /// Replaces both schedules with new ones whose first firing is one cadence
    /// from now. Old phase is discarded.
    pub fn start_fresh(&mut self) {
        let first = Instant::now() + self.cadence;
        self.countdown = Some(self.interval_from(first));
        self.roll = Some(self.interval_from(first));
        self.lifecycle = ScheduleLifecycle::Running;
    }

    pub fn cancel_all(&mut self) {
        let was_running = self.countdown.is_some() || self.roll.is_some();
        self.countdown = None;
        self.roll = None;
        if was_running {
            self.lifecycle = ScheduleLifecycle::Cancelled;
        }
    }

    /// Waits for the next due schedule. Pending forever while cancelled.
    /// Cancel safe.
    pub async fn next_due(&mut self) -> ScheduleKind {
        match (self.countdown.as_mut(), self.roll.as_mut()) {
            (Some(countdown), Some(roll)) => tokio::select! {
                _ = countdown.tick() => ScheduleKind::Countdown,
                _ = roll.tick() => ScheduleKind::Roll,
            },
            (Some(countdown), None) => {
                countdown.tick().await;
                ScheduleKind::Countdown
            }
            (None, Some(roll)) => {
                roll.tick().await;
                ScheduleKind::Roll
            }
            (None, None) => std::future::pending().await,
        }
    }

    fn interval_from(&self, first: Instant) -> Interval {
        let mut interval = interval_at(first, self.cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }
}
