use std::time::Duration;

use market_sim::{
    MarketSnapshot, RandomSource, RoundPhase, RoundState, SaveBundle, SimError,
};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, trace};

use crate::{
    engine::GameEngine,
    events::ScheduleKind,
    schedule::Schedules,
    sink::PresentationSink,
};

pub const DEFAULT_CADENCE: Duration = Duration::from_secs(1);
const COMMAND_BUFFER: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("game driver has stopped")]
    Stopped,
}

enum Command {
    StartRound {
        initial_time: i64,
        reply: oneshot::Sender<Result<RoundState, SimError>>,
    },
    Pause {
        reply: oneshot::Sender<Result<RoundPhase, SimError>>,
    },
    Resume {
        reply: oneshot::Sender<Result<RoundPhase, SimError>>,
    },
    Snapshot {
        reply: oneshot::Sender<MarketSnapshot>,
    },
    Save {
        reply: oneshot::Sender<SaveBundle>,
    },
    Load {
        bundle: SaveBundle,
        reply: oneshot::Sender<Result<MarketSnapshot, SimError>>,
    },
    ReportSaved {
        reply: oneshot::Sender<()>,
    },
    ReportMissingSave {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable front door to a running game. Every call is answered by the
/// task that owns the engine.
#[derive(Clone, Debug)]
pub struct GameHandle {
    commands: mpsc::Sender<Command>,
}

impl GameHandle {
    pub async fn start_round(&self, initial_time: i64) -> Result<RoundState, DriverError> {
        Ok(self
            .request(|reply| Command::StartRound {
                initial_time,
                reply,
            })
            .await??)
    }

    pub async fn pause(&self) -> Result<RoundPhase, DriverError> {
        Ok(self.request(|reply| Command::Pause { reply }).await??)
    }

    pub async fn resume(&self) -> Result<RoundPhase, DriverError> {
        Ok(self.request(|reply| Command::Resume { reply }).await??)
    }

    pub async fn snapshot(&self) -> Result<MarketSnapshot, DriverError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn save(&self) -> Result<SaveBundle, DriverError> {
        self.request(|reply| Command::Save { reply }).await
    }

    pub async fn load(&self, bundle: SaveBundle) -> Result<MarketSnapshot, DriverError> {
        Ok(self
            .request(|reply| Command::Load { bundle, reply })
            .await??)
    }

    /// Announces a save once the bundle from `save` has been persisted.
    pub async fn report_saved(&self) -> Result<(), DriverError> {
        self.request(|reply| Command::ReportSaved { reply }).await
    }

    pub async fn report_missing_save(&self) -> Result<(), DriverError> {
        self.request(|reply| Command::ReportMissingSave { reply })
            .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, DriverError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| DriverError::Stopped)?;
        response.await.map_err(|_| DriverError::Stopped)
    }
}

/// Moves the engine onto its own task. The task ends once every handle is
/// dropped.
pub fn spawn_game<R, S>(engine: GameEngine<R, S>, cadence: Duration) -> (GameHandle, JoinHandle<()>)
where
    R: RandomSource + Send + 'static,
    S: PresentationSink + Send + 'static,
{
    let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
    let driver = GameDriver {
        engine,
        schedules: Schedules::new(cadence),
        commands: commands_rx,
    };

    let task = tokio::spawn(driver.run());
    (
        GameHandle {
            commands: commands_tx,
        },
        task,
    )
}

struct GameDriver<R, S> {
    engine: GameEngine<R, S>,
    schedules: Schedules,
    commands: mpsc::Receiver<Command>,
}

impl<R: RandomSource, S: PresentationSink> GameDriver<R, S> {
    async fn run(mut self) {
        if self.engine.phase() == RoundPhase::Running {
            self.schedules.start_fresh();
        }

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                due = self.schedules.next_due() => self.fire(due),
            }
        }

        debug!(tick = self.engine.tick(), "game driver stopped");
    }

    fn fire(&mut self, due: ScheduleKind) {
        let report = match due {
            ScheduleKind::Countdown => self.engine.countdown_once(),
            ScheduleKind::Roll => self.engine.roll_once(),
        };
        trace!(
            tick = report.tick,
            schedule = due.as_str(),
            events = report.events.len(),
            "schedule fired"
        );

        if self.engine.phase() != RoundPhase::Running {
            self.schedules.cancel_all();
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::StartRound {
                initial_time,
                reply,
            } => {
                let result = self.engine.start_round(initial_time);
                if result.is_ok() {
                    self.schedules.start_fresh();
                }
                let _ = reply.send(result);
            }
            Command::Pause { reply } => {
                let result = self.engine.pause();
                if result.is_ok() {
                    self.schedules.cancel_all();
                }
                let _ = reply.send(result);
            }
            Command::Resume { reply } => {
                let result = self.engine.resume();
                if result.is_ok() {
                    self.schedules.start_fresh();
                }
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.engine.snapshot());
            }
            Command::Save { reply } => {
                let _ = reply.send(self.engine.save());
            }
            Command::Load { bundle, reply } => {
                let result = self.engine.load(bundle);
                if result.is_ok() {
                    self.schedules.cancel_all();
                }
                let _ = reply.send(result);
            }
            Command::ReportSaved { reply } => {
                self.engine.report_saved();
                let _ = reply.send(());
            }
            Command::ReportMissingSave { reply } => {
                self.engine.report_missing_save();
                let _ = reply.send(());
            }
        }
    }
}
