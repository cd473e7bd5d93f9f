pub mod driver;
pub mod engine;
pub mod events;
pub mod journal;
pub mod schedule;
pub mod sink;

pub use driver::{spawn_game, DriverError, GameHandle, DEFAULT_CADENCE};
pub use engine::GameEngine;
pub use sink::{BroadcastSink, FeedEvent, InMemorySink, PresentationSink};
