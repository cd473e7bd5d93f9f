use market_sim::{MarketEvent, MarketSnapshot};
use serde::Serialize;
use tokio::sync::broadcast;

/// Receives everything the presentation layer needs: one call per market
/// event and a snapshot after each batch of mutations.
pub trait PresentationSink {
    fn publish_event(&mut self, tick: u64, event: &MarketEvent);

    fn publish_snapshot(&mut self, snapshot: &MarketSnapshot);
}

impl<A: PresentationSink, B: PresentationSink> PresentationSink for (A, B) {
    fn publish_event(&mut self, tick: u64, event: &MarketEvent) {
        self.0.publish_event(tick, event);
        self.1.publish_event(tick, event);
    }

    fn publish_snapshot(&mut self, snapshot: &MarketSnapshot) {
        self.0.publish_snapshot(snapshot);
        self.1.publish_snapshot(snapshot);
    }
}

#[derive(Debug, Default)]
pub struct InMemorySink {
    events: Vec<(u64, MarketEvent)>,
    snapshots: Vec<MarketSnapshot>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[(u64, MarketEvent)] {
        &self.events
    }

    pub fn snapshots(&self) -> &[MarketSnapshot] {
        &self.snapshots
    }

    pub fn last_snapshot(&self) -> Option<&MarketSnapshot> {
        self.snapshots.last()
    }

    /// News log lines, oldest first.
    pub fn news(&self) -> Vec<String> {
        self.events.iter().map(|(_, event)| event.to_string()).collect()
    }
}

impl PresentationSink for InMemorySink {
    fn publish_event(&mut self, tick: u64, event: &MarketEvent) {
        self.events.push((tick, event.clone()));
    }

    fn publish_snapshot(&mut self, snapshot: &MarketSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum FeedEvent {
    News {
        tick: u64,
        message: String,
        event: MarketEvent,
    },
    Snapshot {
        snapshot: MarketSnapshot,
    },
}

impl FeedEvent {
    pub fn news(tick: u64, event: &MarketEvent) -> Self {
        Self::News {
            tick,
            message: event.to_string(),
            event: event.clone(),
        }
    }

    pub fn snapshot(snapshot: MarketSnapshot) -> Self {
        Self::Snapshot { snapshot }
    }
}

/// Fans feed events out to websocket subscribers. Publishing with no
/// subscribers is not an error.
#[derive(Clone, Debug)]
pub struct BroadcastSink {
    events_tx: broadcast::Sender<FeedEvent>,
}

impl BroadcastSink {
    pub fn new(events_tx: broadcast::Sender<FeedEvent>) -> Self {
        Self { events_tx }
    }
}

impl PresentationSink for BroadcastSink {
    fn publish_event(&mut self, tick: u64, event: &MarketEvent) {
        let _ = self.events_tx.send(FeedEvent::news(tick, event));
    }

    fn publish_snapshot(&mut self, snapshot: &MarketSnapshot) {
        let _ = self.events_tx.send(FeedEvent::snapshot(snapshot.clone()));
    }
}
