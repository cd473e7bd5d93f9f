use runtime::{FeedEvent, GameHandle};
use tokio::sync::broadcast;

use crate::store::SaveStore;

#[derive(Clone, Debug)]
pub struct AppState {
    game: GameHandle,
    events_tx: broadcast::Sender<FeedEvent>,
    saves: SaveStore,
}

impl AppState {
    /// `events_tx` must be the sender the game's broadcast sink publishes on.
    pub fn new(game: GameHandle, events_tx: broadcast::Sender<FeedEvent>, saves: SaveStore) -> Self {
        Self {
            game,
            events_tx,
            saves,
        }
    }

    pub fn game(&self) -> &GameHandle {
        &self.game
    }

    pub fn saves(&self) -> &SaveStore {
        &self.saves
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FeedEvent> {
        self.events_tx.subscribe()
    }
}
