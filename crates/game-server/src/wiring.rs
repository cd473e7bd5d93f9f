use api::AppState;
use axum::{routing::get, Router};

pub fn build_app(state: AppState) -> Router {
    api::app(state).route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use api::{AppState, SaveStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use market_sim::SeededSource;
    use runtime::{spawn_game, BroadcastSink, GameEngine, DEFAULT_CADENCE};
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    #[tokio::test]
    async fn server_healthcheck_responds_ok() {
        let (events_tx, _) = broadcast::channel(16);
        let engine = GameEngine::new(
            Default::default(),
            SeededSource::new(1),
            BroadcastSink::new(events_tx.clone()),
        )
        .unwrap();
        let (game, _task) = spawn_game(engine, DEFAULT_CADENCE);
        let state = AppState::new(game, events_tx, SaveStore::new("unused.json"));
        let app = super::build_app(state);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
