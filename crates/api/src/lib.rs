pub mod error;
pub mod routes;
pub mod state;
pub mod store;
mod ws;

use axum::Router;

pub use error::{ApiError, ApiResult};
pub use state::AppState;
pub use store::{SaveStore, StoreError};

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

#[cfg(test)]
mod tests {
    use std::{
        path::{Path, PathBuf},
        time::{SystemTime, UNIX_EPOCH},
    };

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
        Router,
    };
    use futures_util::StreamExt;
    use market_sim::{ScriptedSource, Settings};
    use runtime::{spawn_game, BroadcastSink, FeedEvent, GameEngine, DEFAULT_CADENCE};
    use serde_json::Value;
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    use crate::{app, state::AppState, store::SaveStore};

    fn temp_root(name: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("api-{name}-{unique}"))
    }

    fn test_state(root: &Path) -> AppState {
        test_state_saving_to(root.join("save.json"))
    }

    /// No special events fire and every roll adds $3 to grain.
    fn test_state_saving_to(save_path: PathBuf) -> AppState {
        let (events_tx, _) = broadcast::channel(64);
        let engine = GameEngine::new(
            Settings::default(),
            ScriptedSource::constant(0.99, 6),
            BroadcastSink::new(events_tx.clone()),
        )
        .unwrap();
        let (game, _task) = spawn_game(engine, DEFAULT_CADENCE);
        AppState::new(game, events_tx, SaveStore::new(save_path))
    }

    fn drain_news(events: &mut broadcast::Receiver<FeedEvent>) -> Vec<String> {
        let mut news = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let FeedEvent::News { message, .. } = event {
                news.push(message);
            }
        }
        news
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::post(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn post_rounds_starts_new_round() {
        let root = temp_root("start");
        let app = app(test_state(&root));

        let response = send(&app, post_json("/rounds", r#"{"initial_time":30}"#)).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["initial_time"], 30);
        assert_eq!(body["remaining_time"], 30);
    }

    #[tokio::test]
    async fn post_rounds_rejects_non_positive_initial_time() {
        let root = temp_root("reject");
        let app = app(test_state(&root));

        let response = send(&app, post_json("/rounds", r#"{"initial_time":0}"#)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["status"], 400);
    }

    #[tokio::test]
    async fn pausing_without_a_round_conflicts() {
        let root = temp_root("conflict");
        let app = app(test_state(&root));

        let response = send(&app, post_empty("/rounds/pause")).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn pause_and_resume_report_phase() {
        let root = temp_root("phase");
        let app = app(test_state(&root));
        send(&app, post_json("/rounds", r#"{"initial_time":60}"#)).await;

        let paused = send(&app, post_empty("/rounds/pause")).await;
        assert_eq!(paused.status(), StatusCode::OK);
        assert_eq!(json_body(paused).await["phase"], "paused");

        let resumed = send(&app, post_empty("/rounds/resume")).await;
        assert_eq!(resumed.status(), StatusCode::OK);
        assert_eq!(json_body(resumed).await["phase"], "running");
    }

    #[tokio::test]
    async fn market_returns_starting_prices() {
        let root = temp_root("market");
        let app = app(test_state(&root));

        let response = send(&app, Request::get("/market").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["phase"], "idle");
        assert_eq!(body["prices"]["gold"], 10.0);
        assert_eq!(body["prediction_messages"], serde_json::json!([]));
        assert_eq!(body["histories"]["grain"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn loading_without_a_save_is_not_found() {
        let root = temp_root("nosave");
        let app = app(test_state(&root));

        let response = send(&app, post_empty("/saves/load")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "no saved game found");
    }

    #[tokio::test]
    async fn saved_game_loads_back_paused() {
        let root = temp_root("save");
        let app = app(test_state(&root));
        send(&app, post_json("/rounds", r#"{"initial_time":90}"#)).await;

        let saved = send(&app, post_empty("/saves")).await;
        assert_eq!(saved.status(), StatusCode::OK);
        let bundle = json_body(saved).await;
        assert!(root.join("save.json").exists());

        let loaded = send(&app, post_empty("/saves/load")).await;
        assert_eq!(loaded.status(), StatusCode::OK);
        let snapshot = json_body(loaded).await;
        assert_eq!(snapshot["phase"], "paused");
        assert_eq!(snapshot["round"], bundle["round"]);
        assert_eq!(snapshot["histories"], bundle["histories"]);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn successful_save_is_announced() {
        let root = temp_root("announce");
        let state = test_state(&root);
        let mut events = state.subscribe_events();
        let app = app(state);

        let response = send(&app, post_empty("/saves")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(drain_news(&mut events), vec!["Game saved!".to_string()]);
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn failed_save_write_is_not_announced() {
        let root = temp_root("blocked");
        std::fs::create_dir_all(&root).unwrap();
        let blocker = root.join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let state = test_state_saving_to(blocker.join("save.json"));
        let mut events = state.subscribe_events();
        let app = app(state);

        let response = send(&app, post_empty("/saves")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(drain_news(&mut events).is_empty());
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn corrupt_save_is_unprocessable() {
        let root = temp_root("corrupt");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("save.json"), r#"{"histories":{},"round":null,"removed":[]}"#)
            .unwrap();
        let app = app(test_state(&root));

        let response = send(&app, post_empty("/saves/load")).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn websocket_opens_with_snapshot_then_streams_updates() {
        let root = temp_root("ws");
        let state = test_state(&root);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server_app = app(state.clone());
        tokio::spawn(async move { axum::serve(listener, server_app).await.unwrap() });

        let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/events"))
            .await
            .unwrap();

        let first = socket.next().await.unwrap().unwrap();
        let first: Value = serde_json::from_str(first.to_text().unwrap()).unwrap();
        assert_eq!(first["event_type"], "snapshot");
        assert_eq!(first["snapshot"]["phase"], "idle");

        state.game().start_round(5).await.unwrap();

        let second = socket.next().await.unwrap().unwrap();
        let second: Value = serde_json::from_str(second.to_text().unwrap()).unwrap();
        assert_eq!(second["event_type"], "snapshot");
        assert_eq!(second["snapshot"]["phase"], "running");
        assert_eq!(second["snapshot"]["round"]["remaining_time"], 5);
    }
}
