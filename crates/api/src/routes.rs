use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use market_sim::{MarketSnapshot, RoundPhase, SaveBundle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    ws,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/rounds", post(start_round))
        .route("/rounds/pause", post(pause_round))
        .route("/rounds/resume", post(resume_round))
        .route("/market", get(market))
        .route("/saves", post(save_game))
        .route("/saves/load", post(load_game))
        .route("/ws/events", get(ws::events_socket))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct StartRoundRequest {
    initial_time: i64,
}

#[derive(Debug, Serialize)]
struct PhaseResponse {
    phase: RoundPhase,
}

async fn start_round(
    State(state): State<AppState>,
    Json(request): Json<StartRoundRequest>,
) -> ApiResult<impl IntoResponse> {
    let round = state.game().start_round(request.initial_time).await?;
    Ok((StatusCode::CREATED, Json(round)))
}

async fn pause_round(State(state): State<AppState>) -> ApiResult<Json<PhaseResponse>> {
    let phase = state.game().pause().await?;
    Ok(Json(PhaseResponse { phase }))
}

async fn resume_round(State(state): State<AppState>) -> ApiResult<Json<PhaseResponse>> {
    let phase = state.game().resume().await?;
    Ok(Json(PhaseResponse { phase }))
}

async fn market(State(state): State<AppState>) -> ApiResult<Json<MarketSnapshot>> {
    Ok(Json(state.game().snapshot().await?))
}

async fn save_game(State(state): State<AppState>) -> ApiResult<Json<SaveBundle>> {
    let bundle = state.game().save().await?;
    state.saves().write(&bundle).await?;
    info!(path = %state.saves().path().display(), "save written");
    state.game().report_saved().await?;
    Ok(Json(bundle))
}

async fn load_game(State(state): State<AppState>) -> ApiResult<Json<MarketSnapshot>> {
    let Some(bundle) = state.saves().read().await? else {
        state.game().report_missing_save().await?;
        return Err(ApiError::NoSavedGame);
    };
    Ok(Json(state.game().load(bundle).await?))
}
