use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use market_sim::SimError;
use runtime::DriverError;
use serde_json::json;
use tracing::warn;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no saved game found")]
    NoSavedGame,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Driver(DriverError::Sim(err)) | Self::Store(StoreError::Decode(err)) => {
                sim_status(err)
            }
            Self::Driver(DriverError::Stopped) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(StoreError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoSavedGame => StatusCode::NOT_FOUND,
        }
    }
}

fn sim_status(err: &SimError) -> StatusCode {
    match err {
        SimError::InvalidConfiguration(_) | SimError::UnknownInstrument(_) => {
            StatusCode::BAD_REQUEST
        }
        SimError::InvalidTransition { .. } => StatusCode::CONFLICT,
        SimError::MalformedPersistedState(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, status = status.as_u16(), "request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
