// API errors and their HTTP mapping
use crate::domain::error::UnknownPanel;
use crate::domain::panel::PanelId;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    UnknownPanel(#[from] UnknownPanel),

    #[error("panel {0} is not enabled on this dashboard")]
    NotScheduled(PanelId),

    #[error("input for {0} must not be blank")]
    BlankInput(PanelId),

    #[error("invalid refresh request: {0}")]
    InvalidBody(String),

    #[error("refresh scheduler is not running")]
    SchedulerStopped,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownPanel(_) | ApiError::NotScheduled(_) => StatusCode::NOT_FOUND,
            ApiError::BlankInput(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::SchedulerStopped => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
