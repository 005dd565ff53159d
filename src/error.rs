use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::resume::ContentError;

/// Errors an HTTP handler can return.
/// Details go to the log; the client only sees a code and a generic message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AppError::Content(e) => {
                tracing::error!("Content error: {e}");
                ("CONTENT_ERROR", "Portfolio content is unavailable")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
