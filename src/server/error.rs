// HTTP error responses.
// Each route has its own failure body so the site can keep rendering.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::docs::DEFAULT_VERSION;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to fetch documentation: {message}")]
    Docs { message: String },

    #[error("Failed to fetch stats: {message}")]
    Stats { message: String },

    #[error("Failed to fetch versions: {message}")]
    Versions { message: String },

    #[error("Unknown section: {0}")]
    UnknownSection(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Docs { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to fetch documentation", "message": message }),
            ),
            // Zeroed counters keep the stats widget renderable.
            ApiError::Stats { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Failed to fetch stats",
                    "stars": 0,
                    "forks": 0,
                    "watchers": 0,
                    "openIssues": 0
                }),
            ),
            ApiError::Versions { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Failed to fetch versions",
                    "current": DEFAULT_VERSION,
                    "versions": [DEFAULT_VERSION]
                }),
            ),
            ApiError::UnknownSection(_) => {
                (StatusCode::NOT_FOUND, json!({ "error": self.to_string() }))
            }
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, Json(body)).into_response()
    }
}
