// In crates/web-server/src/error.rs

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Leaderboard computation failed")]
    Leaderboard(#[source] leaderboard::Error),
}

impl From<leaderboard::Error> for Error {
    fn from(err: leaderboard::Error) -> Self {
        match err {
            // A pagination contract violation is the caller's fault, not ours.
            leaderboard::Error::InvalidPagination(msg) => Self::Validation(msg),
            other => Self::Leaderboard(other),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Leaderboard(err) => {
                tracing::error!(error = %err, "Leaderboard request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
