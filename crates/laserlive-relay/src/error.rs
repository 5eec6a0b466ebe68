//! Error types for the relay.
//!
//! [`RelayError`] unifies all failure modes into a single enum that can
//! be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use laserlive_db::DbError;

/// Errors that can occur in the relay.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Required configuration is missing or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The live state store failed.
    #[error("store error: {0}")]
    Store(#[from] DbError),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An inbound frame or payload had the wrong shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidPayload(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
            Self::Store(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
            Self::Config(msg) | Self::Bind(msg) | Self::Serve(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
