//! Webhook request errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use github::GitHubError;
use serde_json::json;
use thiserror::Error;
use triage::ErrorKind;

#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature header missing or wrong while a secret is configured.
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Unsupported event: {event}")]
    UnsupportedEvent { event: String },

    #[error("Invalid JSON payload: {message}")]
    InvalidPayload { message: String },

    #[error("Missing action")]
    MissingAction,

    #[error("Missing required issue fields")]
    MissingFields,

    /// Applying the verdict to GitHub failed.
    #[error(transparent)]
    Actions(#[from] GitHubError),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::UnsupportedEvent { .. }
            | WebhookError::InvalidPayload { .. }
            | WebhookError::MissingAction
            | WebhookError::MissingFields => StatusCode::BAD_REQUEST,
            WebhookError::Actions(e) if e.kind() == ErrorKind::Configuration => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            WebhookError::Actions(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Webhook request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Webhook request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
