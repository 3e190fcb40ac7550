//! Identity error type with Sentry integration.
//!
//! Session store failures are captured to Sentry before responding to the
//! client. A malformed history reference means "no history": handlers
//! should read it through `history_or_none`, and if one is returned anyway
//! it answers 404 like any other missing history.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use session_identity_core::HistoryIdError;
use thiserror::Error;

/// Errors surfaced by the identity layer.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// A stored history reference is not a valid store identifier.
    #[error("invalid history identifier: {0}")]
    InvalidIdentifier(#[from] HistoryIdError),

    /// The session store failed to load or modify the session.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        match self {
            Self::Session(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            Self::InvalidIdentifier(_) => {
                tracing::warn!(error = %self, "Treating malformed history reference as missing");
                (StatusCode::NOT_FOUND, "No history").into_response()
            }
        }
    }
}

/// Result type alias for `IdentityError`.
pub type Result<T> = std::result::Result<T, IdentityError>;
