//! Request-level error taxonomy for the auth endpoints.
//!
//! Credential and decode failures are collapsed into these categories before
//! anything reaches the client; store errors are logged here and surfaced as
//! an opaque 500 with no internal detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email and wrong password surface identically, on purpose.
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("Email already in use.")]
    EmailInUse,
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::EmailInUse => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            error!("internal error: {err:?}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error."})),
            )
                .into_response();
        }
        (self.status(), Json(json!({"error": self.to_string()}))).into_response()
    }
}
