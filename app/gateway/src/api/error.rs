//! HTTP error responses.

use auth::{AuthError, LoginError};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use executor::BridgeError;
use protocol::Detail;

/// Every failure a handler can return, rendered as `{"detail": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    /// Request body missing, malformed or of the wrong shape.
    #[error(transparent)]
    Body(#[from] JsonRejection),
    /// The executor could not be constructed.
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth(_) | Self::Login(_) => StatusCode::UNAUTHORIZED,
            Self::Bridge(BridgeError::ToolNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Bridge(BridgeError::Executor(_)) | Self::Unavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Body(rejection) => rejection.status(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Unavailable(format!("{e:#}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            Self::Body(rejection) => rejection.body_text(),
            other => other.to_string(),
        };
        if status.is_server_error() {
            tracing::error!("request failed: {detail}");
        } else {
            tracing::debug!("request rejected with {status}: {detail}");
        }
        (status, Json(Detail::new(detail))).into_response()
    }
}
