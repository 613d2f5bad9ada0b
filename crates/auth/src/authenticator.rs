//! Bearer header authentication.
//!
//! A request is authorized by either the configured static secret or a
//! live session token. The static secret is checked first and never
//! touches the token store, so it stays usable through any token churn.
//! With no static secret configured every request is authorized; that
//! open mode is meant for local development only.

use crate::{TokenStore, secret_eq};
use compact_str::CompactString;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// How a request was authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// No static secret configured; authentication is disabled.
    Open,
    /// The static secret was presented.
    StaticKey,
    /// A live session token was presented.
    Session,
}

/// Authorization failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    #[error("Missing Authorization header")]
    Missing,
    /// The header is not of the form `Bearer <value>`.
    #[error("Invalid Authorization header")]
    Malformed,
    /// The bearer value is neither the static secret nor a live token.
    #[error("Invalid API token")]
    InvalidToken,
}

/// Extract the value of a `Bearer <value>` header.
pub fn bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::Missing)?;
    header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::Malformed)
}

/// Gatekeeper for protected endpoints.
pub struct Authenticator {
    secret: Option<CompactString>,
    tokens: Arc<TokenStore>,
}

impl Authenticator {
    /// Create from an optional static secret and the shared token store.
    pub fn new(secret: Option<CompactString>, tokens: Arc<TokenStore>) -> Self {
        Self { secret, tokens }
    }

    /// Whether authentication is disabled.
    pub fn is_open(&self) -> bool {
        self.secret.is_none()
    }

    /// Whether `value` is the configured static secret.
    pub fn is_static_key(&self, value: &str) -> bool {
        self.secret
            .as_deref()
            .is_some_and(|secret| secret_eq(secret, value))
    }

    /// The token store backing session grants.
    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Authorize a request from its raw `Authorization` header value.
    pub fn authorize(&self, header: Option<&str>) -> Result<Grant, AuthError> {
        if self.is_open() {
            return Ok(Grant::Open);
        }

        let value = bearer(header)?;
        if self.is_static_key(value) {
            return Ok(Grant::StaticKey);
        }

        if self.tokens.validate(value) {
            Ok(Grant::Session)
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}
