//! Admin login and logout.

use crate::{Authenticator, Token, bearer, secret_eq};
use compact_str::CompactString;
use std::sync::Arc;

/// Configured admin credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Admin username.
    pub username: CompactString,
    /// Admin password.
    pub password: CompactString,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "admin".into(),
            password: "password".into(),
        }
    }
}

/// Login or logout failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// Username or password did not match. Which one is not disclosed.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Logout without a well-formed bearer header.
    #[error("Missing or invalid Authorization header")]
    MissingBearer,
    /// Logout with a value that is neither a live token nor the static secret.
    #[error("Invalid token")]
    TokenNotFound,
}

/// Successful logout outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logout {
    /// The session token was revoked.
    Revoked,
    /// The static secret was presented; it cannot be revoked.
    StaticKeyNotRevocable,
}

impl Logout {
    /// Human-readable detail for the response body.
    pub fn detail(&self) -> &'static str {
        match self {
            Self::Revoked => "Logged out",
            Self::StaticKeyNotRevocable => "Static API key cannot be revoked via logout",
        }
    }
}

/// Exchanges admin credentials for session tokens.
pub struct LoginService {
    credentials: Credentials,
    auth: Arc<Authenticator>,
}

impl LoginService {
    /// Create from admin credentials and the shared authenticator.
    pub fn new(credentials: Credentials, auth: Arc<Authenticator>) -> Self {
        Self { credentials, auth }
    }

    /// Check credentials and issue a new session token on match.
    pub fn login(&self, username: &str, password: &str) -> Result<Token, LoginError> {
        // Evaluate both comparisons so timing does not reveal which field failed.
        let user_ok = secret_eq(&self.credentials.username, username);
        let pass_ok = secret_eq(&self.credentials.password, password);
        if !(user_ok & pass_ok) {
            tracing::warn!("rejected login attempt");
            return Err(LoginError::InvalidCredentials);
        }

        let token = self.auth.tokens().issue();
        tracing::info!("issued session token expiring at {}", token.expires_at);
        Ok(token)
    }

    /// Revoke the token carried by a raw `Authorization` header value.
    pub fn logout(&self, header: Option<&str>) -> Result<Logout, LoginError> {
        let value = bearer(header).map_err(|_| LoginError::MissingBearer)?;
        if self.auth.is_static_key(value) {
            return Ok(Logout::StaticKeyNotRevocable);
        }

        if self.auth.tokens().revoke(value) {
            tracing::info!("revoked session token");
            Ok(Logout::Revoked)
        } else {
            Err(LoginError::TokenNotFound)
        }
    }
}
