//! Authentication for the agentgate gateway.
//!
//! Three pieces, leaves first: the [`TokenStore`] owning issued session
//! tokens, the [`Authenticator`] deciding whether a bearer header grants
//! access, and the [`LoginService`] exchanging admin credentials for tokens.

pub use {
    authenticator::{AuthError, Authenticator, Grant, bearer},
    login::{Credentials, LoginError, LoginService, Logout},
    token::{DEFAULT_TOKEN_LIFETIME, Token, TokenStore, unix_now},
};

mod authenticator;
mod login;
mod token;

/// Compare two secrets without short-circuiting on the first differing byte.
pub(crate) fn secret_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}
