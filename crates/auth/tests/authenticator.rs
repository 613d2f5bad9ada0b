//! Authenticator tests.

use agentgate_auth::{AuthError, Authenticator, Grant, TokenStore, bearer};
use std::sync::Arc;

fn guarded(secret: &str) -> Authenticator {
    Authenticator::new(Some(secret.into()), Arc::new(TokenStore::default()))
}

#[test]
fn open_mode_authorizes_everything() {
    let auth = Authenticator::new(None, Arc::new(TokenStore::default()));
    assert!(auth.is_open());
    assert_eq!(auth.authorize(None), Ok(Grant::Open));
    assert_eq!(auth.authorize(Some("garbage")), Ok(Grant::Open));
}

#[test]
fn missing_header_rejected() {
    let auth = guarded("secret123");
    let err = auth.authorize(None).unwrap_err();
    assert_eq!(err, AuthError::Missing);
    assert_eq!(err.to_string(), "Missing Authorization header");
}

#[test]
fn empty_header_counts_as_missing() {
    let auth = guarded("secret123");
    assert_eq!(auth.authorize(Some("")), Err(AuthError::Missing));
    assert_eq!(bearer(Some("")), Err(AuthError::Missing));
}

#[test]
fn malformed_header_rejected() {
    let auth = guarded("secret123");
    assert_eq!(auth.authorize(Some("secret123")), Err(AuthError::Malformed));
    assert_eq!(auth.authorize(Some("Basic abc")), Err(AuthError::Malformed));
    assert_eq!(
        AuthError::Malformed.to_string(),
        "Invalid Authorization header"
    );
}

#[test]
fn static_secret_accepted() {
    let auth = guarded("secret123");
    assert_eq!(auth.authorize(Some("Bearer secret123")), Ok(Grant::StaticKey));
}

#[test]
fn wrong_value_rejected() {
    let auth = guarded("secret123");
    let err = auth.authorize(Some("Bearer wrong")).unwrap_err();
    assert_eq!(err, AuthError::InvalidToken);
    assert_eq!(err.to_string(), "Invalid API token");
}

#[test]
fn empty_bearer_value_rejected() {
    let auth = guarded("secret123");
    assert_eq!(auth.authorize(Some("Bearer ")), Err(AuthError::InvalidToken));
}

#[test]
fn session_token_accepted_until_revoked() {
    let auth = guarded("secret123");
    let token = auth.tokens().issue();
    let header = format!("Bearer {}", token.value);

    assert_eq!(auth.authorize(Some(header.as_str())), Ok(Grant::Session));
    auth.tokens().revoke(&token.value);
    assert_eq!(auth.authorize(Some(header.as_str())), Err(AuthError::InvalidToken));
}

#[test]
fn static_secret_survives_token_churn() {
    let auth = guarded("secret123");
    for _ in 0..10 {
        let token = auth.tokens().issue();
        auth.tokens().revoke(&token.value);
    }
    auth.tokens().prune_at(u64::MAX);
    assert_eq!(auth.authorize(Some("Bearer secret123")), Ok(Grant::StaticKey));
    assert!(!auth.tokens().revoke("secret123"));
}

#[test]
fn bearer_extraction() {
    assert_eq!(bearer(Some("Bearer abc")), Ok("abc"));
    assert_eq!(bearer(Some("Bearer a b")), Ok("a b"));
    assert_eq!(bearer(Some("bearer abc")), Err(AuthError::Malformed));
    assert_eq!(bearer(None), Err(AuthError::Missing));
}
