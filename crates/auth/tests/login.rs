//! Login service tests.

use agentgate_auth::{Authenticator, Credentials, LoginError, LoginService, Logout, TokenStore};
use std::sync::Arc;

fn service(secret: Option<&str>) -> (LoginService, Arc<Authenticator>) {
    let auth = Arc::new(Authenticator::new(
        secret.map(Into::into),
        Arc::new(TokenStore::default()),
    ));
    (LoginService::new(Credentials::default(), auth.clone()), auth)
}

#[test]
fn login_issues_usable_token() {
    let (login, auth) = service(Some("tests-key"));
    let token = login.login("admin", "password").unwrap();
    assert!(auth.tokens().validate(&token.value));
    assert!(
        auth.authorize(Some(format!("Bearer {}", token.value).as_str()))
            .is_ok()
    );
}

#[test]
fn login_failure_is_uniform() {
    let (login, auth) = service(Some("tests-key"));
    let bad_user = login.login("bad", "password").unwrap_err();
    let bad_pass = login.login("admin", "no").unwrap_err();
    assert_eq!(bad_user, LoginError::InvalidCredentials);
    assert_eq!(bad_user, bad_pass);
    assert_eq!(bad_user.to_string(), "Invalid credentials");
    assert!(auth.tokens().is_empty());
}

#[test]
fn custom_credentials() {
    let auth = Arc::new(Authenticator::new(None, Arc::new(TokenStore::default())));
    let login = LoginService::new(
        Credentials {
            username: "ops".into(),
            password: "hunter2".into(),
        },
        auth,
    );
    assert!(login.login("ops", "hunter2").is_ok());
    assert!(login.login("admin", "password").is_err());
}

#[test]
fn logout_revokes_token() {
    let (login, auth) = service(Some("tests-key"));
    let token = login.login("admin", "password").unwrap();
    let header = format!("Bearer {}", token.value);

    assert_eq!(login.logout(Some(header.as_str())), Ok(Logout::Revoked));
    assert!(!auth.tokens().validate(&token.value));
    assert_eq!(login.logout(Some(header.as_str())), Err(LoginError::TokenNotFound));
}

#[test]
fn logout_static_key_is_not_revocable() {
    let (login, auth) = service(Some("tests-key"));
    let outcome = login.logout(Some("Bearer tests-key")).unwrap();
    assert_eq!(outcome, Logout::StaticKeyNotRevocable);
    assert_eq!(
        outcome.detail(),
        "Static API key cannot be revoked via logout"
    );
    assert!(auth.authorize(Some("Bearer tests-key")).is_ok());
}

#[test]
fn logout_requires_bearer_header() {
    let (login, _) = service(None);
    assert_eq!(login.logout(None), Err(LoginError::MissingBearer));
    assert_eq!(login.logout(Some("Token x")), Err(LoginError::MissingBearer));
    assert_eq!(
        LoginError::MissingBearer.to_string(),
        "Missing or invalid Authorization header"
    );
}

#[test]
fn logout_unknown_token() {
    let (login, _) = service(None);
    let err = login.logout(Some("Bearer nope")).unwrap_err();
    assert_eq!(err, LoginError::TokenNotFound);
    assert_eq!(err.to_string(), "Invalid token");
}

#[test]
fn expired_token_rejected() {
    let (login, auth) = service(Some("tests-key"));
    let token = login.login("admin", "password").unwrap();
    assert!(!auth.tokens().validate_at(&token.value, token.expires_at));
}
