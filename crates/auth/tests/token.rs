//! Token store tests.

use agentgate_auth::{DEFAULT_TOKEN_LIFETIME, TokenStore};

#[test]
fn issued_token_is_valid_until_expiry() {
    let store = TokenStore::new(60);
    let token = store.issue_at(1_000);
    assert_eq!(token.expires_at, 1_060);

    assert!(store.validate_at(&token.value, 1_000));
    assert!(store.validate_at(&token.value, 1_059));
    assert!(!store.validate_at(&token.value, 1_060));
    assert!(store.is_empty());
}

#[test]
fn issue_uses_wall_clock() {
    let store = TokenStore::default();
    let token = store.issue();
    assert!(store.validate(&token.value));
    assert_eq!(store.lifetime(), DEFAULT_TOKEN_LIFETIME);
}

#[test]
fn token_values_are_128_bit_hex() {
    let store = TokenStore::default();
    let a = store.issue();
    let b = store.issue();
    assert_eq!(a.value.len(), 32);
    assert!(a.value.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a.value, b.value);
    assert_eq!(store.len(), 2);
}

#[test]
fn revoke_then_validate_fails() {
    let store = TokenStore::default();
    let token = store.issue();

    assert!(store.revoke(&token.value));
    assert!(!store.validate(&token.value));
    // Revoking twice reports not-found rather than failing.
    assert!(!store.revoke(&token.value));
}

#[test]
fn revoke_unknown_token() {
    let store = TokenStore::default();
    assert!(!store.revoke("never-issued"));
}

#[test]
fn validate_prunes_every_expired_entry() {
    let store = TokenStore::new(10);
    let _old = store.issue_at(100);
    let _older = store.issue_at(90);
    let fresh = store.issue_at(200);
    assert_eq!(store.len(), 3);

    assert!(store.validate_at(&fresh.value, 150));
    assert_eq!(store.len(), 1);
}

#[test]
fn prune_reports_removed_count() {
    let store = TokenStore::new(10);
    store.issue_at(0);
    store.issue_at(5);
    store.issue_at(100);

    assert_eq!(store.prune_at(15), 2);
    assert_eq!(store.prune_at(15), 0);
    assert_eq!(store.len(), 1);
}

#[test]
fn zero_lifetime_tokens_never_validate() {
    let store = TokenStore::new(0);
    let token = store.issue_at(500);
    assert!(!store.validate_at(&token.value, 500));
}

#[test]
fn concurrent_issue_and_validate() {
    let store = std::sync::Arc::new(TokenStore::default());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || {
                (0..50)
                    .map(|_| {
                        let token = store.issue();
                        assert!(store.validate(&token.value));
                        token.value
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all = std::collections::BTreeSet::new();
    for handle in handles {
        all.extend(handle.join().unwrap());
    }
    assert_eq!(all.len(), 400);
    assert_eq!(store.len(), 400);
}
