//! In-memory session token store.
//!
//! Tokens map to an absolute expiry in unix seconds. Expired entries are
//! pruned lazily on validation, so no background sweeper is needed. The
//! store lives for the process lifetime only.

use compact_str::{CompactString, format_compact};
use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_LIFETIME: u64 = 60 * 60 * 24;

/// An issued session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Opaque token value (128 random bits, hex encoded).
    pub value: CompactString,
    /// Expiry timestamp (unix seconds).
    pub expires_at: u64,
}

/// Thread-safe store of issued tokens.
pub struct TokenStore {
    lifetime: u64,
    tokens: Mutex<BTreeMap<CompactString, u64>>,
}

impl TokenStore {
    /// Create an empty store issuing tokens valid for `lifetime` seconds.
    pub fn new(lifetime: u64) -> Self {
        Self {
            lifetime,
            tokens: Mutex::new(BTreeMap::new()),
        }
    }

    /// Configured token lifetime in seconds.
    pub fn lifetime(&self) -> u64 {
        self.lifetime
    }

    /// Issue a fresh token expiring `lifetime` seconds from now.
    pub fn issue(&self) -> Token {
        self.issue_at(unix_now())
    }

    /// Issue a fresh token relative to the given clock reading.
    pub fn issue_at(&self, now: u64) -> Token {
        let expires_at = now.saturating_add(self.lifetime);
        let mut tokens = self.tokens.lock();
        let value = loop {
            let candidate = format_compact!("{:032x}", rand::random::<u128>());
            if !tokens.contains_key(&candidate) {
                break candidate;
            }
        };
        tokens.insert(value.clone(), expires_at);
        Token { value, expires_at }
    }

    /// Prune expired tokens, then report whether `value` is still live.
    pub fn validate(&self, value: &str) -> bool {
        self.validate_at(value, unix_now())
    }

    /// [`validate`](Self::validate) against the given clock reading.
    pub fn validate_at(&self, value: &str, now: u64) -> bool {
        let mut tokens = self.tokens.lock();
        tokens.retain(|_, expires_at| *expires_at > now);
        tokens.get(value).is_some_and(|expires_at| *expires_at > now)
    }

    /// Remove a token. Returns whether it was present.
    pub fn revoke(&self, value: &str) -> bool {
        self.tokens.lock().remove(value).is_some()
    }

    /// Remove every token whose expiry is at or before `now`.
    ///
    /// Returns the number of tokens removed.
    pub fn prune_at(&self, now: u64) -> usize {
        let mut tokens = self.tokens.lock();
        let before = tokens.len();
        tokens.retain(|_, expires_at| *expires_at > now);
        before - tokens.len()
    }

    /// Number of tokens currently held, including not-yet-pruned ones.
    pub fn len(&self) -> usize {
        self.tokens.lock().len()
    }

    /// Check if the store holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.lock().is_empty()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LIFETIME)
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
