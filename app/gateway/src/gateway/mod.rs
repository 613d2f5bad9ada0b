//! Shared gateway state and its construction.

use crate::config::{AuthConfig, GatewayConfig};
use auth::{Authenticator, Credentials, LoginService, TokenStore};
use executor::{Backend, Bridge, Executor, SharedExecutor};
use std::sync::Arc;

pub mod builder;
pub mod serve;

/// Shared state available to all request handlers.
pub struct Gateway<E: Executor> {
    /// Bearer header authorization.
    pub auth: Arc<Authenticator>,
    /// Admin login and logout.
    pub login: Arc<LoginService>,
    /// The process-wide executor, built on first use.
    pub executor: Arc<SharedExecutor<E>>,
    /// Worker pool for executor calls.
    pub bridge: Bridge,
}

impl<E: Executor> Gateway<E> {
    /// Assemble the state from auth settings, an executor holder and a bridge.
    pub fn new(config: &AuthConfig, executor: SharedExecutor<E>, bridge: Bridge) -> Self {
        let tokens = Arc::new(TokenStore::new(config.token_lifetime));
        let auth = Arc::new(Authenticator::new(
            config.static_key().map(Into::into),
            tokens,
        ));
        if auth.is_open() {
            tracing::warn!(
                "no API key configured, every request is authorized; use only for local development"
            );
        }

        let defaults = Credentials::default();
        if defaults.username == config.admin_user && defaults.password == config.admin_password {
            tracing::warn!("admin login uses the default credentials");
        }
        let login = Arc::new(LoginService::new(
            Credentials {
                username: config.admin_user.as_str().into(),
                password: config.admin_password.as_str().into(),
            },
            Arc::clone(&auth),
        ));

        Self {
            auth,
            login,
            executor: Arc::new(executor),
            bridge,
        }
    }
}

impl Gateway<Backend> {
    /// Build the gateway state for a resolved configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        builder::build_gateway(config)
    }
}

impl<E: Executor> Clone for Gateway<E> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            login: Arc::clone(&self.login),
            executor: Arc::clone(&self.executor),
            bridge: self.bridge.clone(),
        }
    }
}
