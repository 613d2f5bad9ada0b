//! Gateway configuration loaded from TOML and the environment.
//!
//! Resolution order: built-in defaults, then the optional TOML file (with
//! `${VAR}` expansion), then the `AGENT_*` environment variables.

use crate::utils::expand_env_vars;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

/// Static API key. Unset or empty means open mode.
pub const ENV_API_KEY: &str = "AGENT_API_KEY";
/// Admin username for `/login`.
pub const ENV_ADMIN_USER: &str = "AGENT_ADMIN_USER";
/// Admin password for `/login`.
pub const ENV_ADMIN_PASS: &str = "AGENT_ADMIN_PASS";
/// Session token lifetime in seconds.
pub const ENV_TOKEN_LIFETIME: &str = "AGENT_TOKEN_LIFETIME";

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server bind configuration.
    pub server: ServerConfig,
    /// Credentials and session tokens.
    pub auth: AuthConfig,
    /// Executor backend and worker pool.
    pub executor: ExecutorConfig,
    /// Streaming behavior.
    pub stream: StreamConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Static API key accepted as a bearer token. `None` disables auth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub admin_user: String,
    pub admin_password: String,
    /// Session token lifetime in seconds.
    pub token_lifetime: u64,
}

impl AuthConfig {
    /// The static API key, if one is set and non-empty.
    pub fn static_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            admin_user: "admin".to_owned(),
            admin_password: "password".to_owned(),
            token_lifetime: auth::DEFAULT_TOKEN_LIFETIME,
        }
    }
}

/// Executor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Which executor to run.
    pub backend: BackendKind,
    /// Program for the command backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Command arguments.
    pub args: Vec<String>,
    /// Extra environment variables for the command.
    pub env: BTreeMap<String, String>,
    /// Maximum concurrent executor calls.
    pub max_workers: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Fallback,
            command: None,
            args: Vec::new(),
            env: BTreeMap::new(),
            max_workers: executor::DEFAULT_MAX_WORKERS,
        }
    }
}

/// Supported executor backends.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Built-in tool-driven executor (default).
    #[default]
    Fallback,
    /// External command per invocation.
    Command,
}

/// Streaming configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Characters per chunk when the executor has no native streaming.
    pub chunk_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: executor::DEFAULT_CHUNK_SIZE,
        }
    }
}

impl GatewayConfig {
    /// Parse a TOML string into a `GatewayConfig`, expanding environment
    /// variables first.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let expanded = expand_env_vars(toml_str);
        let config: Self = toml::from_str(&expanded).context("invalid gateway configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("failed to load {}", path.display()))
    }

    /// Build the effective configuration: optional file, then process
    /// environment overrides, then validation.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let config = Self::load(path)?;
                tracing::info!("loaded configuration from {}", path.display());
                config
            }
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `AGENT_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply `AGENT_*` overrides from an explicit variable lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.auth.api_key = Some(key);
        }
        if let Some(user) = lookup(ENV_ADMIN_USER) {
            self.auth.admin_user = user;
        }
        if let Some(pass) = lookup(ENV_ADMIN_PASS) {
            self.auth.admin_password = pass;
        }
        if let Some(lifetime) = lookup(ENV_TOKEN_LIFETIME) {
            self.auth.token_lifetime = lifetime
                .trim()
                .parse()
                .with_context(|| format!("{ENV_TOKEN_LIFETIME} must be a whole number of seconds"))?;
        }
        Ok(())
    }

    /// Reject configurations the gateway cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.stream.chunk_size == 0 {
            anyhow::bail!("stream.chunk_size must be at least 1");
        }
        if self.executor.max_workers == 0 {
            anyhow::bail!("executor.max_workers must be at least 1");
        }
        if self.executor.backend == BackendKind::Command
            && self.executor.command.as_deref().is_none_or(|c| c.trim().is_empty())
        {
            anyhow::bail!("executor.command is required for the command backend");
        }
        Ok(())
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
