//! Executor builder: constructs the configured backend.

use crate::{
    config::{BackendKind, ExecutorConfig, GatewayConfig},
    gateway::Gateway,
};
use anyhow::{Context, Result};
use executor::{Backend, Bridge, CommandExecutor, FallbackExecutor, SharedExecutor};

/// Build the executor backend selected by `config`.
pub fn build_backend(config: &ExecutorConfig) -> Result<Backend> {
    let backend = match config.backend {
        BackendKind::Fallback => Backend::Fallback(FallbackExecutor::default()),
        BackendKind::Command => {
            let program = config
                .command
                .as_deref()
                .context("executor.command is required for the command backend")?;
            let command = CommandExecutor::new(program)?
                .args(config.args.iter().cloned())
                .envs(config.env.clone());
            tracing::info!("command executor runs '{}'", command.program());
            Backend::Command(command)
        }
    };
    Ok(backend)
}

/// Build gateway state whose executor is constructed lazily on first use.
pub fn build_gateway(config: &GatewayConfig) -> Gateway<Backend> {
    let executor_config = config.executor.clone();
    let executor = SharedExecutor::lazy(move || {
        let backend = build_backend(&executor_config)?;
        tracing::info!("using {} executor", backend.kind());
        Ok(backend)
    });
    let bridge = Bridge::new(config.executor.max_workers, config.stream.chunk_size);
    Gateway::new(&config.auth, executor, bridge)
}
