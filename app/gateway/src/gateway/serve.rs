//! Shared gateway serve entrypoint.

use crate::{api, config::GatewayConfig, gateway::Gateway};
use anyhow::{Context, Result};
use executor::Executor;
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Handle returned by [`serve`]: holds the bound address and shutdown trigger.
pub struct ServeHandle {
    /// The address the gateway is listening on.
    pub addr: SocketAddr,
    /// Send a value to trigger graceful shutdown.
    shutdown_tx: Option<oneshot::Sender<()>>,
    /// Join handle for the server task.
    join: Option<tokio::task::JoinHandle<Result<(), std::io::Error>>>,
}

impl ServeHandle {
    /// The port the gateway is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Trigger graceful shutdown and wait for the server to stop.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            join.await??;
        }
        tracing::info!("gateway shut down");
        Ok(())
    }
}

/// Build the gateway from `config` and start serving on `bind`.
///
/// The server runs in a spawned task; call `handle.shutdown()` to stop it.
pub async fn serve(config: &GatewayConfig, bind: &str) -> Result<ServeHandle> {
    serve_with(Gateway::from_config(config), bind).await
}

/// Serve already assembled gateway state.
pub async fn serve_with<E: Executor>(gateway: Gateway<E>, bind: &str) -> Result<ServeHandle> {
    let app = api::router(gateway);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    let addr = listener.local_addr()?;
    tracing::info!("gateway listening on {addr}");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("received shutdown signal");
            })
            .await
    });

    Ok(ServeHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        join: Some(join),
    })
}
