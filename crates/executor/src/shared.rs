//! Lazily constructed, process-wide executor instance.

use crate::Executor;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::OnceCell;

type Factory<E> = Box<dyn Fn() -> Result<E> + Send + Sync>;

/// Builds the executor on first use and hands out the same instance after.
///
/// Concurrent first callers wait on a single construction. A failed
/// construction is not cached, so a later call retries it.
pub struct SharedExecutor<E: Executor> {
    cell: OnceCell<Arc<E>>,
    factory: Factory<E>,
}

impl<E: Executor> SharedExecutor<E> {
    /// Create a holder that builds the executor with `factory` on first use.
    pub fn lazy<F>(factory: F) -> Self
    where
        F: Fn() -> Result<E> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Create a holder around an already built executor.
    pub fn ready(executor: E) -> Self {
        Self {
            cell: OnceCell::new_with(Some(Arc::new(executor))),
            factory: Box::new(|| -> Result<E> { anyhow::bail!("executor already constructed") }),
        }
    }

    /// Whether the executor has been built.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// Get the executor, building it if this is the first call.
    pub async fn get(&self) -> Result<Arc<E>> {
        let executor = self
            .cell
            .get_or_try_init(|| async {
                let executor = (self.factory)()?;
                tracing::info!("executor constructed");
                Ok::<_, anyhow::Error>(Arc::new(executor))
            })
            .await?;
        Ok(Arc::clone(executor))
    }
}
