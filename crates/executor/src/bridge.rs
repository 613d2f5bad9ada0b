//! Bridge from blocking executors to async callers.
//!
//! One-shot executor calls run on tokio's blocking pool and native streams
//! run as their own tasks, both bounded by a semaphore, so a slow executor
//! never stalls the tasks accepting and serving requests.
//! The caller suspends until the worker hands back a result (one-shot) or
//! the next fragment (streaming). No timeout is imposed here.

use crate::{Executor, Payload, Tool};
use async_stream::stream;
use compact_str::CompactString;
use futures_core::Stream;
use futures_util::StreamExt;
use serde_json::Value;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    sync::{OwnedSemaphorePermit, Semaphore, mpsc},
    task::AbortHandle,
};

/// Default number of concurrent executor workers.
pub const DEFAULT_MAX_WORKERS: usize = 16;

/// Default size, in characters, of chunks produced for non-streaming executors.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Fragments buffered between a streaming worker and its consumer.
const FRAGMENT_BUFFER: usize = 32;

/// Uniform failure shape for executor and tool calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// No tool with the given name in the executor's catalogue.
    #[error("Tool not found")]
    ToolNotFound(CompactString),
    /// The executor or tool failed; carries the underlying message.
    #[error("{0}")]
    Executor(String),
}

impl BridgeError {
    fn executor(e: anyhow::Error) -> Self {
        Self::Executor(format!("{e:#}"))
    }
}

/// Result of a one-shot invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    /// Generated output text.
    pub output: String,
    /// Names of tools used.
    pub used_tools: Vec<CompactString>,
    /// Wall-clock duration of the executor call.
    pub duration: Duration,
}

impl InvocationResult {
    /// Call duration in whole milliseconds.
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }
}

/// One ordered fragment of streamed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    /// Fragment text.
    pub output: String,
}

/// Dispatches executor work onto a bounded pool of blocking workers.
#[derive(Clone)]
pub struct Bridge {
    permits: Arc<Semaphore>,
    chunk_size: usize,
}

impl Bridge {
    /// Create a bridge running at most `max_workers` executor calls at once,
    /// chunking non-streamed output into `chunk_size` characters.
    pub fn new(max_workers: usize, chunk_size: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_workers.max(1))),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Configured chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Workers currently free.
    pub fn available_workers(&self) -> usize {
        self.permits.available_permits()
    }

    async fn permit(&self) -> Result<OwnedSemaphorePermit, BridgeError> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| BridgeError::Executor("executor worker pool closed".into()))
    }

    /// Run `Executor::invoke` on a worker and wait for its result.
    pub async fn invoke<E: Executor + ?Sized>(
        &self,
        executor: Arc<E>,
        payload: Payload,
    ) -> Result<InvocationResult, BridgeError> {
        let permit = self.permit().await?;
        let started = Instant::now();
        let joined = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            executor.invoke(&payload)
        })
        .await;
        let duration = started.elapsed();

        let invocation = match joined {
            Ok(Ok(invocation)) => invocation,
            Ok(Err(e)) => {
                tracing::warn!("executor invocation failed: {e:#}");
                return Err(BridgeError::executor(e));
            }
            Err(e) => {
                tracing::error!("executor worker aborted: {e}");
                return Err(BridgeError::Executor(e.to_string()));
            }
        };

        tracing::debug!("executor invocation finished in {duration:?}");
        Ok(InvocationResult {
            output: invocation.output,
            used_tools: invocation.used_tools,
            duration,
        })
    }

    /// Run a named tool from the executor's catalogue on a worker.
    pub async fn run_tool<E: Executor + ?Sized>(
        &self,
        executor: Arc<E>,
        name: &str,
        input: Value,
    ) -> Result<Value, BridgeError> {
        let tool: Arc<dyn Tool> = executor
            .tools()
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::ToolNotFound(name.into()))?;

        let permit = self.permit().await?;
        let joined = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            tool.call(input)
        })
        .await;

        match joined {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!("tool '{name}' failed: {e:#}");
                Err(BridgeError::executor(e))
            }
            Err(e) => {
                tracing::error!("tool worker aborted: {e}");
                Err(BridgeError::Executor(e.to_string()))
            }
        }
    }

    /// Stream the executor's output as ordered events.
    ///
    /// Uses the executor's native incremental output when it has one and
    /// otherwise chunks the full output. Each call starts a fresh stream.
    /// Dropping the stream aborts the worker and releases its permit. A
    /// failure ends the stream after one `Err` item.
    pub fn stream<E: Executor + ?Sized>(
        &self,
        executor: Arc<E>,
        payload: Payload,
    ) -> impl Stream<Item = Result<StreamEvent, BridgeError>> + Send + use<E> {
        let bridge = self.clone();
        stream! {
            let permit = match bridge.permit().await {
                Ok(permit) => permit,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let (tx, mut rx) = mpsc::channel(FRAGMENT_BUFFER);
            let worker = if executor.supports_streaming() {
                tokio::spawn(forward(executor, payload, permit, tx))
            } else {
                let chunk_size = bridge.chunk_size;
                tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    chunk(&*executor, &payload, chunk_size, &tx);
                })
            };
            let _abort = AbortOnDrop(worker.abort_handle());

            while let Some(item) = rx.recv().await {
                match item {
                    Ok(output) => {
                        yield Ok(StreamEvent { output });
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }

            if let Err(e) = worker.await {
                tracing::error!("stream worker aborted: {e}");
                yield Err(BridgeError::Executor(e.to_string()));
            }
        }
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORKERS, DEFAULT_CHUNK_SIZE)
    }
}

/// Aborts a stream worker when the consuming stream goes away.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Forward native fragments in order until the executor finishes, fails, or
/// the receiving side is gone.
async fn forward<E: Executor + ?Sized>(
    executor: Arc<E>,
    payload: Payload,
    permit: OwnedSemaphorePermit,
    tx: mpsc::Sender<Result<String, BridgeError>>,
) {
    let _permit = permit;
    let mut fragments = match executor.stream_invoke(&payload) {
        Ok(fragments) => fragments,
        Err(e) => {
            tracing::warn!("executor stream failed to start: {e:#}");
            let _ = tx.send(Err(BridgeError::executor(e))).await;
            return;
        }
    };

    while let Some(fragment) = fragments.next().await {
        let failed = fragment.is_err();
        let item = fragment.map_err(|e| {
            tracing::warn!("executor stream failed: {e:#}");
            BridgeError::executor(e)
        });
        if tx.send(item).await.is_err() {
            tracing::debug!("stream consumer gone, stopping executor");
            return;
        }
        if failed {
            return;
        }
    }
}

/// Run a one-shot invocation on the worker thread and send its output in
/// chunks.
fn chunk<E: Executor + ?Sized>(
    executor: &E,
    payload: &Payload,
    chunk_size: usize,
    tx: &mpsc::Sender<Result<String, BridgeError>>,
) {
    match executor.invoke(payload) {
        Ok(invocation) => {
            for chunk in chunk_text(&invocation.output, chunk_size) {
                if tx.blocking_send(Ok(chunk.to_owned())).is_err() {
                    tracing::debug!("stream consumer gone, dropping remaining chunks");
                    return;
                }
            }
        }
        Err(e) => {
            tracing::warn!("executor invocation failed: {e:#}");
            let _ = tx.blocking_send(Err(BridgeError::executor(e)));
        }
    }
}

/// Split text into consecutive chunks of at most `size` characters.
///
/// Chunks never split a character. A `size` of zero is treated as one.
pub fn chunk_text(text: &str, size: usize) -> impl Iterator<Item = &str> {
    let size = size.max(1);
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = rest
            .char_indices()
            .nth(size)
            .map_or(rest.len(), |(i, _)| i);
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}
