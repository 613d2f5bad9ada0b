//! The executor contract.

use crate::{Invocation, Payload, ToolSet};
use anyhow::Result;
use futures_core::Stream;
use std::pin::Pin;

/// Incremental output fragments, in generation order.
pub type Fragments<'a> = Pin<Box<dyn Stream<Item = Result<String>> + Send + 'a>>;

/// An opaque component mapping a payload to output text.
///
/// [`invoke`](Self::invoke) and tool calls may block the calling thread for
/// an unbounded time. Callers on an async runtime go through
/// [`Bridge`](crate::Bridge).
pub trait Executor: Send + Sync + 'static {
    /// Produce the full output for a payload.
    fn invoke(&self, payload: &Payload) -> Result<Invocation>;

    /// Whether [`stream_invoke`](Self::stream_invoke) yields native
    /// incremental output. Executors without it are streamed by chunking
    /// the output of [`invoke`](Self::invoke).
    fn supports_streaming(&self) -> bool {
        false
    }

    /// Produce output incrementally.
    ///
    /// Called on the async runtime and must not block; the work happens as
    /// the stream is polled. Dropping the stream must stop generation.
    fn stream_invoke(&self, payload: &Payload) -> Result<Fragments<'_>> {
        let _ = payload;
        anyhow::bail!("executor does not support streaming")
    }

    /// The tools this executor exposes.
    fn tools(&self) -> &ToolSet;
}
