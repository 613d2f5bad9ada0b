//! Executor contracts and the bridge that serves them asynchronously.
//!
//! An [`Executor`] maps a [`Payload`] to output text and may block for an
//! unbounded time doing so. The [`Bridge`] moves that work onto a bounded
//! pool of blocking workers, either as a one-shot call or as an ordered
//! stream of [`StreamEvent`]s. [`Backend`] is the concrete executor the
//! gateway selects at startup.

pub use {
    backend::Backend,
    bridge::{
        Bridge, BridgeError, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_WORKERS, InvocationResult,
        StreamEvent, chunk_text,
    },
    command::CommandExecutor,
    executor::{Executor, Fragments},
    fallback::FallbackExecutor,
    payload::{ChatMessage, Invocation, Payload, Role},
    shared::SharedExecutor,
    tool::{EchoTool, FnTool, Tool, ToolSet, value_text},
};

mod backend;
mod bridge;
mod command;
mod executor;
mod fallback;
mod payload;
mod shared;
mod tool;
