//! Executor backend enum for static dispatch over the built-in executors.
//!
//! The gateway picks one variant from configuration at startup and never
//! switches afterwards.

use crate::{CommandExecutor, Executor, FallbackExecutor, Fragments, Invocation, Payload, ToolSet};
use anyhow::Result;

/// Executor selected from gateway configuration.
pub enum Backend {
    /// In-process tool-driven executor.
    Fallback(FallbackExecutor),
    /// External command, one process per invocation.
    Command(CommandExecutor),
}

impl Backend {
    /// Short name of the active variant, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fallback(_) => "fallback",
            Self::Command(_) => "command",
        }
    }
}

impl Executor for Backend {
    fn invoke(&self, payload: &Payload) -> Result<Invocation> {
        match self {
            Self::Fallback(e) => e.invoke(payload),
            Self::Command(e) => e.invoke(payload),
        }
    }

    fn supports_streaming(&self) -> bool {
        match self {
            Self::Fallback(e) => e.supports_streaming(),
            Self::Command(e) => e.supports_streaming(),
        }
    }

    fn stream_invoke(&self, payload: &Payload) -> Result<Fragments<'_>> {
        match self {
            Self::Fallback(e) => e.stream_invoke(payload),
            Self::Command(e) => e.stream_invoke(payload),
        }
    }

    fn tools(&self) -> &ToolSet {
        match self {
            Self::Fallback(e) => e.tools(),
            Self::Command(e) => e.tools(),
        }
    }
}
