//! Built-in executor that answers by running its first permitted tool.

use crate::{Executor, Invocation, Payload, ToolSet, value_text};
use anyhow::Result;
use serde_json::Value;

/// Minimal executor used when no external executor is configured.
///
/// Calls the first catalogue tool the payload permits with the input text.
/// When no tool is permitted, the tool fails, or it returns nothing, the
/// output acknowledges the input instead.
pub struct FallbackExecutor {
    tools: ToolSet,
}

impl FallbackExecutor {
    /// Create with the given tool catalogue.
    pub fn new(tools: ToolSet) -> Self {
        Self { tools }
    }
}

impl std::fmt::Debug for FallbackExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackExecutor").finish_non_exhaustive()
    }
}

impl Default for FallbackExecutor {
    fn default() -> Self {
        Self::new(ToolSet::builtin())
    }
}

impl Executor for FallbackExecutor {
    fn invoke(&self, payload: &Payload) -> Result<Invocation> {
        if let Some(tool) = self.tools.iter().find(|t| payload.allows(t.name())) {
            match tool.call(Value::String(payload.input.clone())) {
                Ok(result) => {
                    let output = value_text(&result);
                    if !output.is_empty() && !result.is_null() {
                        return Ok(Invocation {
                            output,
                            used_tools: vec![tool.name().into()],
                        });
                    }
                }
                Err(e) => tracing::warn!("fallback tool '{}' failed: {e}", tool.name()),
            }
        }

        Ok(Invocation::text(format!(
            "fallback: received {}",
            quoted(&payload.input)
        )))
    }

    fn tools(&self) -> &ToolSet {
        &self.tools
    }
}

/// Quote text for display. Single quotes are used unless the text holds a
/// single quote and no double quote; backslashes and control whitespace
/// are escaped.
fn quoted(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
