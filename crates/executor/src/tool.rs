//! Tool catalogue exposed by executors.

use anyhow::Result;
use compact_str::CompactString;
use serde_json::Value;
use std::sync::Arc;

/// A named callable an executor can use and the gateway can run directly.
///
/// Calls may block; the bridge runs them on a worker thread.
pub trait Tool: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Run the tool on the given input.
    fn call(&self, input: Value) -> Result<Value>;
}

/// A type-erased tool function.
pub type ToolFn = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// A tool backed by a plain function.
#[derive(Clone)]
pub struct FnTool {
    name: CompactString,
    description: CompactString,
    func: ToolFn,
}

impl FnTool {
    /// Create a tool from a name, description, and function.
    pub fn new<F>(
        name: impl Into<CompactString>,
        description: impl Into<CompactString>,
        func: F,
    ) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            func: Arc::new(func),
        }
    }
}

impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn call(&self, input: Value) -> Result<Value> {
        (self.func)(input)
    }
}

/// Echoes its input back with an `echo: ` prefix.
pub struct EchoTool;

impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes input text with a prefix"
    }

    fn call(&self, input: Value) -> Result<Value> {
        Ok(Value::String(format!("echo: {}", value_text(&input))))
    }
}

/// Render a JSON value as plain text: strings verbatim, anything else as JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Ordered tool catalogue.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalogue: just the echo tool.
    pub fn builtin() -> Self {
        Self::new().with(EchoTool)
    }

    /// Append a tool, replacing any existing tool of the same name in place.
    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.insert(Arc::new(tool));
        self
    }

    /// Insert a shared tool, replacing any existing tool of the same name.
    pub fn insert(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Iterate tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
