//! Invocation payload and result types.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The role of a conversation message author.
///
/// Roles outside the well-known set are kept verbatim in [`Role::Other`],
/// so history reaches the executor exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CompactString", into = "CompactString")]
pub enum Role {
    /// System instructions.
    System,
    /// End user.
    User,
    /// Assistant reply.
    Assistant,
    /// Tool output.
    Tool,
    /// Any other role name.
    Other(CompactString),
}

impl Role {
    /// The wire name of this role.
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        match name {
            "system" => Self::System,
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "tool" => Self::Tool,
            other => Self::Other(other.into()),
        }
    }
}

impl From<CompactString> for Role {
    fn from(name: CompactString) -> Self {
        match Self::from(name.as_str()) {
            Self::Other(_) => Self::Other(name),
            known => known,
        }
    }
}

impl From<Role> for CompactString {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(name) => name,
            known => known.as_str().into(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a message with the given role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Normalized request handed to an executor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Primary input text.
    pub input: String,
    /// Conversation history, oldest first.
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
    /// Optional allow-list of tool names the executor may use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<CompactString>>,
}

impl Payload {
    /// Create a payload with an empty history and no tool restriction.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Set the conversation history.
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.chat_history = history;
        self
    }

    /// Restrict the tools the executor may use.
    pub fn with_tools(mut self, tools: Vec<CompactString>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Whether the named tool is permitted for this payload.
    pub fn allows(&self, tool: &str) -> bool {
        self.tools
            .as_ref()
            .is_none_or(|names| names.iter().any(|n| n == tool))
    }
}

/// Output of a single executor call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Generated output text.
    pub output: String,
    /// Names of tools used while producing the output.
    #[serde(default)]
    pub used_tools: Vec<CompactString>,
}

impl Invocation {
    /// An invocation that used no tools.
    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            used_tools: Vec::new(),
        }
    }
}
