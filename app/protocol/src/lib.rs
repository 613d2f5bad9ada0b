//! Agentgate wire types shared between the gateway and its clients.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod codec;

/// Body of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session token to present as `Bearer <token>`.
    pub token: CompactString,
    /// Expiry as unix seconds.
    pub expires_at: u64,
}

/// Outcome of `POST /logout`, also the shape of every error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    /// Human-readable message.
    pub detail: String,
}

impl Detail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// One conversation history entry as sent by clients.
///
/// Unknown extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Author role, usually `system`, `user`, `assistant` or `tool`. Other
    /// names are passed to the executor as sent.
    pub role: CompactString,
    /// Message text.
    pub content: String,
}

/// Body of `POST /v1/invoke` and `POST /v1/invoke/stream`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub input: String,
    #[serde(default)]
    pub chat_history: Vec<HistoryEntry>,
    /// Optional allow-list of tool names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<CompactString>>,
}

/// Execution metadata attached to an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeMetadata {
    /// Wall-clock executor time in milliseconds.
    pub duration_ms: u64,
}

/// Successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub output: String,
    pub used_tools: Vec<CompactString>,
    pub metadata: InvokeMetadata,
}

/// Catalogue entry of `GET /v1/tools`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: CompactString,
    pub description: CompactString,
}

/// Body of `GET /v1/tools`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolSummary>,
}

/// Body of `POST /v1/tools/{name}/run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRunRequest {
    /// Arbitrary JSON input handed to the tool. Required, though it may be
    /// `null`.
    pub input: Value,
}

/// Result of a direct tool run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRunResponse {
    pub tool_name: CompactString,
    pub result: Value,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: CompactString,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

/// Payload of one event-stream frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamFrame {
    /// Output fragment.
    pub output: String,
}
