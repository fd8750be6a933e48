//! Run lifecycle types.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Identifies a unit of work submitted to the agent-run service.
///
/// Both ids are opaque strings minted by the service; the monitor only
/// ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RunHandle {
    pub thread_id: String,
    pub run_id: String,
}

impl RunHandle {
    pub fn new(thread_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
        }
    }
}

/// Run lifecycle status as reported by the service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Completed,
    Failed,
    Cancelled,
    Expired,
}

impl RunStatus {
    /// Whether the service guarantees no further transition from here.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            Self::Queued | Self::InProgress | Self::RequiresAction
        )
    }
}

/// Kind of a pending tool call awaiting approval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Function,
    #[serde(rename = "openapi")]
    OpenApi,
    Mcp,
    #[serde(other)]
    Other,
}

/// One tool call the service will not execute until someone approves it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingToolCall {
    pub id: String,
    pub kind: ToolKind,
    pub name: String,
}

/// The set of tool calls blocking a `RequiresAction` run, in service order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequiredAction {
    pub tool_calls: Vec<PendingToolCall>,
}

/// An approve/deny verdict for a single pending tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolApprovalDecision {
    pub tool_call_id: String,
    pub approve: bool,
}

/// Error code and message attached to a failed (or force-cancelled) run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

/// One observation of a run, as returned by a status fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_action: Option<RequiredAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<ErrorDetail>,
}

impl RunSnapshot {
    /// Snapshot with just a status, no action and no error.
    pub fn status(status: RunStatus) -> Self {
        Self {
            status,
            required_action: None,
            last_error: None,
        }
    }
}
