//! Convenience re-exports for common use.

pub use crate::client::{RestClient, RetryPolicy, RetryingService, RunService};
pub use crate::config::DroverConfig;
pub use crate::error::{DroverError, Result};
pub use crate::monitor::{
    ApprovalHandler, ApprovalPolicy, DenialHandling, MonitorError, RunMonitor, RunOutcome,
    WatchPolicy,
};
pub use crate::types::{
    Agent, ErrorDetail, MessageRole, NewAgent, PendingToolCall, RequiredAction, RunHandle,
    RunSnapshot, RunStatus, Thread, ThreadMessage, ToolApprovalDecision, ToolKind,
};
