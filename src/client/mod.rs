//! Client interfaces for the agent-run service.

pub mod http;
pub mod rest;
pub mod retry;

pub use rest::RestClient;
pub use retry::{RetryPolicy, RetryingService};

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{RunHandle, RunSnapshot, ToolApprovalDecision};

/// The three operations the run monitor consumes.
///
/// Implemented by [`RestClient`] against the hosted service, by
/// [`RetryingService`] as a decorator, and by in-memory stubs in tests.
/// Transport, auth, and wire format are implementation concerns; the
/// monitor only sees snapshots and faults.
#[async_trait]
pub trait RunService: Send + Sync {
    /// Fetch the current snapshot of a run.
    ///
    /// Fails with a service fault on transport/auth errors, or
    /// `NotFound` if the handle is unknown to the service.
    async fn fetch_run(&self, handle: &RunHandle) -> Result<RunSnapshot>;

    /// Submit approval decisions for pending tool calls.
    ///
    /// The returned snapshot may already reflect a new status.
    async fn submit_approvals(
        &self,
        handle: &RunHandle,
        decisions: &[ToolApprovalDecision],
    ) -> Result<RunSnapshot>;

    /// Request cancellation of a run. Best-effort: the service may
    /// reject this if the run is already terminal.
    async fn cancel_run(&self, handle: &RunHandle) -> Result<()>;
}

#[async_trait]
impl<S: RunService + ?Sized> RunService for std::sync::Arc<S> {
    async fn fetch_run(&self, handle: &RunHandle) -> Result<RunSnapshot> {
        (**self).fetch_run(handle).await
    }

    async fn submit_approvals(
        &self,
        handle: &RunHandle,
        decisions: &[ToolApprovalDecision],
    ) -> Result<RunSnapshot> {
        (**self).submit_approvals(handle, decisions).await
    }

    async fn cancel_run(&self, handle: &RunHandle) -> Result<()> {
        (**self).cancel_run(handle).await
    }
}
