//! Run monitor: drives a submitted run to a terminal status.
//!
//! One invocation owns one run. It fetches status, sleeps between
//! polls, relays tool-approval decisions, and force-cancels the run if
//! it outlives the configured max wait. Faults from the service abort
//! the loop immediately; retry, if wanted, belongs to the transport
//! layer ([`crate::client::RetryingService`]), not here.

pub mod approvals;
mod machine;

pub use approvals::{ApprovalHandler, ApprovalPolicy, DenialHandling};

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::RunService;
use crate::error::DroverError;
use crate::types::{ErrorDetail, RunHandle, RunStatus};

use machine::{MonitorState, PollingSession};

/// Errors that mean the monitor could not do its job.
///
/// A run that fails or gets timeout-cancelled is NOT an error here;
/// those are expected outcomes, returned as a [`RunOutcome`] so callers
/// can handle domain failures separately from infrastructure faults.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A fetch or approval submission faulted. Propagated immediately,
    /// never retried.
    #[error("service fault: {0}")]
    Service(#[from] DroverError),

    /// The watch policy is unsatisfiable; no request was issued.
    #[error("policy violation: {0}")]
    Policy(String),

    /// The caller's cancellation token fired. Polling stops at the
    /// next suspension point; the remote run is left untouched.
    #[error("monitoring interrupted before completion")]
    Interrupted,
}

/// Terminal result of a watch: the final status plus error detail when
/// the run failed or the monitor forced a cancellation.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub error: Option<ErrorDetail>,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    fn new(status: RunStatus, error: Option<ErrorDetail>) -> Self {
        Self {
            status,
            error,
            finished_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/// Policy for one watch call.
#[derive(Clone)]
pub struct WatchPolicy {
    pub poll_interval: Duration,
    pub max_wait: Duration,
    pub approvals: ApprovalPolicy,
    pub denials: DenialHandling,
    pub cancellation: Option<CancellationToken>,
}

impl WatchPolicy {
    /// Policy with the given cadence, approving everything and
    /// omitting denials from submissions.
    pub fn new(poll_interval: Duration, max_wait: Duration) -> Self {
        Self {
            poll_interval,
            max_wait,
            approvals: ApprovalPolicy::ApproveAll,
            denials: DenialHandling::default(),
            cancellation: None,
        }
    }

    pub fn with_approvals(mut self, approvals: ApprovalPolicy) -> Self {
        self.approvals = approvals;
        self
    }

    pub fn with_denials(mut self, denials: DenialHandling) -> Self {
        self.denials = denials;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn validate(&self) -> Result<(), MonitorError> {
        if self.poll_interval.is_zero() {
            return Err(MonitorError::Policy(
                "poll_interval must be greater than zero".to_string(),
            ));
        }
        if self.max_wait < self.poll_interval {
            return Err(MonitorError::Policy(format!(
                "max_wait {:?} is shorter than poll_interval {:?}",
                self.max_wait, self.poll_interval
            )));
        }
        Ok(())
    }
}

/// Drives runs on a [`RunService`] to completion.
pub struct RunMonitor<S> {
    service: S,
}

impl<S: RunService> RunMonitor<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Unwrap the underlying service.
    pub fn into_inner(self) -> S {
        self.service
    }

    /// Watch `handle` until it reaches a terminal status.
    ///
    /// The first fetch happens immediately (no sleep, no assumed
    /// `Queued`); every later fetch follows one poll-interval sleep.
    /// Requests are strictly sequential. Dropping the returned future
    /// abandons polling without touching the remote run.
    pub async fn watch(
        &self,
        handle: &RunHandle,
        policy: &WatchPolicy,
    ) -> Result<RunOutcome, MonitorError> {
        policy.validate()?;

        let mut session =
            PollingSession::new(handle.clone(), policy.poll_interval, policy.max_wait);
        let mut first_poll = true;

        loop {
            if !first_poll {
                self.pause(&session, policy).await?;
            }
            first_poll = false;

            let snapshot = self.service.fetch_run(session.handle()).await?;
            debug!(
                run_id = %session.handle().run_id,
                status = %snapshot.status,
                elapsed = ?session.elapsed(),
                "run polled"
            );

            match session.observe(snapshot) {
                MonitorState::Polling => {}
                MonitorState::AwaitingApproval(action) => {
                    let decisions = policy.approvals.resolve(&action, policy.denials).await;
                    if decisions.is_empty() {
                        debug!(
                            run_id = %session.handle().run_id,
                            pending = action.tool_calls.len(),
                            "no approvals to submit"
                        );
                        continue;
                    }
                    let after = self
                        .service
                        .submit_approvals(session.handle(), &decisions)
                        .await?;
                    debug!(
                        run_id = %session.handle().run_id,
                        submitted = decisions.len(),
                        status = %after.status,
                        "approvals submitted"
                    );
                    // Back to polling regardless of the returned
                    // snapshot; the next fetch re-reads the truth.
                }
                MonitorState::Cancelling => {
                    // Fire-and-forget: a cancel racing a terminal
                    // transition is expected to fault on the remote
                    // side, and that fault is not ours to surface.
                    if let Err(err) = self.service.cancel_run(session.handle()).await {
                        warn!(
                            run_id = %session.handle().run_id,
                            error = %err,
                            "cancel request failed after timeout"
                        );
                    }
                    return Ok(RunOutcome::new(
                        RunStatus::Cancelled,
                        Some(session.timeout_detail()),
                    ));
                }
                MonitorState::Finished { status, error } => {
                    return Ok(RunOutcome::new(status, error));
                }
            }
        }
    }

    /// Sleep one poll interval, honoring caller cancellation.
    async fn pause(
        &self,
        session: &PollingSession,
        policy: &WatchPolicy,
    ) -> Result<(), MonitorError> {
        match &policy.cancellation {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!(
                            run_id = %session.handle().run_id,
                            last_status = ?session.last_status(),
                            "watch interrupted by caller"
                        );
                        Err(MonitorError::Interrupted)
                    }
                    _ = tokio::time::sleep(session.poll_interval()) => Ok(()),
                }
            }
            None => {
                tokio::time::sleep(session.poll_interval()).await;
                Ok(())
            }
        }
    }
}
