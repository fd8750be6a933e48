//! The polling state machine, isolated from any I/O.
//!
//! `PollingSession::observe` is the whole transition table: every
//! caller of the monitor goes through it, and it is testable without a
//! network stub.

use std::time::Duration;

use tokio::time::Instant;

use crate::types::{ErrorDetail, RequiredAction, RunHandle, RunSnapshot, RunStatus};

/// Where the monitor goes after processing one observation.
#[derive(Debug)]
pub(crate) enum MonitorState {
    /// Sleep one interval, then fetch again.
    Polling,
    /// Evaluate approvals for the blocking tool calls, then poll again.
    AwaitingApproval(RequiredAction),
    /// Max wait elapsed on a live run: fire a cancel, then finish.
    Cancelling,
    /// Terminal status observed; no outgoing transitions.
    Finished {
        status: RunStatus,
        error: Option<ErrorDetail>,
    },
}

/// Working state of one monitoring call. Never persisted: a fresh
/// session is built per call, and the service stays the source of
/// truth for run status.
pub(crate) struct PollingSession {
    handle: RunHandle,
    started: Instant,
    poll_interval: Duration,
    max_wait: Duration,
    last_status: Option<RunStatus>,
}

impl PollingSession {
    pub(crate) fn new(handle: RunHandle, poll_interval: Duration, max_wait: Duration) -> Self {
        Self {
            handle,
            started: Instant::now(),
            poll_interval,
            max_wait,
            last_status: None,
        }
    }

    pub(crate) fn handle(&self) -> &RunHandle {
        &self.handle
    }

    pub(crate) fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub(crate) fn last_status(&self) -> Option<RunStatus> {
        self.last_status
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Detail attached to a timeout-forced cancellation.
    pub(crate) fn timeout_detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: Some("timeout_exceeded".to_string()),
            message: format!(
                "timeout exceeded after {:?} (max wait {:?})",
                self.elapsed(),
                self.max_wait
            ),
        }
    }

    /// Process one fetched snapshot.
    ///
    /// Terminal statuses win unconditionally, even against a pending
    /// timeout. The elapsed-time check applies only to `Queued` and
    /// `InProgress` ticks, so worst-case overrun is one poll interval.
    pub(crate) fn observe(&mut self, snapshot: RunSnapshot) -> MonitorState {
        self.last_status = Some(snapshot.status);

        if snapshot.status.is_terminal() {
            return MonitorState::Finished {
                status: snapshot.status,
                error: snapshot.last_error,
            };
        }

        if snapshot.status == RunStatus::RequiresAction {
            return MonitorState::AwaitingApproval(snapshot.required_action.unwrap_or_default());
        }

        if self.elapsed() >= self.max_wait {
            MonitorState::Cancelling
        } else {
            MonitorState::Polling
        }
    }
}
