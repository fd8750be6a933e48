//! Shared test helpers: a scripted in-memory run service.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use drover::client::RunService;
use drover::error::Result;
use drover::types::{RunHandle, RunSnapshot, RunStatus, ToolApprovalDecision};

/// Pops one canned fetch result per poll and records every request the
/// monitor issues. An exhausted script panics the test: a fetch after
/// the last scripted response is a fetch the monitor should not have
/// made.
#[derive(Default)]
pub struct ScriptedService {
    fetch_script: Mutex<VecDeque<Result<RunSnapshot>>>,
    submit_response: Mutex<Option<RunSnapshot>>,
    fetch_count: AtomicUsize,
    cancel_count: AtomicUsize,
    submissions: Mutex<Vec<Vec<ToolApprovalDecision>>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, status: RunStatus) {
        self.push(Ok(RunSnapshot::status(status)));
    }

    pub fn push(&self, result: Result<RunSnapshot>) {
        self.fetch_script.lock().unwrap().push_back(result);
    }

    /// Snapshot returned from every approval submission (defaults to
    /// `InProgress`).
    pub fn respond_to_submit_with(&self, snapshot: RunSnapshot) {
        *self.submit_response.lock().unwrap() = Some(snapshot);
    }

    pub fn fetches(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> usize {
        self.cancel_count.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<Vec<ToolApprovalDecision>> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl RunService for ScriptedService {
    async fn fetch_run(&self, _handle: &RunHandle) -> Result<RunSnapshot> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.fetch_script
            .lock()
            .unwrap()
            .pop_front()
            .expect("fetch_run called after the scripted responses ran out")
    }

    async fn submit_approvals(
        &self,
        _handle: &RunHandle,
        decisions: &[ToolApprovalDecision],
    ) -> Result<RunSnapshot> {
        self.submissions.lock().unwrap().push(decisions.to_vec());
        Ok(self
            .submit_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| RunSnapshot::status(RunStatus::InProgress)))
    }

    async fn cancel_run(&self, _handle: &RunHandle) -> Result<()> {
        self.cancel_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
