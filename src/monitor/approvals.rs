//! Approval policy for pending tool calls.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::types::{PendingToolCall, RequiredAction, ToolApprovalDecision};

/// Async approval callback, invoked once per pending tool call.
pub type ApprovalHandler =
    Arc<dyn Fn(PendingToolCall) -> BoxFuture<'static, bool> + Send + Sync>;

/// How the monitor answers the service's approval requests.
#[derive(Clone)]
pub enum ApprovalPolicy {
    /// Approve every pending call.
    ApproveAll,
    /// Deny every pending call.
    DenyAll,
    /// Defer to a caller-supplied handler.
    Handler(ApprovalHandler),
}

impl fmt::Debug for ApprovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApproveAll => f.write_str("ApprovalPolicy::ApproveAll"),
            Self::DenyAll => f.write_str("ApprovalPolicy::DenyAll"),
            Self::Handler(_) => f.write_str("ApprovalPolicy::Handler(..)"),
        }
    }
}

/// What the submission says about denied calls.
///
/// The remote contract differs between deployments: some expect denied
/// calls to simply be absent, some expect an explicit negative entry.
/// Both live behind this switch so callers match their service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenialHandling {
    /// Denied calls are left out of the submission.
    #[default]
    Omit,
    /// Denied calls are submitted with `approve: false`.
    ExplicitDeny,
}

impl ApprovalPolicy {
    /// Decide a single pending call.
    pub async fn decide(&self, call: &PendingToolCall) -> bool {
        match self {
            Self::ApproveAll => true,
            Self::DenyAll => false,
            Self::Handler(handler) => handler(call.clone()).await,
        }
    }

    /// Build the decision list for one `RequiresAction` observation.
    ///
    /// Built fresh each time, preserving the service's tool-call order;
    /// no deduplication across observations.
    pub async fn resolve(
        &self,
        action: &RequiredAction,
        denials: DenialHandling,
    ) -> Vec<ToolApprovalDecision> {
        let mut decisions = Vec::new();
        for call in &action.tool_calls {
            let approve = self.decide(call).await;
            if approve || denials == DenialHandling::ExplicitDeny {
                decisions.push(ToolApprovalDecision {
                    tool_call_id: call.id.clone(),
                    approve,
                });
            }
        }
        decisions
    }
}
