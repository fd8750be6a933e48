//! Tests for approval resolution.

use std::sync::Arc;
use std::sync::Mutex;

use pretty_assertions::assert_eq;

use drover::monitor::{ApprovalHandler, ApprovalPolicy, DenialHandling};
use drover::types::{PendingToolCall, RequiredAction, ToolKind};

fn action(names: &[&str]) -> RequiredAction {
    RequiredAction {
        tool_calls: names
            .iter()
            .enumerate()
            .map(|(i, name)| PendingToolCall {
                id: format!("call_{}", i + 1),
                kind: ToolKind::Function,
                name: (*name).to_string(),
            })
            .collect(),
    }
}

#[tokio::test]
async fn approve_all_approves_in_service_order() {
    let decisions = ApprovalPolicy::ApproveAll
        .resolve(&action(&["a", "b", "c"]), DenialHandling::Omit)
        .await;

    let ids: Vec<_> = decisions.iter().map(|d| d.tool_call_id.as_str()).collect();
    assert_eq!(ids, vec!["call_1", "call_2", "call_3"]);
    assert!(decisions.iter().all(|d| d.approve));
}

#[tokio::test]
async fn deny_all_with_omit_yields_nothing() {
    let decisions = ApprovalPolicy::DenyAll
        .resolve(&action(&["a", "b"]), DenialHandling::Omit)
        .await;

    assert!(decisions.is_empty());
}

#[tokio::test]
async fn deny_all_with_explicit_deny_keeps_every_call() {
    let decisions = ApprovalPolicy::DenyAll
        .resolve(&action(&["a", "b"]), DenialHandling::ExplicitDeny)
        .await;

    assert_eq!(decisions.len(), 2);
    assert!(decisions.iter().all(|d| !d.approve));
}

#[tokio::test]
async fn handler_is_invoked_once_per_call() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_handler = seen.clone();
    let handler: ApprovalHandler = Arc::new(move |call: PendingToolCall| {
        let seen = seen_by_handler.clone();
        Box::pin(async move {
            seen.lock().unwrap().push(call.name.clone());
            call.name != "b"
        })
    });

    let decisions = ApprovalPolicy::Handler(handler)
        .resolve(&action(&["a", "b", "c"]), DenialHandling::Omit)
        .await;

    assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
    let ids: Vec<_> = decisions.iter().map(|d| d.tool_call_id.as_str()).collect();
    assert_eq!(ids, vec!["call_1", "call_3"]);
}
