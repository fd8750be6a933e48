//! Approval demo: custom handler plus explicit denial entries.

use std::sync::Arc;
use std::time::Duration;

use drover::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let client = RestClient::from_env()?;
    let handle = RunHandle::new(
        std::env::var("DROVER_THREAD_ID")?,
        std::env::var("DROVER_RUN_ID")?,
    );

    // Approve read-only tools, deny the rest.
    let handler: ApprovalHandler = Arc::new(|call: PendingToolCall| {
        Box::pin(async move {
            let approve = call.name.starts_with("get_") || call.name.starts_with("list_");
            println!(
                "{} {} ({:?})",
                if approve { "approving" } else { "denying" },
                call.name,
                call.kind
            );
            approve
        })
    });

    let monitor = RunMonitor::new(client);
    let policy = WatchPolicy::new(Duration::from_millis(500), Duration::from_secs(60))
        .with_approvals(ApprovalPolicy::Handler(handler))
        .with_denials(DenialHandling::ExplicitDeny);

    let outcome = monitor.watch(&handle, &policy).await?;
    println!("final status: {}", outcome.status);

    Ok(())
}
