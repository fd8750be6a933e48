//! End-to-end demo: thread → message → run → watch to completion.

use std::time::Duration;

use drover::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let client = RestClient::from_env()?;

    let thread = client.create_thread().await?;
    client
        .add_message(
            &thread.id,
            MessageRole::User,
            "Summarize today's weather in Oslo.",
        )
        .await?;

    let agent_id = std::env::var("DROVER_AGENT_ID")?;
    let handle = client.create_run(&thread.id, &agent_id).await?;
    println!("run {} started on thread {}", handle.run_id, handle.thread_id);

    let monitor = RunMonitor::new(client);
    let policy = WatchPolicy::new(Duration::from_secs(1), Duration::from_secs(120));
    let outcome = monitor.watch(&handle, &policy).await?;
    println!("final status: {}", outcome.status);
    if let Some(detail) = &outcome.error {
        println!("error: {}", detail.message);
    }

    let client = monitor.into_inner();
    for message in client.list_messages(&handle.thread_id).await? {
        println!("[{:?}] {}", message.role, message.text);
    }

    Ok(())
}
