//! Drover, a client SDK for hosted agent runs.
//!
//! Provides a REST client for a hosted conversational-agent service
//! (threads, messages, runs) and a run monitor that drives a submitted
//! run to a terminal status: polling, tool-approval relay, and
//! timeout-triggered cancellation.
//!
//! # Quick Start
//!
//! ```no_run
//! use drover::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let client = RestClient::from_env()?;
//! let thread = client.create_thread().await?;
//! client.add_message(&thread.id, MessageRole::User, "Hello!").await?;
//! let handle = client.create_run(&thread.id, "agent_abc123").await?;
//!
//! let monitor = RunMonitor::new(client);
//! let policy = WatchPolicy::new(Duration::from_secs(1), Duration::from_secs(300));
//! let outcome = monitor.watch(&handle, &policy).await?;
//! println!("run finished: {}", outcome.status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod monitor;
pub mod prelude;
pub mod types;
