//! REST binding to the hosted agent-run service.
//!
//! Wire shapes follow the assistants-style API: snake_case JSON,
//! `data`-wrapped lists, unix-second timestamps. DTOs stay private to
//! this module; everything public speaks the domain types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::DroverConfig;
use crate::error::Result;
use crate::types::{
    Agent, ErrorDetail, MessageRole, NewAgent, PendingToolCall, RequiredAction, RunHandle,
    RunSnapshot, RunStatus, Thread, ThreadMessage, ToolApprovalDecision, ToolKind,
};

use super::http::{bearer_headers, shared_client, status_to_error};
use super::RunService;

/// Client for the agent-run REST API.
///
/// Cheap to clone is not a goal here; construct once and share behind
/// an `Arc` (the underlying reqwest client is already shared
/// process-wide).
pub struct RestClient {
    base_url: String,
    api_key: String,
    api_version: Option<String>,
}

impl RestClient {
    /// Build a client from explicit configuration.
    pub fn new(config: &DroverConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.endpoint()?.trim_end_matches('/').to_string(),
            api_key: config.api_key()?.to_string(),
            api_version: config.api_version().map(str::to_string),
        })
    }

    /// Build a client from `DROVER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&DroverConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        match &self.api_version {
            Some(version) => format!("{}{}?api-version={}", self.base_url, path, version),
            None => format!("{}{}", self.base_url, path),
        }
    }

    async fn get(&self, path: &str) -> Result<String> {
        let response = shared_client()
            .get(self.url(path))
            .headers(bearer_headers(&self.api_key))
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn post(&self, path: &str, body: Option<&serde_json::Value>) -> Result<String> {
        let mut request = shared_client()
            .post(self.url(path))
            .headers(bearer_headers(&self.api_key));
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::read_body(request.send().await?).await
    }

    async fn delete(&self, path: &str) -> Result<String> {
        let response = shared_client()
            .delete(self.url(path))
            .headers(bearer_headers(&self.api_key))
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_to_error(status.as_u16(), &body));
        }
        Ok(body)
    }

    /// Register a new agent on the service.
    pub async fn create_agent(&self, definition: &NewAgent) -> Result<Agent> {
        let body = serde_json::to_value(definition)?;
        let raw = self.post("/assistants", Some(&body)).await?;
        let agent: AgentObject = serde_json::from_str(&raw)?;
        debug!(agent_id = %agent.id, "agent created");
        Ok(agent.into_agent())
    }

    /// Delete an agent.
    pub async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        self.delete(&format!("/assistants/{agent_id}")).await?;
        Ok(())
    }

    /// Create an empty conversation thread.
    pub async fn create_thread(&self) -> Result<Thread> {
        let raw = self.post("/threads", None).await?;
        let thread: ThreadObject = serde_json::from_str(&raw)?;
        debug!(thread_id = %thread.id, "thread created");
        Ok(Thread {
            id: thread.id,
            created_at: from_unix(thread.created_at),
        })
    }

    /// Append a text message to a thread.
    pub async fn add_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<ThreadMessage> {
        let body = serde_json::json!({ "role": role, "content": text });
        let raw = self
            .post(&format!("/threads/{thread_id}/messages"), Some(&body))
            .await?;
        let message: MessageObject = serde_json::from_str(&raw)?;
        Ok(message.into_message())
    }

    /// List a thread's messages, newest first (service order).
    pub async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let raw = self.get(&format!("/threads/{thread_id}/messages")).await?;
        let list: ListObject<MessageObject> = serde_json::from_str(&raw)?;
        Ok(list.data.into_iter().map(MessageObject::into_message).collect())
    }

    /// Start a run of `agent_id` over a thread, returning the handle
    /// the monitor consumes. The initial snapshot is discarded; the
    /// service is the source of truth on the next fetch.
    pub async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<RunHandle> {
        let body = serde_json::json!({
            "assistant_id": agent_id,
            "metadata": { "client_request_id": Uuid::new_v4().to_string() },
        });
        let raw = self
            .post(&format!("/threads/{thread_id}/runs"), Some(&body))
            .await?;
        let run: RunObject = serde_json::from_str(&raw)?;
        debug!(thread_id, run_id = %run.id, "run created");
        Ok(RunHandle::new(thread_id, run.id))
    }
}

#[async_trait]
impl RunService for RestClient {
    async fn fetch_run(&self, handle: &RunHandle) -> Result<RunSnapshot> {
        let raw = self
            .get(&format!(
                "/threads/{}/runs/{}",
                handle.thread_id, handle.run_id
            ))
            .await?;
        let run: RunObject = serde_json::from_str(&raw)?;
        Ok(run.into_snapshot())
    }

    async fn submit_approvals(
        &self,
        handle: &RunHandle,
        decisions: &[ToolApprovalDecision],
    ) -> Result<RunSnapshot> {
        let body = serde_json::json!({ "tool_approvals": decisions });
        let raw = self
            .post(
                &format!(
                    "/threads/{}/runs/{}/submit_tool_approvals",
                    handle.thread_id, handle.run_id
                ),
                Some(&body),
            )
            .await?;
        let run: RunObject = serde_json::from_str(&raw)?;
        Ok(run.into_snapshot())
    }

    async fn cancel_run(&self, handle: &RunHandle) -> Result<()> {
        self.post(
            &format!(
                "/threads/{}/runs/{}/cancel",
                handle.thread_id, handle.run_id
            ),
            None,
        )
        .await?;
        Ok(())
    }
}

fn from_unix(seconds: Option<i64>) -> Option<DateTime<Utc>> {
    seconds.and_then(|s| DateTime::from_timestamp(s, 0))
}

// -- Wire DTOs --

#[derive(Deserialize)]
struct RunObject {
    id: String,
    status: RunStatus,
    #[serde(default)]
    required_action: Option<RequiredActionObject>,
    #[serde(default)]
    last_error: Option<ErrorDetail>,
}

impl RunObject {
    fn into_snapshot(self) -> RunSnapshot {
        RunSnapshot {
            status: self.status,
            required_action: self.required_action.map(RequiredActionObject::into_action),
            last_error: self.last_error,
        }
    }
}

#[derive(Deserialize)]
struct RequiredActionObject {
    #[serde(default)]
    submit_tool_approval: Option<ToolApprovalBlock>,
}

impl RequiredActionObject {
    fn into_action(self) -> RequiredAction {
        RequiredAction {
            tool_calls: self
                .submit_tool_approval
                .map(|block| {
                    block
                        .tool_calls
                        .into_iter()
                        .map(ToolCallObject::into_pending)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct ToolApprovalBlock {
    #[serde(default)]
    tool_calls: Vec<ToolCallObject>,
}

#[derive(Deserialize)]
struct ToolCallObject {
    id: String,
    #[serde(rename = "type")]
    kind: ToolKind,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    function: Option<FunctionRef>,
}

impl ToolCallObject {
    fn into_pending(self) -> PendingToolCall {
        // Function calls carry the name one level down; other kinds
        // put it at the top.
        let name = self
            .function
            .map(|f| f.name)
            .or(self.name)
            .unwrap_or_default();
        PendingToolCall {
            id: self.id,
            kind: self.kind,
            name,
        }
    }
}

#[derive(Deserialize)]
struct FunctionRef {
    name: String,
}

#[derive(Deserialize)]
struct ThreadObject {
    id: String,
    #[serde(default)]
    created_at: Option<i64>,
}

#[derive(Deserialize)]
struct AgentObject {
    id: String,
    name: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    instructions: Option<String>,
}

impl AgentObject {
    fn into_agent(self) -> Agent {
        Agent {
            id: self.id,
            name: self.name,
            model: self.model,
            instructions: self.instructions,
        }
    }
}

#[derive(Deserialize)]
struct MessageObject {
    id: String,
    role: MessageRole,
    #[serde(default)]
    content: Vec<ContentItem>,
    #[serde(default)]
    created_at: Option<i64>,
}

impl MessageObject {
    fn into_message(self) -> ThreadMessage {
        let text = self
            .content
            .into_iter()
            .filter_map(|item| item.text.map(|t| t.value))
            .collect::<Vec<_>>()
            .join("\n");
        ThreadMessage {
            id: self.id,
            role: self.role,
            text,
            created_at: from_unix(self.created_at),
        }
    }
}

#[derive(Deserialize)]
struct ContentItem {
    #[serde(default)]
    text: Option<TextBlock>,
}

#[derive(Deserialize)]
struct TextBlock {
    value: String,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListObject<T> {
    #[serde(default)]
    data: Vec<T>,
}
