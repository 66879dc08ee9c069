use crate::agent::AgentError;
use crate::config::Settings;
use crate::identity::acquire_service_token;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const API_VERSION: &str = "v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Completed,
    Failed,
    Cancelling,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Cancelled | Self::Expired
        )
    }

    /// Active runs block a new turn from being interleaved on the thread.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Queued | Self::InProgress | Self::RequiresAction)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolFunction {
    #[serde(default)]
    pub name: String,
    /// JSON-encoded argument object, passed through as the runtime sends it.
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(default)]
    pub function: ToolFunction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitToolOutputs {
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequiredAction {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub submit_tool_outputs: Option<SubmitToolOutputs>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Deserialize)]
struct ThreadEnvelope {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// Request/response client for the agent runtime, keyed by thread and run
/// identifiers. The runtime executes the agent; this side only creates
/// messages, drives runs, and reads replies back.
#[derive(Debug, Clone)]
pub struct AgentApiClient {
    endpoint: String,
    token: String,
}

impl AgentApiClient {
    pub fn new(endpoint: &str, token: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Acquire the service credential and bind it to the configured runtime
    /// endpoint. Setup-fatal on failure.
    pub fn connect(settings: &Settings) -> Result<Self, AgentError> {
        let token = acquire_service_token(settings)?;
        Ok(Self::new(&settings.agent_endpoint, &token.access_token))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}?api-version={API_VERSION}", self.endpoint)
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, AgentError> {
        let response = ureq::get(&self.url(path))
            .timeout(REQUEST_TIMEOUT)
            .set("Authorization", &format!("Bearer {}", self.token))
            .call()
            .map_err(map_http_error)?;
        response
            .into_json::<T>()
            .map_err(|err| AgentError::Parse(err.to_string()))
    }

    fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<T, AgentError> {
        let response = ureq::post(&self.url(path))
            .timeout(REQUEST_TIMEOUT)
            .set("Authorization", &format!("Bearer {}", self.token))
            .send_json(body)
            .map_err(map_http_error)?;
        response
            .into_json::<T>()
            .map_err(|err| AgentError::Parse(err.to_string()))
    }

    pub fn open_thread(&self) -> Result<String, AgentError> {
        let thread: ThreadEnvelope = self.post_json("threads", json!({}))?;
        Ok(thread.id)
    }

    pub fn create_message(&self, thread_id: &str, role: &str, text: &str) -> Result<(), AgentError> {
        let _: Value = self.post_json(
            &format!("threads/{thread_id}/messages"),
            json!({ "role": role, "content": text }),
        )?;
        Ok(())
    }

    pub fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run, AgentError> {
        self.post_json(
            &format!("threads/{thread_id}/runs"),
            json!({ "assistant_id": agent_id }),
        )
    }

    pub fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AgentError> {
        self.get_json(&format!("threads/{thread_id}/runs/{run_id}"))
    }

    pub fn list_runs(&self, thread_id: &str) -> Result<Vec<Run>, AgentError> {
        let envelope: ListEnvelope<Run> = self.get_json(&format!("threads/{thread_id}/runs"))?;
        Ok(envelope.data)
    }

    /// Messages come back most-recent-first.
    pub fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AgentError> {
        let envelope: ListEnvelope<ThreadMessage> =
            self.get_json(&format!("threads/{thread_id}/messages"))?;
        Ok(envelope.data)
    }

    pub fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, AgentError> {
        self.post_json(
            &format!("threads/{thread_id}/runs/{run_id}/submit_tool_outputs"),
            json!({ "tool_outputs": outputs }),
        )
    }
}

fn map_http_error(err: ureq::Error) -> AgentError {
    match err {
        ureq::Error::Status(status, response) => AgentError::Http {
            status,
            body: response.into_string().unwrap_or_default(),
        },
        other => AgentError::Request(other.to_string()),
    }
}
