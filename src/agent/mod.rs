pub mod api;
pub mod context;
pub mod registry;
pub mod turn;

pub use api::{
    AgentApiClient, RequiredAction, Run, RunError, RunStatus, SubmitToolOutputs, ThreadMessage,
    ToolCall, ToolFunction, ToolOutput,
};
pub use context::{initial_context_message, no_signature_directive, signature_forward_message};
pub use registry::{FunctionCall, FunctionHandler, FunctionId, FunctionRegistry};
pub use turn::{
    extract_reply_text, send_turn, send_turn_bounded, wait_for_idle, IDLE_WAIT_TIMEOUT_SECS,
    RUN_POLL_TIMEOUT_SECS,
};

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("agent api request failed: {0}")]
    Request(String),
    #[error("agent api returned http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("agent api response is not valid json: {0}")]
    Parse(String),
    #[error("agent run did not reach a terminal state within {timeout_seconds}s")]
    RunTimeout { timeout_seconds: u64 },
    #[error("unknown function `{name}` requested by the agent")]
    UnknownFunction { name: String },
    #[error("agent service authentication failed: {0}")]
    Auth(#[from] crate::identity::TokenError),
}
