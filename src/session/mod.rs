pub mod context;
pub mod flow;
pub mod handler;
pub mod oauth_cache;
pub mod pending;

pub use context::{AgentBinding, Role, SessionContext, Turn};
pub use flow::{
    begin_login, complete_login, handle_user_message, new_thread, start_conversation, LoginStart,
    TurnAction,
};
pub use handler::SubmissionHandler;
pub use oauth_cache::{
    parse_require_signature, store_oauth_session, take_oauth_session, OAUTH_SESSION_TTL_SECS,
};
pub use pending::{process_pending, SIGNATURE_DELAYED_MESSAGE, SIGNATURE_SUCCESS_MESSAGE};

use crate::agent::AgentError;
use crate::tenant::TenantError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("tenant resolution failed: {0}")]
    Tenant(#[from] TenantError),
    #[error("agent session failed: {0}")]
    Agent(#[from] AgentError),
    #[error("session is not connected to an agent")]
    NotConnected,
    #[error("session state io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session state parse error at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to generate session token: {0}")]
    Token(String),
}
