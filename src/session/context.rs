use crate::identity::UserContext;
use crate::signature::{AcceptError, SignatureArtifact, SignatureCanvas};
use serde::{Deserialize, Serialize};

pub const SIGNATURE_PROVIDED_TURN: &str = "I have provided my digital signature.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// The active agent assignment plus its server-side thread. Replaced
/// wholesale when the user starts a new conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentBinding {
    pub agent_id: String,
    pub agent_type: String,
    pub org_name: String,
    pub thread_id: String,
}

/// All per-login state, created at login and torn down at sign-out. Every
/// operation receives this explicitly; there is no ambient session state.
#[derive(Debug)]
pub struct SessionContext {
    pub user: UserContext,
    pub require_signature: bool,
    pub binding: Option<AgentBinding>,
    pub conversation: Vec<Turn>,
    pub signature: Option<SignatureArtifact>,
    pub canvas: SignatureCanvas,
    /// Set when an accepted signature still needs forwarding to the agent;
    /// processed on the next refresh cycle so the accept itself stays fast.
    pub signature_pending_send: bool,
}

impl SessionContext {
    pub fn new(user: UserContext, require_signature: bool) -> Self {
        Self {
            user,
            require_signature,
            binding: None,
            conversation: Vec::new(),
            signature: None,
            canvas: SignatureCanvas::default(),
            signature_pending_send: false,
        }
    }

    pub fn append_turn(&mut self, role: Role, text: &str) {
        self.conversation.push(Turn {
            role,
            text: text.to_string(),
        });
    }

    pub fn last_assistant_text(&self) -> Option<&str> {
        self.conversation
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant)
            .map(|turn| turn.text.as_str())
    }

    /// Accept the drawn signature: store the artifact (overwriting any
    /// previous one), append the synthetic user turn, and flag the forward
    /// for the next refresh cycle.
    pub fn accept_signature(&mut self) -> Result<(), AcceptError> {
        let artifact = self.canvas.accept()?;
        self.signature = Some(artifact);
        self.append_turn(Role::User, SIGNATURE_PROVIDED_TURN);
        self.signature_pending_send = true;
        Ok(())
    }

    pub fn cancel_signature(&mut self) {
        self.canvas.cancel();
    }

    pub fn clear_signature(&mut self) {
        self.signature = None;
    }

    pub fn signature_status(&self) -> Option<(&str, i64)> {
        self.signature
            .as_ref()
            .map(|artifact| (artifact.format.as_str(), artifact.captured_at))
    }

    /// Sign-out teardown. Consumes the session; nothing survives except the
    /// session log already on disk.
    pub fn close(self) {}
}
