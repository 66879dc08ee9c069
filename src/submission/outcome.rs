use serde_json::json;

/// Classification of one submission attempt. A timeout is its own class so
/// callers can distinguish "the backend probably completed the write" from
/// a hard failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success { status: u16 },
    Failure { status: u16, body: String },
    Timeout,
    Error { message: String },
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// JSON string handed back to the agent as the tool-call output.
    pub fn to_tool_output(&self) -> String {
        match self {
            Self::Success { status } => json!({
                "success": true,
                "message": format!("submission accepted with http {status}"),
            })
            .to_string(),
            Self::Failure { status, body } => json!({
                "success": false,
                "error": format!("submission rejected with http {status}"),
                "detail": body,
            })
            .to_string(),
            Self::Timeout => json!({
                "success": false,
                "error": "submission timed out",
            })
            .to_string(),
            Self::Error { message } => json!({
                "success": false,
                "error": message,
            })
            .to_string(),
        }
    }
}

/// 200, 201 and 202 all count as success; the workflow endpoint accepts
/// asynchronously. Everything else keeps the raw response body.
pub fn classify_status(status: u16, body: String) -> SubmitOutcome {
    match status {
        200 | 201 | 202 => SubmitOutcome::Success { status },
        _ => SubmitOutcome::Failure { status, body },
    }
}

pub fn is_timeout_message(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    lowered.contains("timed out") || lowered.contains("timeout")
}
