pub mod confirm;
pub mod outcome;
pub mod payload;

pub use confirm::{agent_requests_confirmation, detect_confirmation, plan_user_turn, OutboundPlan};
pub use outcome::{classify_status, is_timeout_message, SubmitOutcome};
pub use payload::{SignatureFields, SubmissionPayload};

use crate::config::Settings;
use std::time::Duration;

pub const SUBMISSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Post the assembled payload to the workflow endpoint and classify the
/// outcome. Invoked as the local handler for the agent's submission tool
/// call, not directly by any rendering layer.
pub fn submit(settings: &Settings, payload: &SubmissionPayload) -> SubmitOutcome {
    submit_with_timeout(settings, payload, SUBMISSION_TIMEOUT)
}

/// `submit` with an explicit request timeout.
pub fn submit_with_timeout(
    settings: &Settings,
    payload: &SubmissionPayload,
    timeout: Duration,
) -> SubmitOutcome {
    let body = match serde_json::to_value(payload) {
        Ok(body) => body,
        Err(err) => {
            return SubmitOutcome::Error {
                message: err.to_string(),
            }
        }
    };
    match ureq::post(&settings.submission_url)
        .timeout(timeout)
        .send_json(body)
    {
        Ok(response) => {
            let status = response.status();
            let body = response.into_string().unwrap_or_default();
            classify_status(status, body)
        }
        Err(ureq::Error::Status(status, response)) => {
            classify_status(status, response.into_string().unwrap_or_default())
        }
        Err(ureq::Error::Transport(transport)) => {
            let message = transport.to_string();
            if is_timeout_message(&message) {
                SubmitOutcome::Timeout
            } else {
                SubmitOutcome::Error { message }
            }
        }
    }
}
