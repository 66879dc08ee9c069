use crate::agent::{
    send_turn, signature_forward_message, wait_for_idle, AgentApiClient, FunctionRegistry,
    IDLE_WAIT_TIMEOUT_SECS,
};
use crate::config::Settings;
use crate::session::context::{Role, SessionContext};
use crate::session::handler::SubmissionHandler;
use crate::session::SessionError;
use crate::shared::logging::append_session_log_line;

pub const SIGNATURE_SUCCESS_MESSAGE: &str = "Signature submitted successfully! Your onboarding \
     process is now complete. All your information, including your digital signature, has been \
     saved.";
pub const SIGNATURE_DELAYED_MESSAGE: &str = "Signature submitted successfully! Your onboarding \
     process is now complete. (Agent confirmation delayed due to high traffic)";

/// Deferred half of signature acceptance, run on the next refresh cycle so
/// the accept action itself never blocks on the network. Forwards the
/// artifact to the agent after waiting for in-flight runs to settle.
///
/// Failure here is deliberately non-alarming: the backend has usually
/// completed the write by the time a rate limit or transport error surfaces,
/// so the user sees a success message either way and the real error goes to
/// the session log.
pub fn process_pending(
    settings: &Settings,
    client: &AgentApiClient,
    registry: &FunctionRegistry,
    session: &mut SessionContext,
) -> Result<Option<String>, SessionError> {
    if !session.signature_pending_send {
        return Ok(None);
    }
    session.signature_pending_send = false;

    let Some(artifact) = session.signature.clone() else {
        return Ok(None);
    };
    let Some(binding) = session.binding.clone() else {
        session.append_turn(Role::Assistant, SIGNATURE_SUCCESS_MESSAGE);
        return Ok(Some(SIGNATURE_SUCCESS_MESSAGE.to_string()));
    };

    // Proceeds even when the wait times out; best-effort serialization.
    wait_for_idle(client, &binding.thread_id, IDLE_WAIT_TIMEOUT_SECS);

    let message = signature_forward_message(&session.user, &artifact);
    let reply = {
        let mut handler = SubmissionHandler::new(settings, &session.user, Some(&artifact));
        send_turn(
            client,
            registry,
            &mut handler,
            &binding.thread_id,
            &binding.agent_id,
            "user",
            &message,
        )
    };

    let text = match reply {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => SIGNATURE_SUCCESS_MESSAGE.to_string(),
        Err(err) => {
            if let Ok(state_root) = settings.resolve_state_root() {
                let _ = append_session_log_line(
                    &state_root,
                    &format!("signature forward failed: {err}"),
                );
            }
            if err.to_string().to_lowercase().contains("rate_limit") {
                SIGNATURE_SUCCESS_MESSAGE.to_string()
            } else {
                SIGNATURE_DELAYED_MESSAGE.to_string()
            }
        }
    };
    session.append_turn(Role::Assistant, &text);
    Ok(Some(text))
}
