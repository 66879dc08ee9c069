use crate::agent::{
    initial_context_message, no_signature_directive, send_turn, AgentApiClient, FunctionRegistry,
};
use crate::config::Settings;
use crate::identity::{authorization_url, exchange_code, fetch_user_context, UserContext};
use crate::session::context::{Role, SessionContext};
use crate::session::handler::SubmissionHandler;
use crate::session::oauth_cache::{store_oauth_session, take_oauth_session};
use crate::session::{AgentBinding, SessionError};
use crate::shared::ids::random_state_token;
use crate::shared::logging::append_session_log_line;
use crate::signature::requests_signature;
use crate::submission::{detect_confirmation, plan_user_turn, OutboundPlan};
use crate::tenant;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStart {
    pub state_token: String,
    pub authorization_url: String,
}

/// Outcome of one user turn through the choreography.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnAction {
    /// The agent replied; the text has been appended to the conversation.
    Replied(String),
    /// The signature pad was opened instead; no network call was issued.
    SignatureRequested,
}

/// First half of the login handshake: mint a state token, cache the
/// signature-required flag under it, and build the provider redirect URL.
pub fn begin_login(
    settings: &Settings,
    state_root: &Path,
    require_signature: bool,
) -> Result<LoginStart, SessionError> {
    let state_token = random_state_token().map_err(SessionError::Token)?;
    store_oauth_session(state_root, &state_token, require_signature)?;
    Ok(LoginStart {
        authorization_url: authorization_url(settings, &state_token),
        state_token,
    })
}

/// Second half: redeem the authorization code and build the session.
/// Identity failures never surface here; the session proceeds with a
/// sentinel context rather than blocking the user on a backend hiccup.
pub fn complete_login(
    settings: &Settings,
    state_root: &Path,
    code: &str,
    state_token: &str,
) -> Result<SessionContext, SessionError> {
    let require_signature = take_oauth_session(state_root, state_token)?.unwrap_or(true);
    let user = match exchange_code(settings, code) {
        Some(token) => fetch_user_context(settings, &token.access_token),
        None => UserContext::sentinel("exception_fallback"),
    };
    let _ = append_session_log_line(
        state_root,
        &format!(
            "login email={} org={} method={} require_signature={require_signature}",
            user.email, user.organization_id, user.email_extraction_method
        ),
    );
    Ok(SessionContext::new(user, require_signature))
}

/// Resolve the tenant's agent, open a thread, send the hidden context turn,
/// and append the agent's greeting. Failures here are setup-fatal for the
/// session.
pub fn start_conversation(
    settings: &Settings,
    client: &AgentApiClient,
    registry: &FunctionRegistry,
    session: &mut SessionContext,
) -> Result<(), SessionError> {
    let route = tenant::resolve(settings, &session.user.organization_id, &session.user.email)?;
    if let Ok(state_root) = settings.resolve_state_root() {
        let _ = append_session_log_line(
            &state_root,
            &format!(
                "tenant resolved agent={} type={} org={}",
                route.agent_id, route.agent_type, route.org_name
            ),
        );
    }
    open_thread_with_context(settings, client, registry, session, route)
}

/// Replace the thread wholesale and clear the log; used by both "clear
/// chat" and "new conversation".
pub fn new_thread(
    settings: &Settings,
    client: &AgentApiClient,
    registry: &FunctionRegistry,
    session: &mut SessionContext,
) -> Result<(), SessionError> {
    let route = match &session.binding {
        Some(binding) => tenant::AgentRoute {
            agent_id: binding.agent_id.clone(),
            agent_type: binding.agent_type.clone(),
            org_name: binding.org_name.clone(),
        },
        None => return Err(SessionError::NotConnected),
    };
    open_thread_with_context(settings, client, registry, session, route)
}

fn open_thread_with_context(
    settings: &Settings,
    client: &AgentApiClient,
    registry: &FunctionRegistry,
    session: &mut SessionContext,
    route: tenant::AgentRoute,
) -> Result<(), SessionError> {
    let thread_id = client.open_thread()?;
    session.binding = Some(AgentBinding {
        agent_id: route.agent_id.clone(),
        agent_type: route.agent_type,
        org_name: route.org_name,
        thread_id: thread_id.clone(),
    });
    session.conversation.clear();
    let context = initial_context_message(&session.user);
    let greeting = {
        let mut handler =
            SubmissionHandler::new(settings, &session.user, session.signature.as_ref());
        send_turn(
            client,
            registry,
            &mut handler,
            &thread_id,
            &route.agent_id,
            "assistant",
            &context,
        )?
    };
    session.append_turn(Role::Assistant, &greeting);
    Ok(())
}

/// One user turn. Confirmation of a data summary is evaluated against the
/// agent's immediately preceding message; depending on the signature policy
/// this either opens the signature pad (no network call this cycle), sends
/// the empty-signature directive, or forwards the user's text unchanged.
pub fn handle_user_message(
    settings: &Settings,
    client: &AgentApiClient,
    registry: &FunctionRegistry,
    session: &mut SessionContext,
    text: &str,
) -> Result<TurnAction, SessionError> {
    let previous_agent = session.last_assistant_text().unwrap_or("").to_string();
    session.append_turn(Role::User, text);

    let confirmed = detect_confirmation(&previous_agent, text);
    let plan = plan_user_turn(confirmed, session.require_signature, session.signature.is_some());
    if plan == OutboundPlan::OpenSignatureCapture {
        session.canvas.open();
        return Ok(TurnAction::SignatureRequested);
    }

    let binding = session.binding.clone().ok_or(SessionError::NotConnected)?;
    let outbound = match plan {
        OutboundPlan::SendDirective => no_signature_directive(),
        _ => text.to_string(),
    };
    let reply = {
        let mut handler =
            SubmissionHandler::new(settings, &session.user, session.signature.as_ref());
        send_turn(
            client,
            registry,
            &mut handler,
            &binding.thread_id,
            &binding.agent_id,
            "user",
            &outbound,
        )?
    };
    session.append_turn(Role::Assistant, &reply);
    // The agent can also ask for the signature directly, outside the
    // confirmation flow.
    if session.require_signature && session.signature.is_none() && requests_signature(&reply) {
        session.canvas.open();
    }
    Ok(TurnAction::Replied(reply))
}
