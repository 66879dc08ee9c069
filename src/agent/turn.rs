use crate::agent::api::{AgentApiClient, Run, RunStatus, ThreadMessage, ToolOutput};
use crate::agent::registry::{FunctionCall, FunctionHandler, FunctionRegistry};
use crate::agent::AgentError;
use serde_json::{json, Map, Value};
use std::thread;
use std::time::{Duration, Instant};

pub const RUN_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Ceiling on one run reaching a terminal state; timeouts are the only
/// bound on external calls.
pub const RUN_POLL_TIMEOUT_SECS: u64 = 120;
pub const IDLE_WAIT_TIMEOUT_SECS: u64 = 30;

/// Send one turn and block until the agent's reply is available. A run that
/// pauses with `requires_action` has its named function calls executed
/// through the registry and is resumed with all outputs together; only after
/// resumption is the reply read back. A `failed` run yields its error text
/// as the reply rather than an error.
pub fn send_turn(
    client: &AgentApiClient,
    registry: &FunctionRegistry,
    handler: &mut dyn FunctionHandler,
    thread_id: &str,
    agent_id: &str,
    role: &str,
    text: &str,
) -> Result<String, AgentError> {
    send_turn_bounded(
        client,
        registry,
        handler,
        thread_id,
        agent_id,
        role,
        text,
        RUN_POLL_TIMEOUT_SECS,
    )
}

/// `send_turn` with an explicit run-completion ceiling.
#[allow(clippy::too_many_arguments)]
pub fn send_turn_bounded(
    client: &AgentApiClient,
    registry: &FunctionRegistry,
    handler: &mut dyn FunctionHandler,
    thread_id: &str,
    agent_id: &str,
    role: &str,
    text: &str,
    timeout_seconds: u64,
) -> Result<String, AgentError> {
    client.create_message(thread_id, role, text)?;
    let run = client.create_run(thread_id, agent_id)?;
    let run = drive_run(client, registry, handler, thread_id, run, timeout_seconds)?;
    if run.status == RunStatus::Failed {
        let detail = run
            .last_error
            .map(|err| err.message)
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| "run failed without error detail".to_string());
        return Ok(format!("Error: {detail}"));
    }
    let messages = client.list_messages(thread_id)?;
    Ok(extract_reply_text(messages.first()))
}

fn drive_run(
    client: &AgentApiClient,
    registry: &FunctionRegistry,
    handler: &mut dyn FunctionHandler,
    thread_id: &str,
    mut run: Run,
    timeout_seconds: u64,
) -> Result<Run, AgentError> {
    let started = Instant::now();
    loop {
        if run.status.is_terminal() {
            return Ok(run);
        }
        // The ceiling covers every round, including tool-output resumption,
        // so a runtime that answers each submission with another
        // requires_action run cannot spin unbounded.
        if started.elapsed().as_secs() >= timeout_seconds {
            return Err(AgentError::RunTimeout { timeout_seconds });
        }
        if run.status == RunStatus::RequiresAction {
            let outputs = collect_tool_outputs(registry, handler, &run);
            run = client.submit_tool_outputs(thread_id, &run.id, &outputs)?;
            continue;
        }
        thread::sleep(RUN_POLL_INTERVAL);
        run = client.get_run(thread_id, &run.id)?;
    }
}

/// Execute exactly the calls the run asked for. An unrecognized name still
/// produces an error-envelope output so the run can resume instead of
/// stalling the thread.
fn collect_tool_outputs(
    registry: &FunctionRegistry,
    handler: &mut dyn FunctionHandler,
    run: &Run,
) -> Vec<ToolOutput> {
    let calls = run
        .required_action
        .as_ref()
        .and_then(|action| action.submit_tool_outputs.as_ref())
        .map(|outputs| outputs.tool_calls.as_slice())
        .unwrap_or(&[]);
    let mut outputs = Vec::with_capacity(calls.len());
    for call in calls {
        let args: Map<String, Value> =
            serde_json::from_str(&call.function.arguments).unwrap_or_default();
        let function_call = FunctionCall {
            name: call.function.name.clone(),
            args,
        };
        let output = match registry.resolve(&call.function.name) {
            Ok(id) => handler.handle(id, &function_call),
            Err(err) => json!({ "success": false, "error": err.to_string() }).to_string(),
        };
        outputs.push(ToolOutput {
            tool_call_id: call.id.clone(),
            output,
        });
    }
    outputs
}

/// Reply text lives in the first message of the most-recent-first list.
/// Structured content lists yield the text of their first element; anything
/// else is stringified.
pub fn extract_reply_text(message: Option<&ThreadMessage>) -> String {
    let Some(message) = message else {
        return String::new();
    };
    match &message.content {
        Value::String(text) => text.clone(),
        Value::Array(items) => match items.first() {
            Some(first) => first
                .get("text")
                .and_then(|text| text.get("value"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| first.to_string()),
            None => String::new(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Poll the run list until nothing is active or the deadline passes.
/// Returns false on timeout; callers proceed anyway, trading strict
/// serialization for not wedging the session. A failed check counts as idle
/// for the same reason. The deadline is wall-clock, so slow list responses
/// eat into the budget instead of stretching it.
pub fn wait_for_idle(client: &AgentApiClient, thread_id: &str, timeout_seconds: u64) -> bool {
    let deadline = Instant::now() + Duration::from_secs(timeout_seconds);
    loop {
        match client.list_runs(thread_id) {
            Ok(runs) => {
                if !runs.iter().any(|run| run.status.is_active()) {
                    return true;
                }
            }
            Err(_) => return true,
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(RUN_POLL_INTERVAL);
    }
}
