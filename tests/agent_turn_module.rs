use onboard_assistant::agent::{extract_reply_text, Run, RunStatus, ThreadMessage};
use serde_json::json;

fn message(content: serde_json::Value) -> ThreadMessage {
    serde_json::from_value(json!({
        "id": "msg-1",
        "role": "assistant",
        "content": content,
    }))
    .expect("message")
}

#[test]
fn agent_turn_module_reads_plain_string_content() {
    let msg = message(json!("Welcome aboard!"));
    assert_eq!(extract_reply_text(Some(&msg)), "Welcome aboard!");
}

#[test]
fn agent_turn_module_reads_structured_content_lists() {
    let msg = message(json!([
        { "type": "text", "text": { "value": "First block" } },
        { "type": "text", "text": { "value": "ignored" } },
    ]));
    assert_eq!(extract_reply_text(Some(&msg)), "First block");
}

#[test]
fn agent_turn_module_stringifies_unrecognized_content() {
    let msg = message(json!([{ "type": "image", "url": "x" }]));
    assert_eq!(extract_reply_text(Some(&msg)), r#"{"type":"image","url":"x"}"#);

    let empty = message(json!([]));
    assert_eq!(extract_reply_text(Some(&empty)), "");

    let null = message(json!(null));
    assert_eq!(extract_reply_text(Some(&null)), "");

    assert_eq!(extract_reply_text(None), "");
}

#[test]
fn agent_turn_module_run_statuses_deserialize_snake_case() {
    let run: Run = serde_json::from_value(json!({
        "id": "run-1",
        "status": "requires_action",
        "required_action": {
            "type": "submit_tool_outputs",
            "submit_tool_outputs": {
                "tool_calls": [{
                    "id": "call-1",
                    "function": {
                        "name": "submit_onboarding_data",
                        "arguments": "{\"tenantId\":\"org-1\"}",
                    },
                }],
            },
        },
    }))
    .expect("run");

    assert_eq!(run.status, RunStatus::RequiresAction);
    let calls = run
        .required_action
        .expect("action")
        .submit_tool_outputs
        .expect("outputs")
        .tool_calls;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].function.name, "submit_onboarding_data");
}

#[test]
fn agent_turn_module_unrecognized_statuses_map_to_unknown() {
    let run: Run = serde_json::from_value(json!({
        "id": "run-1",
        "status": "incomplete",
    }))
    .expect("run");
    assert_eq!(run.status, RunStatus::Unknown);
    assert!(!run.status.is_terminal());
    assert!(!run.status.is_active());
}

#[test]
fn agent_turn_module_status_classification() {
    for status in [
        RunStatus::Completed,
        RunStatus::Failed,
        RunStatus::Cancelled,
        RunStatus::Expired,
    ] {
        assert!(status.is_terminal());
        assert!(!status.is_active());
    }
    for status in [
        RunStatus::Queued,
        RunStatus::InProgress,
        RunStatus::RequiresAction,
    ] {
        assert!(status.is_active());
        assert!(!status.is_terminal());
    }
    assert!(!RunStatus::Cancelling.is_terminal());
    assert!(!RunStatus::Cancelling.is_active());
}
