use chrono::Utc;
use onboard_assistant::session::oauth_cache::{
    store_oauth_session, take_oauth_session, OAUTH_SESSION_DIR, OAUTH_SESSION_TTL_SECS,
};
use onboard_assistant::session::parse_require_signature;
use std::fs;
use tempfile::tempdir;

const TOKEN: &str = "abcdef00112233445566778899aabbcc";

#[test]
fn session_oauth_cache_module_round_trips_the_signature_flag() {
    let temp = tempdir().expect("tempdir");
    let state_root = temp.path().join(".onboard-assistant");

    store_oauth_session(&state_root, TOKEN, false).expect("store");
    assert_eq!(
        take_oauth_session(&state_root, TOKEN).expect("take"),
        Some(false)
    );
}

#[test]
fn session_oauth_cache_module_entries_are_consumed_on_read() {
    let temp = tempdir().expect("tempdir");
    let state_root = temp.path().join(".onboard-assistant");

    store_oauth_session(&state_root, TOKEN, true).expect("store");
    assert_eq!(
        take_oauth_session(&state_root, TOKEN).expect("first take"),
        Some(true)
    );
    assert_eq!(
        take_oauth_session(&state_root, TOKEN).expect("second take"),
        None
    );
}

#[test]
fn session_oauth_cache_module_rejects_unsafe_tokens() {
    let temp = tempdir().expect("tempdir");
    let state_root = temp.path().join(".onboard-assistant");

    let err = store_oauth_session(&state_root, "../escape", true).expect_err("store");
    assert!(err.to_string().contains("state token"));
    assert_eq!(
        take_oauth_session(&state_root, "../escape").expect("take"),
        None
    );
}

#[test]
fn session_oauth_cache_module_expired_entries_read_as_missing() {
    let temp = tempdir().expect("tempdir");
    let state_root = temp.path().join(".onboard-assistant");
    let dir = state_root.join(OAUTH_SESSION_DIR);
    fs::create_dir_all(&dir).expect("create dir");

    let stale = Utc::now().timestamp() - OAUTH_SESSION_TTL_SECS - 5;
    fs::write(
        dir.join(format!("{TOKEN}.json")),
        format!(r#"{{"requireSignature":false,"createdAt":{stale}}}"#),
    )
    .expect("write stale entry");

    assert_eq!(take_oauth_session(&state_root, TOKEN).expect("take"), None);
}

#[test]
fn session_oauth_cache_module_malformed_entries_read_as_missing() {
    let temp = tempdir().expect("tempdir");
    let state_root = temp.path().join(".onboard-assistant");
    let dir = state_root.join(OAUTH_SESSION_DIR);
    fs::create_dir_all(&dir).expect("create dir");
    fs::write(dir.join(format!("{TOKEN}.json")), "not json").expect("write");

    assert_eq!(take_oauth_session(&state_root, TOKEN).expect("take"), None);
}

#[test]
fn session_oauth_cache_module_signature_flag_defaults_to_required() {
    assert!(parse_require_signature(None));
    assert!(parse_require_signature(Some("true")));
    assert!(parse_require_signature(Some("anything")));
    assert!(!parse_require_signature(Some("false")));
    assert!(!parse_require_signature(Some(" FALSE ")));
    assert!(!parse_require_signature(Some("0")));
    assert!(!parse_require_signature(Some("no")));
}
