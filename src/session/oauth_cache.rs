use crate::session::SessionError;
use crate::shared::fs_atomic::atomic_write_file;
use crate::shared::ids::is_valid_state_token;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const OAUTH_SESSION_DIR: &str = "oauth-sessions";
/// Entries only need to survive one redirect round trip.
pub const OAUTH_SESSION_TTL_SECS: i64 = 600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OauthSession {
    require_signature: bool,
    created_at: i64,
}

fn session_path(state_root: &Path, token: &str) -> PathBuf {
    state_root.join(OAUTH_SESSION_DIR).join(format!("{token}.json"))
}

fn io_error(path: &Path, source: std::io::Error) -> SessionError {
    SessionError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Persist the signature-required flag keyed by the `state` token before
/// redirecting to the identity provider.
pub fn store_oauth_session(
    state_root: &Path,
    token: &str,
    require_signature: bool,
) -> Result<(), SessionError> {
    if !is_valid_state_token(token) {
        return Err(SessionError::Token(format!(
            "state token `{token}` is not a valid cache key"
        )));
    }
    let path = session_path(state_root, token);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }
    let record = OauthSession {
        require_signature,
        created_at: Utc::now().timestamp(),
    };
    let content = serde_json::to_vec(&record).map_err(|source| SessionError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    atomic_write_file(&path, &content).map_err(|source| io_error(&path, source))?;
    sweep_expired(state_root);
    Ok(())
}

/// Consume the cached flag on callback. Unknown, malformed, or expired
/// entries all come back as `None`; the caller defaults signature
/// collection to required.
pub fn take_oauth_session(state_root: &Path, token: &str) -> Result<Option<bool>, SessionError> {
    if !is_valid_state_token(token) {
        return Ok(None);
    }
    let path = session_path(state_root, token);
    let raw = match fs::read(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(io_error(&path, source)),
    };
    fs::remove_file(&path).map_err(|source| io_error(&path, source))?;
    let Ok(record) = serde_json::from_slice::<OauthSession>(&raw) else {
        return Ok(None);
    };
    if Utc::now().timestamp() - record.created_at > OAUTH_SESSION_TTL_SECS {
        return Ok(None);
    }
    Ok(Some(record.require_signature))
}

/// Best-effort cleanup of abandoned login attempts.
fn sweep_expired(state_root: &Path) {
    let dir = state_root.join(OAUTH_SESSION_DIR);
    let Ok(entries) = fs::read_dir(&dir) else {
        return;
    };
    let now = Utc::now().timestamp();
    for entry in entries.flatten() {
        let path = entry.path();
        let expired = fs::read(&path)
            .ok()
            .and_then(|raw| serde_json::from_slice::<OauthSession>(&raw).ok())
            .map(|record| now - record.created_at > OAUTH_SESSION_TTL_SECS)
            .unwrap_or(true);
        if expired {
            let _ = fs::remove_file(&path);
        }
    }
}

/// Entry query parameter controlling whether signature collection is
/// mandatory. Absent or unrecognized values default to required.
pub fn parse_require_signature(raw: Option<&str>) -> bool {
    match raw.map(|value| value.trim().to_ascii_lowercase()) {
        Some(value) if value == "false" || value == "0" || value == "no" => false,
        _ => true,
    }
}
