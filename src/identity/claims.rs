use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::{Map, Value};

/// Unverified decode of the JWT payload segment. Signature validation stays
/// with the identity provider; the claims are only used for best-effort
/// organization resolution, so any malformed token yields an empty object.
pub fn decode_claims(access_token: &str) -> Value {
    let Some(payload) = access_token.split('.').nth(1) else {
        return Value::Object(Map::new());
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) else {
        return Value::Object(Map::new());
    };
    serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Pull the directory id out of an issuer URL such as
/// `https://login.microsoftonline.com/<id>/v2.0`.
pub fn organization_from_issuer(issuer: &str) -> Option<String> {
    let rest = issuer.split("login.microsoftonline.com/").nth(1)?;
    let id = rest.split('/').next()?.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
