use getrandom::getrandom;

pub const STATE_TOKEN_LEN: usize = 32;

/// Random hex token carried through the identity provider's `state`
/// parameter and used as the OAuth session cache key.
pub fn random_state_token() -> Result<String, String> {
    let mut bytes = [0u8; STATE_TOKEN_LEN / 2];
    getrandom(&mut bytes).map_err(|err| format!("failed to gather entropy: {err}"))?;
    let mut token = String::with_capacity(STATE_TOKEN_LEN);
    for byte in bytes {
        token.push_str(&format!("{byte:02x}"));
    }
    Ok(token)
}

/// Tokens become file names under the state root, so anything that is not
/// plain lowercase hex is rejected before it touches the filesystem.
pub fn is_valid_state_token(raw: &str) -> bool {
    raw.len() == STATE_TOKEN_LEN
        && raw
            .chars()
            .all(|ch| ch.is_ascii_digit() || ('a'..='f').contains(&ch))
}
