use crate::config::Settings;
use serde::Deserialize;
use std::time::Duration;

pub const USER_SCOPES: &[&str] = &["User.Read", "User.Read.All", "Organization.Read.All"];
const SERVICE_SCOPE: &str = "https://ai.azure.com/.default";
const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token request failed: {0}")]
    Request(String),
    #[error("token endpoint returned http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("token response is not valid json: {0}")]
    Parse(String),
}

fn token_endpoint(settings: &Settings, tenant: &str) -> String {
    format!(
        "{}/{tenant}/oauth2/v2.0/token",
        settings.login_base.trim_end_matches('/')
    )
}

/// Provider redirect URL carrying the user scopes and the opaque `state`
/// token that keys the OAuth session cache across the round trip.
pub fn authorization_url(settings: &Settings, state_token: &str) -> String {
    let scope = USER_SCOPES.join(" ");
    format!(
        "{}/{}/oauth2/v2.0/authorize?client_id={}&response_type=code&response_mode=query&redirect_uri={}&scope={}&state={}",
        settings.login_base.trim_end_matches('/'),
        settings.user_tenant_id,
        urlencoding::encode(&settings.client_id),
        urlencoding::encode(&settings.redirect_uri),
        urlencoding::encode(&scope),
        urlencoding::encode(state_token),
    )
}

fn request_token(endpoint: &str, form: &[(&str, &str)]) -> Result<AccessToken, TokenError> {
    let response = ureq::post(endpoint)
        .timeout(TOKEN_TIMEOUT)
        .send_form(form)
        .map_err(|err| match err {
            ureq::Error::Status(status, response) => TokenError::Http {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            other => TokenError::Request(other.to_string()),
        })?;
    let token: AccessToken = response
        .into_json()
        .map_err(|err| TokenError::Parse(err.to_string()))?;
    if token.access_token.trim().is_empty() {
        return Err(TokenError::Parse(
            "response is missing access_token".to_string(),
        ));
    }
    Ok(token)
}

/// Authorization-code exchange for the signed-in user. Failure here is
/// recoverable: the caller proceeds with a sentinel identity.
pub fn exchange_code(settings: &Settings, code: &str) -> Option<AccessToken> {
    let endpoint = token_endpoint(settings, &settings.user_tenant_id);
    let scope = USER_SCOPES.join(" ");
    request_token(
        &endpoint,
        &[
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("scope", scope.as_str()),
        ],
    )
    .ok()
}

/// Client-credentials grant against the service tenant that owns the agent
/// runtime. Setup-fatal on failure.
pub fn acquire_service_token(settings: &Settings) -> Result<AccessToken, TokenError> {
    let endpoint = token_endpoint(settings, &settings.service_tenant_id);
    request_token(
        &endpoint,
        &[
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", SERVICE_SCOPE),
        ],
    )
}
