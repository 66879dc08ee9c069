use crate::config::Settings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const TENANT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("tenant lookup request failed: {0}")]
    Request(String),
    #[error("tenant lookup returned http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("tenant lookup response is not valid json: {0}")]
    Parse(String),
    #[error("tenant lookup failed: {0}")]
    Lookup(String),
}

/// Agent assignment for one organization, as returned by the lookup
/// workflow. One route is active per session; starting a new conversation
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRoute {
    pub agent_id: String,
    pub agent_type: String,
    pub org_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    tenant_id: &'a str,
    user_email: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    success: bool,
    #[serde(default)]
    agent_id: Option<String>,
    #[serde(default)]
    agent_type: Option<String>,
    #[serde(default)]
    org_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Classify a lookup response. Success requires HTTP 200 and a body with
/// `success: true`; everything else is terminal for the session.
pub fn classify_lookup(status: u16, body: &str) -> Result<AgentRoute, TenantError> {
    if status != 200 {
        return Err(TenantError::Http {
            status,
            body: body.to_string(),
        });
    }
    let parsed: LookupResponse =
        serde_json::from_str(body).map_err(|err| TenantError::Parse(err.to_string()))?;
    if !parsed.success {
        return Err(TenantError::Lookup(
            parsed.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    let agent_id = parsed
        .agent_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| TenantError::Lookup("response is missing agentId".to_string()))?;
    Ok(AgentRoute {
        agent_id,
        agent_type: parsed.agent_type.unwrap_or_else(|| "Standard".to_string()),
        org_name: parsed.org_name.unwrap_or_else(|| "Unknown".to_string()),
    })
}

pub fn resolve(
    settings: &Settings,
    organization_id: &str,
    email: &str,
) -> Result<AgentRoute, TenantError> {
    let body = serde_json::to_value(LookupRequest {
        tenant_id: organization_id,
        user_email: email,
    })
    .map_err(|err| TenantError::Request(err.to_string()))?;
    let response = ureq::post(&settings.tenant_lookup_url)
        .timeout(TENANT_LOOKUP_TIMEOUT)
        .send_json(body)
        .map_err(|err| match err {
            ureq::Error::Status(status, response) => TenantError::Http {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            other => TenantError::Request(other.to_string()),
        })?;
    let status = response.status();
    let body = response
        .into_string()
        .map_err(|err| TenantError::Parse(err.to_string()))?;
    classify_lookup(status, &body)
}
