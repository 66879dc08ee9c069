use crate::config::Settings;
use crate::identity::claims::{decode_claims, organization_from_issuer};
use crate::identity::{UserContext, SENTINEL_ORGANIZATION};
use serde_json::Value;
use std::time::Duration;

const GRAPH_TIMEOUT: Duration = Duration::from_secs(10);
const PERSONAL_DOMAINS: &[&str] = &[
    "outlook.com",
    "hotmail.com",
    "live.com",
    "msn.com",
    "gmail.com",
];

fn graph_get(settings: &Settings, path: &str, access_token: &str) -> Result<Value, String> {
    let url = format!("{}/v1.0/{path}", settings.graph_base.trim_end_matches('/'));
    let response = ureq::get(&url)
        .timeout(GRAPH_TIMEOUT)
        .set("Authorization", &format!("Bearer {access_token}"))
        .call()
        .map_err(|err| err.to_string())?;
    response.into_json::<Value>().map_err(|err| err.to_string())
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Five-step email fallback chain over the raw profile document. Never
/// returns an empty email; the last step constructs a placeholder from the
/// profile id. The second element names the step that produced the value.
pub fn extract_email(profile: &Value) -> (String, String) {
    if let Some(mail) = non_empty_str(profile.get("mail")) {
        return (mail, "mail".to_string());
    }
    if let Some(upn) = non_empty_str(profile.get("userPrincipalName")) {
        if upn.contains('@') {
            return (upn, "userPrincipalName".to_string());
        }
    }
    if let Some(first) = profile
        .get("otherMails")
        .and_then(Value::as_array)
        .and_then(|mails| mails.first())
    {
        if let Some(mail) = non_empty_str(Some(first)) {
            return (mail, "otherMails[0]".to_string());
        }
    }
    if let Some(addresses) = profile.get("proxyAddresses").and_then(Value::as_array) {
        for address in addresses.iter().filter_map(Value::as_str) {
            if let Some(stripped) = address
                .strip_prefix("SMTP:")
                .or_else(|| address.strip_prefix("smtp:"))
            {
                let stripped = stripped.trim();
                if !stripped.is_empty() {
                    return (stripped.to_string(), "proxyAddresses".to_string());
                }
            }
        }
    }
    let id = profile.get("id").and_then(Value::as_str).unwrap_or("unknown");
    let prefix: String = id.chars().take(8).collect();
    (
        format!("user-{prefix}@unknown.com"),
        "fallback_constructed".to_string(),
    )
}

pub fn determine_account_type(profile: &Value) -> String {
    let upn = profile
        .get("userPrincipalName")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_ascii_lowercase();
    let mail = profile
        .get("mail")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_ascii_lowercase();
    let is_personal = PERSONAL_DOMAINS
        .iter()
        .any(|domain| upn.contains(domain) || mail.contains(domain));
    if is_personal {
        "personal".to_string()
    } else if upn.contains(".onmicrosoft.com") {
        "work_school_cloud".to_string()
    } else if upn.contains('@') {
        "work_school_org".to_string()
    } else {
        "unknown".to_string()
    }
}

/// Organization id fallback chain: token `tid` claim, then the directory
/// lookup endpoint, then the token issuer URL, then the sentinel.
pub fn resolve_organization_id(settings: &Settings, access_token: &str) -> String {
    let claims = decode_claims(access_token);
    if let Some(tid) = claims
        .get("tid")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return tid.to_string();
    }
    if let Ok(org) = graph_get(settings, "organization", access_token) {
        if let Some(id) = org
            .get("value")
            .and_then(Value::as_array)
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.get("id"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            return id.to_string();
        }
    }
    if let Some(issuer) = claims.get("iss").and_then(Value::as_str) {
        if let Some(organization) = organization_from_issuer(issuer) {
            return organization;
        }
    }
    SENTINEL_ORGANIZATION.to_string()
}

pub fn build_user_context(settings: &Settings, access_token: &str, profile: &Value) -> UserContext {
    let (email, method) = extract_email(profile);
    let display_name = non_empty_str(profile.get("displayName"))
        .filter(|name| !name.eq_ignore_ascii_case("unknown"))
        .unwrap_or_else(|| "User".to_string());
    UserContext {
        display_name,
        email,
        organization_id: resolve_organization_id(settings, access_token),
        account_type: determine_account_type(profile),
        email_extraction_method: method,
    }
}

/// Fetch the signed-in user's profile and normalize it. Any HTTP or decode
/// failure yields the full sentinel context; identity is best-effort.
pub fn fetch_user_context(settings: &Settings, access_token: &str) -> UserContext {
    match graph_get(settings, "me", access_token) {
        Ok(profile) => build_user_context(settings, access_token, &profile),
        Err(_) => UserContext::sentinel("error_fallback"),
    }
}
