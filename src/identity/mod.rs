pub mod claims;
pub mod profile;
pub mod token;

pub use claims::{decode_claims, organization_from_issuer};
pub use profile::{
    build_user_context, determine_account_type, extract_email, fetch_user_context,
    resolve_organization_id,
};
pub use token::{
    acquire_service_token, authorization_url, exchange_code, AccessToken, TokenError, USER_SCOPES,
};

use serde::{Deserialize, Serialize};

pub const SENTINEL_EMAIL: &str = "no-email@unknown.com";
pub const SENTINEL_ORGANIZATION: &str = "unknown";

/// Identity record built once per login. Every field is a plain always-present
/// string; extraction failures substitute sentinels instead of erroring so
/// downstream consumers never see an empty email or organization id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub display_name: String,
    pub email: String,
    pub organization_id: String,
    pub account_type: String,
    pub email_extraction_method: String,
}

impl UserContext {
    pub fn sentinel(method: &str) -> Self {
        Self {
            display_name: "User".to_string(),
            email: SENTINEL_EMAIL.to_string(),
            organization_id: SENTINEL_ORGANIZATION.to_string(),
            account_type: "unknown".to_string(),
            email_extraction_method: method.to_string(),
        }
    }

    pub fn has_real_email(&self) -> bool {
        !self.email.contains("unknown.com")
    }
}
