use crate::identity::UserContext;
use crate::signature::SignatureArtifact;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureFields {
    pub signature_base64: String,
    pub signature_timestamp: String,
    pub signature_format: String,
    pub signature_collected: bool,
}

impl SignatureFields {
    pub fn empty() -> Self {
        Self {
            signature_base64: String::new(),
            signature_timestamp: String::new(),
            signature_format: String::new(),
            signature_collected: false,
        }
    }

    pub fn from_artifact(artifact: &SignatureArtifact) -> Self {
        Self {
            signature_base64: artifact.base64_data.clone(),
            signature_timestamp: artifact.captured_at.to_string(),
            signature_format: artifact.format.clone(),
            signature_collected: true,
        }
    }
}

/// Wire form posted to the workflow endpoint. Assembled on demand right
/// before the post and never stored afterwards. `tenant_id` and
/// `user_email` are always present; sentinels stand in when extraction
/// failed at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub tenant_id: String,
    pub user_email: String,
    #[serde(default)]
    pub employee: Value,
    #[serde(default)]
    pub payment_info: Value,
    #[serde(default)]
    pub w4_info: Value,
    pub signature: SignatureFields,
}

impl SubmissionPayload {
    /// Build from the agent's tool-call arguments. Identity fields the agent
    /// collected during the conversation are kept, with the session identity
    /// (sentinel-backed, never empty) as fallback; the session's live
    /// artifact wins over agent-supplied signature fields.
    pub fn from_function_args(
        user: &UserContext,
        args: &Map<String, Value>,
        signature: Option<&SignatureArtifact>,
    ) -> Self {
        let signature = match signature {
            Some(artifact) => SignatureFields::from_artifact(artifact),
            None => args
                .get("signature")
                .and_then(|value| serde_json::from_value(value.clone()).ok())
                .unwrap_or_else(SignatureFields::empty),
        };
        Self {
            tenant_id: string_arg(args, "tenantId")
                .unwrap_or_else(|| user.organization_id.clone()),
            user_email: string_arg(args, "userEmail").unwrap_or_else(|| user.email.clone()),
            employee: args.get("employee").cloned().unwrap_or(Value::Null),
            payment_info: args.get("paymentInfo").cloned().unwrap_or(Value::Null),
            w4_info: args.get("w4Info").cloned().unwrap_or(Value::Null),
            signature,
        }
    }
}

fn string_arg(args: &Map<String, Value>, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "null" && *value != "undefined")
        .map(str::to_string)
}
