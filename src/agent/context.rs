use crate::identity::{UserContext, SENTINEL_ORGANIZATION};
use crate::signature::SignatureArtifact;

/// Hidden context-priming turn sent right after thread creation, with role
/// `assistant` so it never renders as user input. Carries the identity the
/// agent must echo back verbatim in every submission payload.
pub fn initial_context_message(user: &UserContext) -> String {
    let organization_status = if user.organization_id == SENTINEL_ORGANIZATION {
        "unknown - note potential routing limitations"
    } else {
        "valid"
    };
    format!(
        "Hi Employee Onboarding Assistant!\n\
         \n\
         [SYSTEM CONTEXT - PLEASE REMEMBER THROUGHOUT THE CONVERSATION]\n\
         User: {name}\n\
         Email: {email}\n\
         Tenant ID: {org}\n\
         Account Type: {account_type}\n\
         Email Extraction Method: {method}\n\
         \n\
         CRITICAL INSTRUCTIONS: whenever you create JSON output for workflow API calls, \
         you MUST always include these fields with exact values:\n\
         \"tenantId\": \"{org}\"\n\
         \"userEmail\": \"{email}\"\n\
         \n\
         SIGNATURE DATA HANDLING:\n\
         - During onboarding you will collect the user's digital signature.\n\
         - When the signature is provided you will receive it as base64 encoded PNG data.\n\
         - When submitting employee data to storage you MUST include these signature fields:\n\
           \"signatureBase64\", \"signatureTimestamp\", \"signatureFormat\".\n\
         - Store the signature together with the other employee information.\n\
         \n\
         VALIDATION RULES:\n\
         - If tenantId is \"unknown\", inform the user that organization identification may be limited.\n\
         - If userEmail contains \"no-email\" or \"unknown\", collect the user's actual work email \
         during onboarding instead of asking them to confirm {email}.\n\
         - Never use null, undefined, or an empty string for these fields.\n\
         - Never show raw JSON payloads to the user.\n\
         \n\
         Current user context validation:\n\
         - Email Status: {method}\n\
         - Tenant Status: {organization_status}\n\
         - Account Type: {account_type}\n\
         \n\
         Begin the onboarding process with a friendly greeting.",
        name = user.display_name,
        email = user.email,
        org = user.organization_id,
        account_type = user.account_type,
        method = user.email_extraction_method,
    )
}

/// Follow-up turn forwarding the accepted signature, with the full base64
/// payload the agent must carry into the storage submission.
pub fn signature_forward_message(user: &UserContext, artifact: &SignatureArtifact) -> String {
    format!(
        "[SIGNATURE COLLECTED - READY FOR STORAGE]\n\
         \n\
         The user has successfully provided their digital signature.\n\
         \n\
         SIGNATURE DATA FOR STORAGE:\n\
         Signature Base64: {base64}\n\
         Timestamp: {timestamp}\n\
         Format: {format}\n\
         User Email: {email}\n\
         Tenant ID: {org}\n\
         \n\
         When you call the submission function to store the employee onboarding data, include:\n\
         \"tenantId\": \"{org}\"\n\
         \"userEmail\": \"{email}\"\n\
         \"signatureBase64\": the complete base64 string above\n\
         \"signatureTimestamp\": \"{timestamp}\"\n\
         \"signatureFormat\": \"{format}\"\n\
         \n\
         Confirm that you have received the signature data and will include it when \
         submitting the complete employee onboarding information.",
        base64 = artifact.base64_data,
        timestamp = artifact.captured_at,
        format = artifact.format,
        email = user.email,
        org = user.organization_id,
    )
}

/// Directive sent instead of opening the signature pad when the session does
/// not require a signature.
pub fn no_signature_directive() -> String {
    "The user has confirmed the onboarding summary. Signature collection is disabled \
     for this session. Call the submit_onboarding_data function now with empty signature \
     fields: \"signatureBase64\": \"\", \"signatureTimestamp\": \"\", \
     \"signatureFormat\": \"\", \"signatureCollected\": false. Do not ask the user for \
     a signature."
        .to_string()
}
