use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use onboard_assistant::config::Settings;
use onboard_assistant::identity::{
    build_user_context, determine_account_type, extract_email, resolve_organization_id,
    UserContext, SENTINEL_EMAIL, SENTINEL_ORGANIZATION,
};
use serde_json::json;

fn token_with_claims(claims: &serde_json::Value) -> String {
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("header.{payload}.signature")
}

fn offline_settings() -> Settings {
    // Connection-refused endpoint so any accidental network fallback fails
    // fast instead of hanging the test.
    Settings {
        graph_base: "http://127.0.0.1:9".to_string(),
        ..Settings::default()
    }
}

#[test]
fn identity_profile_module_prefers_mail_over_everything_else() {
    let profile = json!({
        "mail": "ada@contoso.com",
        "userPrincipalName": "ada@contoso.onmicrosoft.com",
        "otherMails": ["ada@example.org"],
    });
    assert_eq!(
        extract_email(&profile),
        ("ada@contoso.com".to_string(), "mail".to_string())
    );
}

#[test]
fn identity_profile_module_falls_back_to_upn_then_other_mails() {
    let upn_only = json!({ "userPrincipalName": "bo@contoso.com" });
    assert_eq!(
        extract_email(&upn_only),
        ("bo@contoso.com".to_string(), "userPrincipalName".to_string())
    );

    // A UPN without an @ is not an address and must be skipped.
    let other_mails = json!({
        "userPrincipalName": "bo_contoso.com#EXT#",
        "otherMails": ["bo@example.org", "second@example.org"],
    });
    assert_eq!(
        extract_email(&other_mails),
        ("bo@example.org".to_string(), "otherMails[0]".to_string())
    );
}

#[test]
fn identity_profile_module_reads_primary_smtp_proxy_address() {
    let profile = json!({
        "proxyAddresses": ["X500:/o=Exchange", "smtp: cy@contoso.com "],
    });
    assert_eq!(
        extract_email(&profile),
        ("cy@contoso.com".to_string(), "proxyAddresses".to_string())
    );
}

#[test]
fn identity_profile_module_constructs_placeholder_from_profile_id() {
    let profile = json!({ "id": "0123456789abcdef" });
    assert_eq!(
        extract_email(&profile),
        (
            "user-01234567@unknown.com".to_string(),
            "fallback_constructed".to_string()
        )
    );

    let empty = json!({});
    let (email, method) = extract_email(&empty);
    assert_eq!(email, "user-unknown@unknown.com");
    assert_eq!(method, "fallback_constructed");
}

#[test]
fn identity_profile_module_classifies_account_types() {
    let personal = json!({ "userPrincipalName": "d@outlook.com" });
    assert_eq!(determine_account_type(&personal), "personal");

    let cloud = json!({ "userPrincipalName": "d@contoso.onmicrosoft.com" });
    assert_eq!(determine_account_type(&cloud), "work_school_cloud");

    let org = json!({ "userPrincipalName": "d@contoso.com" });
    assert_eq!(determine_account_type(&org), "work_school_org");

    assert_eq!(determine_account_type(&json!({})), "unknown");
}

#[test]
fn identity_profile_module_takes_organization_from_tid_claim() {
    let settings = offline_settings();
    let token = token_with_claims(&json!({ "tid": "org-42" }));
    assert_eq!(resolve_organization_id(&settings, &token), "org-42");
}

#[test]
fn identity_profile_module_falls_back_to_issuer_then_sentinel() {
    let settings = offline_settings();
    let token = token_with_claims(&json!({
        "iss": "https://login.microsoftonline.com/org-77/v2.0",
    }));
    assert_eq!(resolve_organization_id(&settings, &token), "org-77");

    let bare = token_with_claims(&json!({}));
    assert_eq!(
        resolve_organization_id(&settings, &bare),
        SENTINEL_ORGANIZATION
    );
}

#[test]
fn identity_profile_module_normalizes_display_name() {
    let settings = offline_settings();
    let token = token_with_claims(&json!({ "tid": "org-1" }));

    let named = json!({ "displayName": "Ada Lovelace", "mail": "ada@contoso.com" });
    let context = build_user_context(&settings, &token, &named);
    assert_eq!(context.display_name, "Ada Lovelace");
    assert_eq!(context.organization_id, "org-1");
    assert!(context.has_real_email());

    let unnamed = json!({ "displayName": "Unknown", "mail": "ada@contoso.com" });
    assert_eq!(
        build_user_context(&settings, &token, &unnamed).display_name,
        "User"
    );
}

#[test]
fn identity_profile_module_sentinel_context_is_never_empty() {
    let sentinel = UserContext::sentinel("error_fallback");
    assert_eq!(sentinel.email, SENTINEL_EMAIL);
    assert_eq!(sentinel.organization_id, SENTINEL_ORGANIZATION);
    assert_eq!(sentinel.email_extraction_method, "error_fallback");
    assert!(!sentinel.has_real_email());
}
