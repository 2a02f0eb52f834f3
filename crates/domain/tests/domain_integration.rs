//! Integration tests for domain value objects
//!
//! Covers configuration documents, request descriptors and the session
//! lifecycle types as a consumer of the crate sees them.

use serde_json::json;
use voyager_domain::utils::{extract_handle_from_profile_url, parse_profile_url_from_redirect};
use voyager_domain::{
    ChallengePayload, ClientConfig, CsrfToken, QueryValue, RequestDescriptor, SessionState,
    VoyagerError,
};

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_partial_config_document_keeps_defaults() {
    let config: ClientConfig = serde_json::from_value(json!({
        "base_url": "http://127.0.0.1:8080/voyager/api",
        "pacing": {"max_delay_ms": 9000}
    }))
    .expect("partial config should deserialize");

    assert_eq!(config.base_url, "http://127.0.0.1:8080/voyager/api");
    assert_eq!(config.pacing.min_delay_ms, 2000);
    assert_eq!(config.pacing.max_delay_ms, 9000);
    assert_eq!(config.max_search_count, 49);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_reports_first_problem() {
    let config = ClientConfig { auth_url: "relative/path".into(), ..ClientConfig::default() };
    let err = config.validate().unwrap_err();
    assert!(matches!(&err, VoyagerError::Config(msg) if msg.contains("auth_url")), "got {err:?}");

    let config = ClientConfig { max_search_count: 0, ..ClientConfig::default() };
    assert!(config.validate().is_err());
}

#[test]
fn test_auth_domain_scopes_session_cookie() {
    assert_eq!(ClientConfig::default().auth_domain().unwrap(), "www.linkedin.com");
}

// ============================================================================
// Request descriptors
// ============================================================================

#[test]
fn test_descriptor_builder_collects_headers_and_query() {
    let descriptor = RequestDescriptor::get("https://www.linkedin.com/voyager/api/search/hits")
        .headers([("Accept", "text/html"), ("x-li-lang", "en_US")])
        .header("accept", "application/json")
        .query_param("count", 49u32)
        .query_param("guides", "List(v->PEOPLE)")
        .raw();

    assert!(descriptor.raw);
    assert_eq!(descriptor.headers.len(), 2);
    assert_eq!(descriptor.headers.get("ACCEPT"), Some("application/json"));
    let query = descriptor.query.as_ref().unwrap();
    assert_eq!(query["guides"], QueryValue::list(["v->PEOPLE"]));
    assert_eq!(query["count"], QueryValue::scalar("49"));
    assert!(descriptor.validate().is_ok());
}

#[test]
fn test_relative_descriptor_is_invalid() {
    let err = RequestDescriptor::post("identity/profiles/me").validate().unwrap_err();
    assert!(matches!(err, VoyagerError::InvalidInput(_)));
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[test]
fn test_session_states_expose_tokens_only_when_ready() {
    let token = CsrfToken::from_cookie_value("\"ajax:42\"");
    let ready = SessionState::Ready(token.clone());
    let pending = SessionState::ChallengePending(
        ChallengePayload::from_body(r#"{"challenge_url":"https://x/checkpoint"}"#).unwrap(),
    );

    assert_eq!(SessionState::default().label(), "no_token");
    assert_eq!(ready.token(), Some(&token));
    assert_eq!(pending.token(), None);
    assert_eq!(token.as_str(), "ajax:42");
}

#[test]
fn test_error_serializes_with_type_tag() {
    let value = serde_json::to_value(VoyagerError::Timeout("slow".into())).unwrap();
    assert_eq!(value, json!({"type": "Timeout", "message": "slow"}));
}

// ============================================================================
// Email lookup URL handling
// ============================================================================

#[test]
fn test_people_redirect_yields_handle() {
    let url = parse_profile_url_from_redirect("https://www.linkedin.com/people/jane_doe?trk=x")
        .expect("people redirect is a profile");
    assert!(url.starts_with("https://linkedin.com/in/"));
    assert!(extract_handle_from_profile_url(&url).is_some());
}
