//! Integration tests for resource operations
//!
//! **Coverage:**
//! - Profile fan-out: secondary failures degrade, primary failures propagate
//! - Search: default page size cap, facet encoding, empty result on failure
//! - Company and group lookups with their empty fallbacks
//! - Email to profile URL resolution through redirects

#[path = "support.rs"]
mod support;

use serde_json::{json, Value};
use support::{api_path, HarnessBuilder, LOOKUP_PATH};
use voyager_core::search::SearchVertical;
use voyager_domain::{QueryMap, QueryValue};
use voyager_infra::api::{ApiError, FailurePolicy};
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "ajax:seed";

fn profile_view() -> Value {
    json!({
        "profile": {
            "firstName": "Jane",
            "lastName": "Doe",
            "headline": "Engineer at Acme",
            "miniProfile": {"publicIdentifier": "jane-doe", "occupation": "Engineer at Acme"}
        },
        "positionView": {"elements": [{
            "companyName": "Acme",
            "title": "Staff Engineer",
            "timePeriod": {"startDate": {"year": 2020, "month": 3}}
        }]},
        "educationView": {"elements": [{
            "schoolName": "State University",
            "degreeName": "BSc",
            "timePeriod": {"startDate": {"year": 2010}, "endDate": {"year": 2014}}
        }]}
    })
}

async fn mount_profile_resource(server: &MockServer, segment: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(api_path(&format!("identity/profiles/jane-doe/{segment}"))))
        .and(header("csrf-token", TOKEN))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_full_profile(server: &MockServer, skills: ResponseTemplate) {
    mount_profile_resource(server, "profileView", ResponseTemplate::new(200).set_body_json(profile_view())).await;
    mount_profile_resource(
        server,
        "profileContactInfo",
        ResponseTemplate::new(200).set_body_json(json!({"emailAddress": "jane@example.com"})),
    )
    .await;
    mount_profile_resource(server, "highlights", ResponseTemplate::new(200).set_body_json(json!({})))
        .await;
    mount_profile_resource(server, "skills", skills).await;
    mount_profile_resource(
        server,
        "positionGroups",
        ResponseTemplate::new(200).set_body_json(json!({"data": {"element": {"groups": []}}})),
    )
    .await;
}

#[tokio::test]
async fn full_profile_merges_all_resources() {
    let server = MockServer::start().await;
    mount_full_profile(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"skillView": {"elements": [{"name": "Rust"}, {"name": "Go"}]}})),
    )
    .await;
    let harness = HarnessBuilder::new(&server).with_session(TOKEN).build();

    let resume = harness.client.fetch_profile("jane-doe").await.expect("profile");

    assert_eq!(resume["basics"]["name"], "Jane Doe");
    assert_eq!(resume["basics"]["email"], "jane@example.com");
    assert_eq!(resume["skills"], json!([{"name": "Rust"}, {"name": "Go"}]));
    assert_eq!(resume["meta"]["identifier"], "jane-doe");
    assert_eq!(harness.pacer.calls(), 5);

    let requests = server.received_requests().await.unwrap();
    let skills = requests
        .iter()
        .find(|request| request.url.path().ends_with("/skills"))
        .expect("skills request");
    assert_eq!(skills.url.query(), Some("count=49&start=0"));
}

#[tokio::test]
async fn failing_secondary_resource_degrades_the_profile() {
    let server = MockServer::start().await;
    mount_full_profile(&server, ResponseTemplate::new(500).set_body_string("{}")).await;
    let harness = HarnessBuilder::new(&server).with_session(TOKEN).build();

    let resume = harness.client.fetch_profile("jane-doe").await.expect("degraded profile");

    assert_eq!(resume["work"][0]["name"], "Acme");
    assert_eq!(resume["work"][0]["position"], "Staff Engineer");
    assert_eq!(resume["education"][0]["institution"], "State University");
    assert_eq!(resume["skills"], json!([]));
    assert_eq!(resume["basics"]["occupation"], "Staff Engineer");
}

#[tokio::test]
async fn propagate_policy_surfaces_secondary_failures() {
    let server = MockServer::start().await;
    mount_full_profile(&server, ResponseTemplate::new(500).set_body_string("{}")).await;
    let harness = HarnessBuilder::new(&server).with_session(TOKEN).build();

    let err = harness
        .client
        .resources()
        .with_policy(FailurePolicy::Propagate)
        .fetch_profile("jane-doe", false)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::AuthOrTransport { status: 500, .. }));
}

#[tokio::test]
async fn failing_primary_view_fails_the_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("identity/profiles/jane-doe/profileView")))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"status\":404}"))
        .mount(&server)
        .await;
    let harness = HarnessBuilder::new(&server).with_session(TOKEN).build();

    let err = harness.client.fetch_profile_light("jane-doe").await.unwrap_err();

    assert_eq!(err.response().map(|(status, _)| status), Some(404));
}

#[tokio::test]
async fn light_profile_fetches_only_the_primary_view() {
    let server = MockServer::start().await;
    mount_profile_resource(&server, "profileView", ResponseTemplate::new(200).set_body_json(profile_view()))
        .await;
    let harness = HarnessBuilder::new(&server).with_session(TOKEN).build();

    let resume = harness.client.fetch_profile_light("jane-doe").await.unwrap();

    assert_eq!(resume["basics"]["name"], "Jane Doe");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_profile_identifier_is_rejected() {
    let server = MockServer::start().await;
    let harness = HarnessBuilder::new(&server).with_session(TOKEN).build();

    let err = harness.client.fetch_profile("  ").await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidArgument(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn people_search_caps_page_size_and_tags_facets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("search/hits")))
        .and(header("accept", "application/vnd.linkedin.normalized+json+2.1"))
        .and(query_param("count", "49"))
        .and(query_param("guides", "List(v->PEOPLE)"))
        .and(query_param("keywords", "rust"))
        .and(query_param("q", "guided"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"elements": []}})))
        .expect(1)
        .mount(&server)
        .await;
    let harness = HarnessBuilder::new(&server)
        .with_session(TOKEN)
        .with_config(|config| config.max_search_count = 200)
        .build();
    let mut overrides = QueryMap::new();
    overrides.insert("keywords".into(), QueryValue::scalar("rust"));

    let result = harness.client.resources().search_profiles(overrides).await.unwrap();

    assert_eq!(result, json!({"data": {"elements": []}}));
    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default();
    assert!(query.starts_with("guides=List%28v-%3EPEOPLE%29&"), "lists lead: {query}");
    assert!(query.contains("decoration=(trackingId,hitInfo("), "scalar parens stay literal: {query}");
}

#[tokio::test]
async fn caller_count_and_filters_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("search/blended")))
        .and(query_param("count", "10"))
        .and(query_param("filters", "List(industry->4,resultType->COMPANIES)"))
        .and(query_param("origin", "FACETED_SEARCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"elements": [1]})))
        .expect(1)
        .mount(&server)
        .await;
    let harness = HarnessBuilder::new(&server).with_session(TOKEN).build();
    let mut overrides = QueryMap::new();
    overrides.insert("count".into(), QueryValue::scalar(10));
    overrides.insert("filters".into(), QueryValue::list(["industry->4"]));

    let result = harness.client.resources().search_companies_extended(overrides).await.unwrap();

    assert_eq!(result, json!({"elements": [1]}));
}

#[tokio::test]
async fn failed_search_resolves_to_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("search/hits")))
        .respond_with(ResponseTemplate::new(500).set_body_string("{}"))
        .mount(&server)
        .await;
    let harness = HarnessBuilder::new(&server).with_session(TOKEN).build();

    let result = harness.client.search(SearchVertical::Groups, QueryMap::new()).await.unwrap();

    assert_eq!(result, json!([]));
}

#[tokio::test]
async fn company_lookup_normalizes_elements() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("organization/companies")))
        .and(query_param("q", "universalName"))
        .and(query_param("universalName", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"elements": [{
            "name": "Acme",
            "universalName": "acme",
            "entityUrn": "urn:li:fs_normalized_company:1234",
            "companyPageUrl": "https://www.acme.example.com/about"
        }]})))
        .expect(1)
        .mount(&server)
        .await;
    let harness = HarnessBuilder::new(&server).with_session(TOKEN).build();

    let companies = harness.client.fetch_company("acme").await.unwrap();

    assert_eq!(companies[0]["name"], "Acme");
    assert_eq!(companies[0]["companyId"], "1234");
    assert_eq!(companies[0]["source"], "linkedin");
}

#[tokio::test]
async fn failed_company_and_group_lookups_resolve_to_empty_objects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{}"))
        .mount(&server)
        .await;
    let harness = HarnessBuilder::new(&server).with_session(TOKEN).build();

    assert_eq!(harness.client.fetch_company("nobody").await.unwrap(), json!({}));
    assert_eq!(harness.client.fetch_group("42").await.unwrap(), json!({}));

    let strict = harness.client.resources().with_policy(FailurePolicy::Propagate);
    assert!(strict.fetch_group("42").await.is_err());
}

#[tokio::test]
async fn group_lookup_uses_encoded_urn() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("groups/groups/urn%3Ali%3Agroup%3A42")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Rustaceans"})))
        .expect(1)
        .mount(&server)
        .await;
    let harness = HarnessBuilder::new(&server).with_session(TOKEN).build();

    let group = harness.client.fetch_group("42").await.unwrap();

    assert_eq!(group["name"], "Rustaceans");
}

#[tokio::test]
async fn email_lookup_follows_redirect_to_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(format!("^{LOOKUP_PATH}/.+$")))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/in/jane-doe", server.uri()).as_str()),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/in/jane-doe"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Jane Doe</html>"))
        .mount(&server)
        .await;
    let harness = HarnessBuilder::new(&server).build();

    let url = harness.client.profile_url_from_email("jane@example.com").await.unwrap();
    let handle = harness.client.profile_handle_from_email("jane@example.com").await.unwrap();

    assert_eq!(url, format!("{}/in/jane-doe", server.uri()));
    assert_eq!(handle, "jane-doe");
    let first = &server.received_requests().await.unwrap()[0];
    assert!(first.url.path().ends_with("/jane%40example.com"));
}

#[tokio::test]
async fn email_lookup_without_profile_redirect_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(format!("^{LOOKUP_PATH}/.+$")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>no match</html>"))
        .mount(&server)
        .await;
    let harness = HarnessBuilder::new(&server).build();

    let err = harness.client.profile_url_from_email("ghost@example.com").await.unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
}
