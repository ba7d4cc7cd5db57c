//! Integration tests for `ProfileFetcher` against wiremock credential store
//! and scraping provider mocks.

use careerlens_scraper::{
    extract_name, CredentialSource, CredentialStoreConfig, ProfileFetcher, ScraperConfig,
    ScraperError,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const PROFILE_URL: &str = "https://www.linkedin.com/in/ana-silva";
const ACTOR_PATH: &str = "/v2/acts/profile-scraper/run-sync-get-dataset-items";

fn test_fetcher(base_url: &str) -> ProfileFetcher {
    fetcher_with_attempts(base_url, 3)
}

fn fetcher_with_attempts(base_url: &str, max_attempts: u32) -> ProfileFetcher {
    let store = CredentialStoreConfig {
        base_url: base_url.to_owned(),
        project_id: "test-project".to_owned(),
        api_key: None,
        collection: "linkedin_cookies".to_owned(),
        timeout_secs: 5,
    };
    let credentials =
        CredentialSource::from_config(&store).expect("store client construction should not fail");
    let config = ScraperConfig {
        endpoint: format!("{base_url}{ACTOR_PATH}"),
        api_token: "apify-token".to_owned(),
        timeout_secs: 5,
        max_attempts,
    };
    ProfileFetcher::new(config, credentials).expect("fetcher construction should not fail")
}

fn store_listing(sets: &[(&str, &str)]) -> serde_json::Value {
    let fields: serde_json::Map<String, serde_json::Value> = sets
        .iter()
        .map(|(label, raw)| ((*label).to_owned(), json!({ "stringValue": raw })))
        .collect();
    json!({
        "documents": [{
            "name": "projects/test-project/databases/(default)/documents/linkedin_cookies/batch",
            "fields": fields
        }]
    })
}

async fn mount_store(server: &MockServer, listing: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path_regex(r"/documents/linkedin_cookies$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(server)
        .await;
}

#[tokio::test]
async fn first_shape_success_stops_immediately() {
    let server = MockServer::start().await;
    mount_store(
        &server,
        store_listing(&[(
            "ana@example.com",
            r#"{"name":"li_at","value":"AQED","domain":".linkedin.com"}"#,
        )]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(ACTOR_PATH))
        .and(query_param("token", "apify-token"))
        .and(body_partial_json(json!({ "input": { "urls": [PROFILE_URL] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "firstName": "Ana", "lastName": "Silva", "headline": "Dev" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server.uri());
    let profile = fetcher.fetch(PROFILE_URL).await.expect("fetch should succeed");

    assert!(profile.as_value().is_array(), "items are unwrapped to sequence form");
    assert_eq!(extract_name(profile.as_value()), "Ana Silva");
}

#[tokio::test]
async fn implausible_body_advances_to_next_shape() {
    let server = MockServer::start().await;
    mount_store(
        &server,
        store_listing(&[("ana@example.com", r#"[{"name":"li_at","value":"AQED"}]"#)]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(ACTOR_PATH))
        .and(body_partial_json(json!({ "input": { "urls": [PROFILE_URL] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ACTOR_PATH))
        .and(body_partial_json(json!({ "input": { "profileUrls": [PROFILE_URL] } })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "firstName": "Ana", "lastName": "Silva" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ACTOR_PATH))
        .and(body_partial_json(json!({ "urls": [PROFILE_URL] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "firstName": "x" }])))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server.uri());
    let profile = fetcher.fetch(PROFILE_URL).await.expect("fetch should succeed");

    assert_eq!(profile.as_value()["firstName"], "Ana");
}

#[tokio::test]
async fn provider_failures_cap_at_nine_calls() {
    let server = MockServer::start().await;
    mount_store(
        &server,
        store_listing(&[
            ("a@example.com", r#"{"name":"li_at","value":"one"}"#),
            ("b@example.com", r#"{"name":"li_at","value":"two"}"#),
        ]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(ACTOR_PATH))
        .respond_with(
            ResponseTemplate::new(402)
                .set_body_json(json!({ "error": { "type": "not-enough-usage" } })),
        )
        .expect(9)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server.uri());
    let err = fetcher
        .fetch(PROFILE_URL)
        .await
        .expect_err("every call fails");

    assert!(
        matches!(err, ScraperError::ProfileFetchExhausted { attempts: 3, .. }),
        "got {err:?}"
    );
    let (status, body) = err.provider_details().expect("provider details kept");
    assert_eq!(status, 402);
    assert_eq!(body["error"]["type"], "not-enough-usage");
}

#[tokio::test]
async fn empty_credential_store_exhausts_without_provider_calls() {
    let server = MockServer::start().await;
    mount_store(&server, json!({})).await;

    Mock::given(method("POST"))
        .and(path(ACTOR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{}])))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server.uri());
    let err = fetcher
        .fetch(PROFILE_URL)
        .await
        .expect_err("no credentials");

    match err {
        ScraperError::ProfileFetchExhausted {
            attempts,
            last_error: Some(last),
        } => {
            assert_eq!(attempts, 3);
            assert!(last.is_credential_failure(), "got {last:?}");
        }
        other => panic!("expected ProfileFetchExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_items_beside_profile_fields_keeps_the_profile() {
    let server = MockServer::start().await;
    mount_store(
        &server,
        store_listing(&[("ana@example.com", r#"{"name":"li_at","value":"AQED"}"#)]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(ACTOR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "firstName": "Ana",
            "lastName": "Silva"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server.uri());
    let profile = fetcher.fetch(PROFILE_URL).await.expect("fetch should succeed");

    assert!(profile.as_value().is_object());
    assert_eq!(extract_name(profile.as_value()), "Ana Silva");
}

fn sends_cookie(value: &'static str) -> impl Fn(&Request) -> bool + Send + Sync + 'static {
    let needle = format!(r#""value":"{value}""#);
    move |request: &Request| String::from_utf8_lossy(&request.body).contains(&needle)
}

#[tokio::test]
async fn second_attempt_uses_a_different_credential_set() {
    let server = MockServer::start().await;
    mount_store(
        &server,
        store_listing(&[
            ("a@example.com", r#"{"name":"li_at","value":"cookie-one"}"#),
            ("b@example.com", r#"{"name":"li_at","value":"cookie-two"}"#),
        ]),
    )
    .await;

    // Each set gets exactly one attempt: three payload shapes.
    for value in ["cookie-one", "cookie-two"] {
        Mock::given(method("POST"))
            .and(path(ACTOR_PATH))
            .and(sends_cookie(value))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({ "error": value })))
            .expect(3)
            .mount(&server)
            .await;
    }

    let fetcher = fetcher_with_attempts(&server.uri(), 2);
    let err = fetcher
        .fetch(PROFILE_URL)
        .await
        .expect_err("every call fails");

    assert!(
        matches!(err, ScraperError::ProfileFetchExhausted { attempts: 2, .. }),
        "got {err:?}"
    );
    server.verify().await;
}
