//! Integration tests for `CredentialSource` against a wiremock document store.

use careerlens_scraper::{CredentialSource, CredentialStoreConfig, ScraperError};
use serde_json::json;
use wiremock::matchers::{method, path_regex, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_source(base_url: &str) -> CredentialSource {
    let config = CredentialStoreConfig {
        base_url: base_url.to_owned(),
        project_id: "test-project".to_owned(),
        api_key: Some("fs-key".to_owned()),
        collection: "linkedin_cookies".to_owned(),
        timeout_secs: 5,
    };
    CredentialSource::from_config(&config).expect("client construction should not fail")
}

fn document(id: &str, label: &str, raw: &str) -> serde_json::Value {
    json!({
        "name": format!("projects/test-project/databases/(default)/documents/linkedin_cookies/{id}"),
        "fields": { label: { "stringValue": raw } }
    })
}

#[tokio::test]
async fn list_all_follows_pagination_and_sends_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/projects/test-project/databases/.+/documents/linkedin_cookies$"))
        .and(query_param("key", "fs-key"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [document("one", "a@example.com", r#"[{"name":"li_at","value":"1"}]"#)],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"/documents/linkedin_cookies$"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [document("two", "b@example.com", r#"{"name":"li_at","value":"2"}"#)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sets = test_source(&server.uri())
        .list_all()
        .await
        .expect("listing should succeed");

    let sources: Vec<&str> = sets.iter().map(|s| s.source.as_str()).collect();
    assert_eq!(sources, vec!["a@example.com", "b@example.com"]);
}

#[tokio::test]
async fn list_all_skips_undecodable_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"/documents/linkedin_cookies$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                document("good", "a@example.com", r#"'{"name":"li_at","value":"1"}'"#),
                document("bad", "b@example.com", "<<corrupted>>")
            ]
        })))
        .mount(&server)
        .await;

    let sets = test_source(&server.uri())
        .list_all()
        .await
        .expect("one eligible record");
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].cookies[0].value, "1");
}

#[tokio::test]
async fn store_error_is_upstream_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"/documents/linkedin_cookies$"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = test_source(&server.uri())
        .random()
        .await
        .expect_err("store is down");
    assert!(matches!(err, ScraperError::UpstreamUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn no_eligible_records_is_upstream_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"/documents/linkedin_cookies$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [document("bad", "b@example.com", "nope")]
        })))
        .mount(&server)
        .await;

    let err = test_source(&server.uri())
        .list_all()
        .await
        .expect_err("nothing decodable");
    assert!(matches!(err, ScraperError::UpstreamUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn next_untried_skips_tried_sets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"/documents/linkedin_cookies$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{
                "name": "projects/test-project/databases/(default)/documents/linkedin_cookies/batch",
                "fields": {
                    "a@example.com": { "stringValue": r#"{"name":"li_at","value":"1"}"# },
                    "b@example.com": { "stringValue": r#"{"name":"li_at","value":"2"}"# }
                }
            }]
        })))
        .mount(&server)
        .await;

    let source = test_source(&server.uri());
    let all = source.list_all().await.expect("two sets");
    let tried: Vec<_> = all
        .iter()
        .filter(|s| s.source == "a@example.com")
        .cloned()
        .collect();

    for _ in 0..5 {
        let next = source.next_untried(&tried).await.expect("one untried left");
        assert_eq!(next.source, "b@example.com");
    }
}
