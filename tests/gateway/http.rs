use super::builder;
use brandkit_core::ClientError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn table_rows_round_trip_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/projects"))
        .and(query_param("user_id", "eq.user-1"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "p1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = builder(&server.uri(), true).build();
    let rows: Vec<serde_json::Value> = gateway
        .from("projects")
        .eq("user_id", "user-1")
        .order("created_at", false)
        .fetch()
        .await
        .unwrap();

    assert_eq!(rows, vec![json!({"id": "p1"})]);
}

#[tokio::test]
async fn postgrest_error_body_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "42501",
            "message": "new row violates row-level security policy",
            "details": null,
            "hint": null
        })))
        .mount(&server)
        .await;

    let gateway = builder(&server.uri(), true).build();
    let err = gateway
        .from("profiles")
        .insert(&json!({"id": "u"}))
        .execute()
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some("42501"));
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.to_string(), "new row violates row-level security policy");
}

#[tokio::test]
async fn unreachable_host_is_transient() {
    // port 9 (discard) on localhost is expected to refuse connections
    let gateway = builder("http://127.0.0.1:9", true)
        .retry_policy(1, Duration::from_millis(10))
        .build();

    let err = gateway
        .from("projects")
        .fetch::<serde_json::Value>()
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Transient(_)), "got {err:?}");
}
