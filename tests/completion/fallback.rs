use super::adapter;
use brandkit_completion::{respond, Topic, APOLOGY};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn remote_reply_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 1000,
            "messages": [{"role": "system"}, {"role": "user", "content": "Name my bakery"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Crumb & Co."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = adapter(&server).generate_response("Name my bakery").await;

    assert_eq!(reply, "Crumb & Co.");
}

#[tokio::test]
async fn rate_limit_falls_back_to_local_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached", "type": "requests"}
        })))
        .mount(&server)
        .await;

    let reply = adapter(&server)
        .generate_response("Suggest a color palette for my brand")
        .await;

    assert!(reply.contains("Primary: #3A86FF (Blue)"));
    assert_eq!(reply, Topic::Palette.answer());
}

#[tokio::test]
async fn insufficient_quota_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "message": "You exceeded your current quota",
                "type": "insufficient_quota",
                "code": "insufficient_quota"
            }
        })))
        .mount(&server)
        .await;

    let reply = adapter(&server).generate_response("Draft a tagline").await;

    assert_eq!(reply, respond("Draft a tagline"));
    assert_eq!(Topic::classify("Draft a tagline"), Topic::Messaging);
}

#[tokio::test]
async fn server_error_yields_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let reply = adapter(&server).generate_response("Suggest a color palette").await;

    assert_eq!(reply, APOLOGY);
}

#[tokio::test]
async fn empty_choices_yield_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    assert_eq!(adapter(&server).generate_response("hi").await, APOLOGY);
}

#[tokio::test]
async fn unreachable_api_yields_apology() {
    let adapter = brandkit_completion::CompletionAdapter::new(
        brandkit_completion::CompletionConfig::builder("sk-test")
            .base_url("http://127.0.0.1:9")
            .build(),
    );

    assert_eq!(adapter.generate_response("logo ideas").await, APOLOGY);
}
