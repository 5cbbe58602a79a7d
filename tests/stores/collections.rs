use super::{signed_in, STAMP};
use brandkit_stores::{KeywordPatch, Role, GREETING};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn keyword(id: &str, word: &str, trend: i32) -> Value {
    json!({
        "id": id,
        "user_id": "user-1",
        "keyword": word,
        "search_volume": 100,
        "trend_score": trend,
        "created_at": STAMP,
        "updated_at": STAMP
    })
}

#[tokio::test]
async fn keyword_lifecycle_keeps_cache_in_step() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/market_research"))
        .and(query_param("user_id", "eq.user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([keyword("k1", "tea", 10)])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/market_research"))
        .respond_with(|req: &Request| {
            let mut row: Value = serde_json::from_slice(&req.body).unwrap();
            row["id"] = json!("k2");
            row["created_at"] = json!(STAMP);
            row["updated_at"] = json!(STAMP);
            ResponseTemplate::new(201).set_body_json(row)
        })
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/market_research"))
        .and(query_param("id", "eq.k1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/market_research"))
        .and(query_param("id", "eq.k2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let stores = signed_in(&server).await;
    let research = stores.market_research();
    let mut updates = research.keywords().subscribe();

    research.fetch_keywords().await;
    assert!(updates.has_changed().unwrap());
    updates.mark_unchanged();

    let created = research.add_keyword("coffee", 900, 70).await.unwrap();
    assert_eq!(created.user_id, "user-1");
    assert_eq!(
        research
            .keywords()
            .items()
            .iter()
            .map(|k| k.id.as_str())
            .collect::<Vec<_>>(),
        ["k2", "k1"]
    );

    research
        .keywords()
        .update(
            "k1",
            KeywordPatch {
                trend_score: Some(42),
                ..Default::default()
            },
        )
        .await;
    research.remove_keyword("k2").await;

    let snapshot = research.keywords().snapshot();
    assert_eq!(snapshot.data.len(), 1);
    assert_eq!(snapshot.data[0].trend_score, 42);
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, None);
    assert!(updates.has_changed().unwrap());
}

#[tokio::test]
async fn assistant_answers_locally_and_saves_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/ai_conversations"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    let stores = signed_in(&server).await;

    let reply = stores
        .conversation()
        .ask("What color palette fits a bakery?")
        .await
        .unwrap();

    assert!(reply.contains("#3A86FF"));
    let messages = stores.conversation().messages();
    assert_eq!(messages[0].content, GREETING);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[2].content, reply);
}
