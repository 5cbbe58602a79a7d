use super::{signed_in, stores};
use brandkit_core::ClientError;
use brandkit_stores::ProjectDraft;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn signed_out_writes_never_reach_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let stores = stores(&server);

    let err = stores
        .projects()
        .create_project(ProjectDraft {
            title: "Launch".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::NotAuthenticated);

    let err = stores
        .market_research()
        .add_keyword("coffee", 10, 5)
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::NotAuthenticated);

    let keywords = stores.market_research().keywords();
    assert_eq!(keywords.error().as_deref(), Some("Not authenticated"));
    assert!(!keywords.loading());
    assert!(keywords.items().is_empty());
}

#[tokio::test]
async fn sign_in_uses_new_token_for_store_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/projects"))
        .and(wiremock::matchers::header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let stores = signed_in(&server).await;

    assert_eq!(
        stores.auth().user().and_then(|u| u.email).as_deref(),
        Some("ada@example.com")
    );
    stores.projects().fetch_projects().await;
    assert_eq!(stores.projects().projects().error(), None);
}

#[tokio::test]
async fn sign_out_restores_precondition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let stores = signed_in(&server).await;

    stores.auth().sign_out().await.unwrap();

    assert_eq!(stores.auth().user(), None);
    stores.profile().fetch_profile().await;
    assert_eq!(stores.profile().error().as_deref(), Some("Not authenticated"));
}
