//! Stores driven through a real gateway against a mock backend.
//!
//! - session.rs: sign-in, the authentication precondition, sign-out
//! - collections.rs: collection operations and their observable state

mod collections;
mod session;

use brandkit_completion::CompletionAdapter;
use brandkit_connectivity::{ConnectivityConfig, ConnectivityMonitor};
use brandkit_core::ClientError;
use brandkit_gateway::{Gateway, GatewayConfig, MemoryStorage};
use brandkit_stores::Stores;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub(crate) const STAMP: &str = "2024-03-01T12:00:00Z";

pub(crate) fn stores(server: &MockServer) -> Stores {
    let gateway = Gateway::builder(GatewayConfig::new(server.uri(), "anon-key").unwrap())
        .monitor(Arc::new(ConnectivityMonitor::new(
            || async { true },
            ConnectivityConfig::default(),
        )))
        .session_storage(MemoryStorage::new())
        .self_check_on_start(false)
        .build();
    let adapter = CompletionAdapter::builder(tower::service_fn(|_prompt: String| async {
        Err::<String, _>(ClientError::QuotaExceeded("429".into()))
    }))
    .build();
    Stores::new(gateway, adapter)
}

/// Mount a password grant and the profile check for `user-1`.
pub(crate) async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-1",
            "user": {"id": "user-1", "email": "ada@example.com"}
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-1",
            "email": "ada@example.com",
            "full_name": "Ada",
            "created_at": STAMP,
            "updated_at": STAMP
        })))
        .mount(server)
        .await;
}

pub(crate) async fn signed_in(server: &MockServer) -> Stores {
    mount_sign_in(server).await;
    let stores = stores(server);
    stores
        .auth()
        .sign_in("ada@example.com", "secret")
        .await
        .unwrap();
    stores
}
