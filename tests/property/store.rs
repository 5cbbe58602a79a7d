//! Store state invariants: whatever mix of successes and failures runs,
//! `loading` is false afterwards and `error` reflects the last operation.

use brandkit_connectivity::{ConnectivityConfig, ConnectivityMonitor};
use brandkit_core::ClientError;
use brandkit_gateway::{
    Gateway, GatewayConfig, MemoryStorage, RemoteRequest, RemoteResponse, Session,
    SessionStorage, User,
};
use brandkit_stores::{EntityStore, Keyword, KeywordDraft};
use proptest::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn store(outcomes: Vec<bool>) -> EntityStore<Keyword> {
    let storage = MemoryStorage::new();
    storage
        .store(&Session {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_at: chrono::Utc::now().timestamp() + 3600,
            user: User {
                id: "user-1".into(),
                email: None,
                user_metadata: json!({}),
                created_at: None,
            },
        })
        .unwrap();

    let call = Arc::new(AtomicUsize::new(0));
    let outcomes = Arc::new(outcomes);
    let transport = tower::service_fn(move |req: RemoteRequest| {
        let n = call.fetch_add(1, Ordering::SeqCst);
        let ok = outcomes.get(n).copied().unwrap_or(true);
        let body = req.body.clone();
        async move {
            if !ok {
                return Ok::<_, ClientError>(RemoteResponse::json(
                    409,
                    &json!({"code": "23505", "message": "duplicate key"}),
                ));
            }
            let mut row: serde_json::Value =
                serde_json::from_slice(body.as_deref().unwrap_or(&b"{}"[..])).unwrap();
            row["id"] = json!(format!("k{n}"));
            row["created_at"] = json!("2024-03-01T12:00:00Z");
            row["updated_at"] = json!("2024-03-01T12:00:00Z");
            Ok(RemoteResponse::json(201, &row))
        }
    });

    let gateway = Gateway::builder(GatewayConfig::new("https://abc.example.co", "anon").unwrap())
        .monitor(Arc::new(ConnectivityMonitor::new(
            || async { true },
            ConnectivityConfig::default(),
        )))
        .session_storage(storage)
        .self_check_on_start(false)
        .transport(transport)
        .build();
    EntityStore::new(gateway)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn flags_settle_after_any_sequence(outcomes in prop::collection::vec(any::<bool>(), 1..12)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let expected_items = outcomes.iter().filter(|ok| **ok).count();
        let last_ok = *outcomes.last().unwrap();

        let snapshot = rt.block_on(async {
            let store = store(outcomes.clone());
            for i in 0..outcomes.len() {
                let _ = store
                    .create(KeywordDraft {
                        keyword: format!("kw{i}"),
                        search_volume: 1,
                        trend_score: 1,
                    })
                    .await;
            }
            store.snapshot()
        });

        prop_assert!(!snapshot.loading);
        prop_assert_eq!(snapshot.data.len(), expected_items);
        prop_assert_eq!(snapshot.error.is_none(), last_ok);
    }
}
