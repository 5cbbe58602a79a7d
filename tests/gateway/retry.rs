use super::builder;
use brandkit_core::ClientError;
use brandkit_gateway::{RemoteRequest, RemoteResponse};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn transient_failures_use_default_linear_backoff() {
    let sent = Arc::new(AtomicUsize::new(0));
    let delays = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&sent);
    let d = Arc::clone(&delays);

    let gateway = builder("https://abc.example.co", true)
        .transport(tower::service_fn(move |_req: RemoteRequest| {
            s.fetch_add(1, Ordering::SeqCst);
            async { Err::<RemoteResponse, _>(ClientError::Transient("connection reset".into())) }
        }))
        .on_retry(move |_, delay| d.lock().unwrap().push(delay))
        .build();

    let start = Instant::now();
    let result: Result<Vec<serde_json::Value>, _> = gateway.from("projects").fetch().await;

    assert!(result.unwrap_err().is_transient());
    assert_eq!(sent.load(Ordering::SeqCst), 4);
    assert_eq!(
        *delays.lock().unwrap(),
        [
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(3)
        ]
    );
    assert_eq!(start.elapsed(), Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn recovers_after_one_transient_failure() {
    let sent = Arc::new(AtomicUsize::new(0));
    let s = Arc::clone(&sent);

    let gateway = builder("https://abc.example.co", true)
        .transport(tower::service_fn(move |_req: RemoteRequest| {
            let attempt = s.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(ClientError::Transient("timeout".into()))
                } else {
                    Ok(RemoteResponse::json(200, &json!([{"id": "p1"}])))
                }
            }
        }))
        .build();

    let rows: Vec<serde_json::Value> = gateway.from("projects").fetch().await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(sent.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn rejected_status_is_not_retried() {
    let sent = Arc::new(AtomicUsize::new(0));
    let s = Arc::clone(&sent);

    let gateway = builder("https://abc.example.co", true)
        .transport(tower::service_fn(move |_req: RemoteRequest| {
            s.fetch_add(1, Ordering::SeqCst);
            async {
                Ok::<_, ClientError>(RemoteResponse::json(
                    503,
                    &json!({"message": "service unavailable"}),
                ))
            }
        }))
        .build();

    let err = gateway
        .from("projects")
        .fetch::<serde_json::Value>()
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(sent.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn custom_policy_bounds_attempts() {
    let sent = Arc::new(AtomicUsize::new(0));
    let s = Arc::clone(&sent);

    let gateway = builder("https://abc.example.co", true)
        .retry_policy(1, Duration::from_millis(100))
        .transport(tower::service_fn(move |_req: RemoteRequest| {
            s.fetch_add(1, Ordering::SeqCst);
            async { Err::<RemoteResponse, _>(ClientError::Transient("reset".into())) }
        }))
        .build();

    let start = Instant::now();
    let _ = gateway.from("projects").fetch::<serde_json::Value>().await;

    assert_eq!(sent.load(Ordering::SeqCst), 2);
    assert_eq!(start.elapsed(), Duration::from_millis(100));
}
