use super::builder;
use brandkit_core::ClientError;
use brandkit_gateway::{RemoteRequest, RemoteResponse};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn offline_fails_fast_without_transport_or_retry() {
    let sent = Arc::new(AtomicUsize::new(0));
    let retries = Arc::new(AtomicUsize::new(0));
    let s = Arc::clone(&sent);
    let r = Arc::clone(&retries);

    let gateway = builder("https://abc.example.co", false)
        .transport(tower::service_fn(move |_req: RemoteRequest| {
            s.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ClientError>(RemoteResponse::new(200, "[]")) }
        }))
        .on_retry(move |_, _| {
            r.fetch_add(1, Ordering::SeqCst);
        })
        .build();

    let start = Instant::now();
    let result: Result<Vec<serde_json::Value>, _> = gateway.from("projects").fetch().await;

    assert_eq!(result, Err(ClientError::Offline));
    assert_eq!(result.unwrap_err().to_string(), "No internet connection");
    assert_eq!(sent.load(Ordering::SeqCst), 0);
    assert_eq!(retries.load(Ordering::SeqCst), 0);
    assert!(start.elapsed() < Duration::from_millis(1));
}

#[tokio::test]
async fn prober_result_gates_each_request() {
    let online = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = Arc::clone(&online);
    let monitor = Arc::new(brandkit_connectivity::ConnectivityMonitor::new(
        move || {
            let up = flag.load(Ordering::SeqCst);
            async move { up }
        },
        brandkit_connectivity::ConnectivityConfig::default(),
    ));
    let gateway = builder("https://abc.example.co", true)
        .monitor(monitor)
        .transport(tower::service_fn(|_req: RemoteRequest| async {
            Ok::<_, ClientError>(RemoteResponse::new(200, "[]"))
        }))
        .build();

    let first: Result<Vec<serde_json::Value>, _> = gateway.from("projects").fetch().await;
    assert_eq!(first, Err(ClientError::Offline));

    online.store(true, Ordering::SeqCst);
    let second: Result<Vec<serde_json::Value>, _> = gateway.from("projects").fetch().await;
    assert_eq!(second, Ok(vec![]));
}
