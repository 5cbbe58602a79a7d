use brandkit_core::ClientError;
use brandkit_retry::RetryLayer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::{Layer, ServiceExt};

#[tokio::test(start_paused = true)]
async fn retry_events_carry_number_and_delay() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    let exhausted = Arc::new(AtomicUsize::new(0));
    let e = Arc::clone(&exhausted);

    let layer = RetryLayer::<ClientError>::builder()
        .max_retries(3)
        .linear_backoff(Duration::from_secs(1))
        .on_retry(move |retry, delay| s.lock().unwrap().push((retry, delay)))
        .on_error(move |attempts| e.store(attempts, Ordering::SeqCst))
        .build();

    let svc = tower::service_fn(|_req: ()| async {
        Err::<(), _>(ClientError::Transient("reset".into()))
    });
    let _ = layer.layer(svc).oneshot(()).await;

    assert_eq!(
        *seen.lock().unwrap(),
        [
            (1, Duration::from_secs(1)),
            (2, Duration::from_secs(2)),
            (3, Duration::from_secs(3))
        ]
    );
    assert_eq!(exhausted.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn success_reports_attempts_and_ignored_errors_fire_once() {
    let successes = Arc::new(AtomicUsize::new(0));
    let s = Arc::clone(&successes);
    let ignored = Arc::new(AtomicUsize::new(0));
    let i = Arc::clone(&ignored);

    let layer = RetryLayer::<ClientError>::builder()
        .retry_on(ClientError::is_transient)
        .on_success(move |attempts| s.store(attempts, Ordering::SeqCst))
        .on_ignored_error(move || {
            i.fetch_add(1, Ordering::SeqCst);
        })
        .build();

    let ok = tower::service_fn(|_req: ()| async { Ok::<_, ClientError>(()) });
    layer.layer(ok).oneshot(()).await.unwrap();
    assert_eq!(successes.load(Ordering::SeqCst), 1);

    let offline = tower::service_fn(|_req: ()| async { Err::<(), _>(ClientError::Offline) });
    let _ = layer.layer(offline).oneshot(()).await;
    assert_eq!(ignored.load(Ordering::SeqCst), 1);
}
