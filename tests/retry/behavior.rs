use brandkit_core::ClientError;
use brandkit_retry::{with_retry, RetryLayer, RetryPolicy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::{Layer, ServiceExt};

#[tokio::test(start_paused = true)]
async fn always_failing_call_is_attempted_max_retries_plus_one() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let svc = tower::service_fn(move |_req: ()| {
        c.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>(ClientError::Transient("reset".into())) }
    });

    let layer = RetryLayer::<ClientError>::builder()
        .max_retries(3)
        .linear_backoff(Duration::from_secs(1))
        .build();

    let result = layer.layer(svc).oneshot(()).await;

    assert_eq!(result, Err(ClientError::Transient("reset".into())));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn predicate_stops_retrying() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let svc = tower::service_fn(move |_req: ()| {
        c.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>(ClientError::rejected(400, "bad request")) }
    });

    let layer = RetryLayer::<ClientError>::builder()
        .max_retries(3)
        .linear_backoff(Duration::from_secs(1))
        .retry_on(ClientError::is_transient)
        .build();

    let result = layer.layer(svc).oneshot(()).await;

    assert_eq!(result.unwrap_err().status(), Some(400));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn zero_retries_makes_one_attempt() {
    let policy = RetryPolicy::<ClientError>::linear(0, Duration::from_secs(1));
    let mut attempts = 0;

    let result: Result<(), _> = with_retry(&policy, || {
        attempts += 1;
        async { Err(ClientError::Transient("reset".into())) }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_calls_keep_their_own_budget() {
    let policy = RetryPolicy::<ClientError>::linear(2, Duration::from_millis(10));
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let run = |counter: Arc<AtomicUsize>| {
        let policy = policy.clone();
        async move {
            with_retry(&policy, || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(ClientError::Transient("reset".into())) }
            })
            .await
        }
    };

    let (a, b) = futures::join!(run(Arc::clone(&first)), run(Arc::clone(&second)));

    assert!(a.is_err() && b.is_err());
    assert_eq!(first.load(Ordering::SeqCst), 3);
    assert_eq!(second.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn layer_reused_across_calls_starts_fresh() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let svc = tower::service_fn(move |_req: ()| {
        c.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>(ClientError::Transient("reset".into())) }
    });
    let service = RetryLayer::<ClientError>::builder()
        .max_retries(1)
        .linear_backoff(Duration::from_millis(5))
        .build()
        .layer(svc);

    let _ = service.clone().oneshot(()).await;
    let _ = service.clone().oneshot(()).await;

    assert_eq!(calls.load(Ordering::SeqCst), 4);
}
