//! Retry metrics regression tests

use super::helpers::*;
use brandkit_retry::RetryLayer;
use serial_test::serial;
use std::time::Duration;
use tower::{Layer, ServiceExt};

#[tokio::test]
#[serial]
async fn retry_success_is_counted() {
    init_recorder();

    let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let c = calls.clone();
    let service = tower::service_fn(move |_: u64| {
        let count = c.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        async move {
            if count < 1 {
                Err::<&'static str, _>("failure")
            } else {
                Ok("success")
            }
        }
    });

    let layer = RetryLayer::<&'static str>::builder()
        .name("metrics_retry")
        .max_retries(2)
        .linear_backoff(Duration::from_millis(1))
        .build();
    let _ = layer.layer(service).oneshot(1).await;

    assert_counter_exists("retry_calls_total");
    assert_metric_has_label("retry_calls_total", "retry", "metrics_retry");
    assert_metric_has_label("retry_calls_total", "result", "success");
}

#[tokio::test]
#[serial]
async fn retry_exhausted_and_ignored_are_counted() {
    init_recorder();

    let exhausted = RetryLayer::<&'static str>::builder()
        .name("metrics_exhausted")
        .max_retries(1)
        .linear_backoff(Duration::from_millis(1))
        .build();
    let failing = tower::service_fn(|_: u64| async { Err::<(), _>("failure") });
    let _ = exhausted.layer(failing).oneshot(1).await;
    assert_metric_has_label("retry_calls_total", "result", "exhausted");

    let ignored = RetryLayer::<&'static str>::builder()
        .name("metrics_ignored")
        .retry_on(|_| false)
        .build();
    let failing = tower::service_fn(|_: u64| async { Err::<(), _>("failure") });
    let _ = ignored.layer(failing).oneshot(1).await;
    assert_metric_has_label("retry_calls_total", "result", "ignored");
}
