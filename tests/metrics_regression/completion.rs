//! Completion fallback metrics regression tests

use super::helpers::*;
use brandkit_completion::CompletionAdapter;
use brandkit_core::ClientError;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn fallback_outcomes_are_counted() {
    init_recorder();

    let quota = CompletionAdapter::builder(tower::service_fn(|_: String| async {
        Err::<String, _>(ClientError::QuotaExceeded("429".into()))
    }))
    .build();
    quota.generate_response("logo").await;

    let broken = CompletionAdapter::builder(tower::service_fn(|_: String| async {
        Err::<String, _>(ClientError::Unknown("boom".into()))
    }))
    .build();
    broken.generate_response("logo").await;

    assert_counter_exists("completion_calls_total");
    assert_metric_has_label("completion_calls_total", "fallback", "completion");
    assert_metric_has_label("completion_calls_total", "result", "applied");
    assert_metric_has_label("completion_calls_total", "result", "skipped");
}
