use brandkit_completion::{CompletionAdapter, FallbackEvent};
use brandkit_core::{ClientError, Event};
use std::sync::{Arc, Mutex};

fn recording_adapter(
    result: Result<&'static str, ClientError>,
) -> (CompletionAdapter, Arc<Mutex<Vec<&'static str>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    let adapter = CompletionAdapter::builder(tower::service_fn(move |_prompt: String| {
        let result = result.clone().map(str::to_string);
        async move { result }
    }))
    .on_event(move |event: &FallbackEvent| s.lock().unwrap().push(event.event_type()))
    .build();
    (adapter, seen)
}

#[tokio::test]
async fn success_emits_success() {
    let (adapter, seen) = recording_adapter(Ok("fine"));
    assert_eq!(adapter.generate_response("hi").await, "fine");
    assert_eq!(*seen.lock().unwrap(), ["success"]);
}

#[tokio::test]
async fn quota_emits_applied_and_other_errors_do_not() {
    let (adapter, seen) = recording_adapter(Err(ClientError::QuotaExceeded("429".into())));
    adapter.generate_response("logo").await;
    let quota_events = seen.lock().unwrap().clone();

    let (adapter, seen) = recording_adapter(Err(ClientError::Transient("reset".into())));
    adapter.generate_response("logo").await;
    let transient_events = seen.lock().unwrap().clone();

    assert_eq!(quota_events, ["applied"]);
    assert_eq!(transient_events, ["skipped"]);
}
