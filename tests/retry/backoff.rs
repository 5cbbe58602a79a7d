use brandkit_retry::{with_retry, IntervalFunction, LinearBackoff, RetryPolicy};
use std::time::Duration;
use tokio::time::Instant;

#[test]
fn linear_delays_grow_by_base() {
    let backoff = LinearBackoff::new(Duration::from_secs(1));
    let delays: Vec<_> = (1..=3).map(|k| backoff.next_interval(k)).collect();
    assert_eq!(
        delays,
        [
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(3)
        ]
    );
}

#[test]
fn huge_retry_numbers_saturate() {
    let backoff = LinearBackoff::new(Duration::from_secs(u64::MAX / 2));
    assert_eq!(backoff.next_interval(usize::MAX), Duration::MAX);
}

#[tokio::test(start_paused = true)]
async fn exhausted_call_waits_one_two_three_seconds() {
    let policy = RetryPolicy::<String>::linear(3, Duration::from_secs(1));
    let start = Instant::now();

    let result: Result<(), _> = with_retry(&policy, || async { Err("down".to_string()) }).await;

    assert_eq!(result, Err("down".to_string()));
    assert_eq!(start.elapsed(), Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn success_on_second_attempt_waits_once() {
    let policy = RetryPolicy::<String>::linear(3, Duration::from_millis(250));
    let mut attempts = 0;
    let start = Instant::now();

    let result = with_retry(&policy, || {
        attempts += 1;
        let outcome = if attempts < 2 {
            Err("flaky".to_string())
        } else {
            Ok(attempts)
        };
        async move { outcome }
    })
    .await;

    assert_eq!(result, Ok(2));
    assert_eq!(start.elapsed(), Duration::from_millis(250));
}
