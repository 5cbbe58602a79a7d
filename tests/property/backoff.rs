//! Linear backoff: the delay before retry `k` is `base × k`, and the total
//! wait of an exhausted call is `base × n(n+1)/2`.

use brandkit_retry::{with_retry, IntervalFunction, LinearBackoff, RetryPolicy};
use proptest::prelude::*;
use std::time::Duration;
use tokio::runtime::Builder;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn delay_is_base_times_retry(base_ms in 1u64..10_000, retry in 1usize..100) {
        let backoff = LinearBackoff::new(Duration::from_millis(base_ms));
        prop_assert_eq!(
            backoff.next_interval(retry),
            Duration::from_millis(base_ms * retry as u64)
        );
    }

    #[test]
    fn delays_never_shrink(base_ms in 0u64..10_000, retry in 1usize..1000) {
        let backoff = LinearBackoff::new(Duration::from_millis(base_ms));
        prop_assert!(backoff.next_interval(retry + 1) >= backoff.next_interval(retry));
    }

    #[test]
    fn exhausted_call_waits_triangular_total(max_retries in 0usize..=6, base_ms in 1u64..2_000) {
        let rt = Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        let elapsed = rt.block_on(async {
            let policy = RetryPolicy::<String>::linear(max_retries, Duration::from_millis(base_ms));
            let start = tokio::time::Instant::now();
            let _: Result<(), _> = with_retry(&policy, || async { Err("down".to_string()) }).await;
            start.elapsed()
        });
        let n = max_retries as u64;
        prop_assert_eq!(elapsed, Duration::from_millis(base_ms * n * (n + 1) / 2));
    }
}
