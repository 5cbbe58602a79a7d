//! Invariants of the retry executor:
//! - an always-failing operation is attempted exactly `max_retries + 1` times
//! - success on attempt `n` stops after `n` attempts
//! - a rejected error is never retried

use brandkit_core::ClientError;
use brandkit_retry::{with_retry, RetryPolicy};
use proptest::prelude::*;
use std::time::Duration;
use tokio::runtime::Builder;

fn runtime() -> tokio::runtime::Runtime {
    Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn attempts_are_max_retries_plus_one(max_retries in 0usize..=8) {
        let attempts = runtime().block_on(async {
            let policy = RetryPolicy::<ClientError>::linear(max_retries, Duration::from_secs(1));
            let mut attempts = 0usize;
            let _: Result<(), _> = with_retry(&policy, || {
                attempts += 1;
                async { Err(ClientError::Transient("reset".into())) }
            })
            .await;
            attempts
        });
        prop_assert_eq!(attempts, max_retries + 1);
    }

    #[test]
    fn success_stops_retrying(max_retries in 1usize..=8, succeed_on in 1usize..=9) {
        let (result, attempts) = runtime().block_on(async {
            let policy = RetryPolicy::<ClientError>::linear(max_retries, Duration::from_millis(5));
            let mut attempts = 0usize;
            let result = with_retry(&policy, || {
                attempts += 1;
                let outcome = if attempts >= succeed_on {
                    Ok(attempts)
                } else {
                    Err(ClientError::Transient("reset".into()))
                };
                async move { outcome }
            })
            .await;
            (result, attempts)
        });

        if succeed_on <= max_retries + 1 {
            prop_assert_eq!(result, Ok(succeed_on));
            prop_assert_eq!(attempts, succeed_on);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(attempts, max_retries + 1);
        }
    }

    #[test]
    fn rejected_errors_are_attempted_once(max_retries in 0usize..=8, status in 400u16..600) {
        let attempts = runtime().block_on(async {
            let policy = RetryPolicy::<ClientError>::linear(max_retries, Duration::from_secs(1))
                .with_retry_predicate(ClientError::is_transient);
            let mut attempts = 0usize;
            let _: Result<(), _> = with_retry(&policy, || {
                attempts += 1;
                async move { Err(ClientError::rejected(status, "no")) }
            })
            .await;
            attempts
        });
        prop_assert_eq!(attempts, 1);
    }
}
