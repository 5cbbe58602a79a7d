//! Bounded retry with linear backoff.
//!
//! Two entry points share one algorithm:
//!
//! - [`with_retry`]: a higher-order function wrapping any async operation
//! - [`RetryLayer`]: Tower middleware that retries a service call per request
//!
//! An operation that keeps failing is attempted `max_retries + 1` times. The
//! delay before retry `k` is `base_delay × k`, so with the defaults (3 retries,
//! 1 second base) the waits are 1 s, 2 s and 3 s. When retries are exhausted
//! the last error is returned unchanged.
//!
//! The retry counter lives on the stack of each call. Two concurrent calls
//! sharing the same [`RetryPolicy`] never consume each other's budget.
//!
//! # Examples
//!
//! ```
//! use brandkit_retry::{with_retry, RetryPolicy};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), std::io::Error> {
//! let policy = RetryPolicy::linear(3, Duration::from_secs(1));
//!
//! let body = with_retry(&policy, || async {
//!     Ok::<_, std::io::Error>("pong".to_string())
//! })
//! .await?;
//! assert_eq!(body, "pong");
//! # Ok(())
//! # }
//! ```

mod backoff;
mod config;
mod events;
mod layer;
mod policy;

pub use backoff::{FixedInterval, IntervalFunction, LinearBackoff};
pub use config::{RetryConfig, RetryConfigBuilder, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};
pub use events::RetryEvent;
pub use layer::RetryLayer;
pub use policy::{RetryPolicy, RetryPredicate};

use brandkit_core::EventListeners;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Service, ServiceExt};

#[cfg(feature = "metrics")]
use metrics::counter;

/// Runs `operation`, retrying failures according to `policy`.
///
/// Returns the first success, or the last error once the policy gives up
/// (predicate rejected the error, or `max_retries` retries were made).
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy<E>, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    run(policy, &EventListeners::new(), "with_retry", operation).await
}

pub(crate) async fn run<T, E, F, Fut>(
    policy: &RetryPolicy<E>,
    listeners: &EventListeners<RetryEvent>,
    name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut retries = 0usize;

    loop {
        match operation().await {
            Ok(value) => {
                #[cfg(feature = "metrics")]
                counter!("retry_calls_total", "retry" => name.to_string(), "result" => "success")
                    .increment(1);

                listeners.emit(&RetryEvent::Success {
                    source: name.to_string(),
                    timestamp: Instant::now(),
                    attempts: retries + 1,
                });
                return Ok(value);
            }
            Err(error) => {
                if !policy.should_retry(&error) {
                    tracing::debug!(retry = name, %error, "error is not retryable");

                    #[cfg(feature = "metrics")]
                    counter!("retry_calls_total", "retry" => name.to_string(), "result" => "ignored")
                        .increment(1);

                    listeners.emit(&RetryEvent::IgnoredError {
                        source: name.to_string(),
                        timestamp: Instant::now(),
                    });
                    return Err(error);
                }

                if retries >= policy.max_retries {
                    tracing::warn!(
                        retry = name,
                        attempts = retries + 1,
                        %error,
                        "retries exhausted"
                    );

                    #[cfg(feature = "metrics")]
                    counter!("retry_calls_total", "retry" => name.to_string(), "result" => "exhausted")
                        .increment(1);

                    listeners.emit(&RetryEvent::Error {
                        source: name.to_string(),
                        timestamp: Instant::now(),
                        attempts: retries + 1,
                    });
                    return Err(error);
                }

                retries += 1;
                let delay = policy.next_backoff(retries);
                tracing::warn!(
                    retry = name,
                    attempt = retries,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    %error,
                    "retrying after backoff"
                );

                listeners.emit(&RetryEvent::Retry {
                    source: name.to_string(),
                    timestamp: Instant::now(),
                    retry: retries,
                    delay,
                });

                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// A Tower [`Service`] that retries failed requests.
///
/// Each attempt runs on a fresh clone of the inner service with a clone of the
/// request, so the request type must be `Clone`.
pub struct Retry<S, E> {
    inner: S,
    config: Arc<RetryConfig<E>>,
}

impl<S, E> Retry<S, E> {
    /// Creates a new `Retry` service wrapping the given service.
    pub fn new(inner: S, config: Arc<RetryConfig<E>>) -> Self {
        Self { inner, config }
    }
}

impl<S, E> Clone for Retry<S, E>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, Req, E> Service<Req> for Retry<S, E>
where
    S: Service<Req, Error = E> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    Req: Clone + Send + 'static,
    E: fmt::Display + Send + Sync + 'static,
{
    type Response = S::Response;
    type Error = E;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // each attempt drives readiness on its own clone
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let service = self.inner.clone();
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            config
                .execute(move || service.clone().oneshot(req.clone()))
                .await
        })
    }
}
