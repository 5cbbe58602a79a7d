use crate::backoff::{IntervalFunction, LinearBackoff};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Determines whether an error should be retried.
pub type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Policy for retry behavior.
///
/// Combines the retry bound, the interval function (backoff strategy) and the
/// retry predicate (which errors to retry). A policy is immutable once built
/// and holds no per-call state, so one instance can serve any number of
/// concurrent calls.
pub struct RetryPolicy<E> {
    pub(crate) max_retries: usize,
    pub(crate) interval_fn: Arc<dyn IntervalFunction>,
    pub(crate) retry_predicate: Option<RetryPredicate<E>>,
}

impl<E> RetryPolicy<E> {
    /// Creates a new retry policy.
    ///
    /// `max_retries` counts retries only: an always-failing operation is
    /// attempted `max_retries + 1` times.
    pub fn new(max_retries: usize, interval_fn: Arc<dyn IntervalFunction>) -> Self {
        Self {
            max_retries,
            interval_fn,
            retry_predicate: None,
        }
    }

    /// Creates a policy with [`LinearBackoff`].
    pub fn linear(max_retries: usize, base_delay: Duration) -> Self {
        Self::new(max_retries, Arc::new(LinearBackoff::new(base_delay)))
    }

    /// Sets a predicate to determine which errors should be retried.
    pub fn with_retry_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.retry_predicate = Some(Arc::new(predicate));
        self
    }

    /// Returns the maximum number of retries.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Checks if the given error should be retried.
    pub fn should_retry(&self, error: &E) -> bool {
        match &self.retry_predicate {
            Some(predicate) => predicate(error),
            None => true,
        }
    }

    /// Computes the delay before retry number `retry` (1-indexed).
    pub fn next_backoff(&self, retry: usize) -> Duration {
        self.interval_fn.next_interval(retry)
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            interval_fn: Arc::clone(&self.interval_fn),
            retry_predicate: self.retry_predicate.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("has_predicate", &self.retry_predicate.is_some())
            .finish()
    }
}
