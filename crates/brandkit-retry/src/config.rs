use crate::backoff::{FixedInterval, IntervalFunction, LinearBackoff};
use crate::events::RetryEvent;
use crate::policy::{RetryPolicy, RetryPredicate};
use brandkit_core::{EventListeners, FnListener};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Default base delay of the linear backoff.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Configuration for the retry middleware.
pub struct RetryConfig<E> {
    pub(crate) policy: RetryPolicy<E>,
    pub(crate) event_listeners: EventListeners<RetryEvent>,
    pub(crate) name: String,
}

impl<E> RetryConfig<E> {
    /// Creates a new builder.
    pub fn builder() -> RetryConfigBuilder<E> {
        RetryConfigBuilder::new()
    }

    /// Returns the policy used by this configuration.
    pub fn policy(&self) -> &RetryPolicy<E> {
        &self.policy
    }

    /// Returns the instance name reported in events.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `operation` under this configuration, emitting events.
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        crate::run(&self.policy, &self.event_listeners, &self.name, operation).await
    }
}

/// Builder for [`RetryConfig`].
pub struct RetryConfigBuilder<E> {
    max_retries: usize,
    interval_fn: Option<Arc<dyn IntervalFunction>>,
    retry_predicate: Option<RetryPredicate<E>>,
    event_listeners: EventListeners<RetryEvent>,
    name: String,
}

impl<E> Default for RetryConfigBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RetryConfigBuilder<E> {
    /// Creates a new builder with defaults.
    ///
    /// Defaults:
    /// - max_retries: 3
    /// - backoff: linear with a 1 second base delay
    /// - name: `"<unnamed>"`
    pub fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            interval_fn: None,
            retry_predicate: None,
            event_listeners: EventListeners::new(),
            name: "<unnamed>".to_string(),
        }
    }

    /// Sets the maximum number of retries.
    ///
    /// The initial attempt is not counted, so `max_retries(3)` means
    /// 1 initial attempt + up to 3 retries.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets linear backoff: the delay before retry `k` is `base_delay × k`.
    pub fn linear_backoff(mut self, base_delay: Duration) -> Self {
        self.interval_fn = Some(Arc::new(LinearBackoff::new(base_delay)));
        self
    }

    /// Sets a fixed backoff interval.
    pub fn fixed_backoff(mut self, duration: Duration) -> Self {
        self.interval_fn = Some(Arc::new(FixedInterval::new(duration)));
        self
    }

    /// Sets a custom interval function for backoff.
    pub fn backoff<I>(mut self, interval_fn: I) -> Self
    where
        I: IntervalFunction + 'static,
    {
        self.interval_fn = Some(Arc::new(interval_fn));
        self
    }

    /// Sets a predicate to determine which errors should be retried.
    pub fn retry_on<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.retry_predicate = Some(Arc::new(predicate));
        self
    }

    /// Sets the name for this retry instance (used in events and logs).
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked before each retry delay.
    ///
    /// The callback receives the retry number (1 = first retry) and the delay
    /// about to be slept.
    ///
    /// ```rust,no_run
    /// use brandkit_retry::RetryLayer;
    /// use std::time::Duration;
    ///
    /// let layer = RetryLayer::<std::io::Error>::builder()
    ///     .max_retries(3)
    ///     .linear_backoff(Duration::from_secs(1))
    ///     .on_retry(|retry, delay| {
    ///         println!("retry {} in {:?}", retry, delay);
    ///     })
    ///     .build();
    /// ```
    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RetryEvent::Retry { retry, delay, .. } = event {
                f(*retry, *delay);
            }
        }));
        self
    }

    /// Registers a callback invoked when an operation succeeds, with the total
    /// number of attempts it took.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RetryEvent::Success { attempts, .. } = event {
                f(*attempts);
            }
        }));
        self
    }

    /// Registers a callback invoked when all retries are exhausted, with the
    /// total number of attempts made.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RetryEvent::Error { attempts, .. } = event {
                f(*attempts);
            }
        }));
        self
    }

    /// Registers a callback invoked when an error is returned without retry
    /// because the predicate rejected it.
    pub fn on_ignored_error<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, RetryEvent::IgnoredError { .. }) {
                f();
            }
        }));
        self
    }

    /// Builds the configuration without wrapping it in a layer.
    pub fn build_config(self) -> RetryConfig<E> {
        let interval_fn = self
            .interval_fn
            .unwrap_or_else(|| Arc::new(LinearBackoff::new(DEFAULT_BASE_DELAY)));

        let mut policy = RetryPolicy::new(self.max_retries, interval_fn);
        policy.retry_predicate = self.retry_predicate;

        RetryConfig {
            policy,
            event_listeners: self.event_listeners,
            name: self.name,
        }
    }

    /// Builds the retry layer.
    pub fn build(self) -> crate::RetryLayer<E> {
        crate::RetryLayer::new(self.build_config())
    }
}
