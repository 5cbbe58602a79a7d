//! Fallback middleware: substitute a locally computed response for selected
//! errors of the inner service.

use crate::events::FallbackEvent;
use brandkit_core::{EventListeners, FnListener};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service, ServiceExt};

#[cfg(feature = "metrics")]
use metrics::counter;

/// Function that computes a fallback response from the request and the error.
pub type FromRequestErrorFn<Req, Res, E> = Arc<dyn Fn(&Req, &E) -> Res + Send + Sync>;

/// Predicate selecting the errors the fallback handles.
pub type HandlePredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Configuration shared by every service built from one [`FallbackLayer`].
pub struct FallbackConfig<Req, Res, E> {
    name: String,
    from_request_error: Option<FromRequestErrorFn<Req, Res, E>>,
    handle_predicate: Option<HandlePredicate<E>>,
    event_listeners: EventListeners<FallbackEvent>,
}

/// Builder for [`FallbackLayer`].
///
/// Without a fallback function the layer only observes: every error is
/// skipped.
pub struct FallbackConfigBuilder<Req, Res, E> {
    config: FallbackConfig<Req, Res, E>,
}

impl<Req, Res, E> Default for FallbackConfigBuilder<Req, Res, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Res, E> FallbackConfigBuilder<Req, Res, E> {
    pub fn new() -> Self {
        Self {
            config: FallbackConfig {
                name: "fallback".to_string(),
                from_request_error: None,
                handle_predicate: None,
                event_listeners: EventListeners::new(),
            },
        }
    }

    /// Name reported in events, logs and metrics.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Compute the substitute response from the original request and the
    /// handled error.
    pub fn from_request_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&Req, &E) -> Res + Send + Sync + 'static,
    {
        self.config.from_request_error = Some(Arc::new(f));
        self
    }

    /// Only errors matching `predicate` trigger the fallback. Others
    /// propagate unchanged.
    pub fn handle<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.config.handle_predicate = Some(Arc::new(predicate));
        self
    }

    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&FallbackEvent) + Send + Sync + 'static,
    {
        self.config.event_listeners.add(FnListener::new(f));
        self
    }

    pub fn build(self) -> FallbackLayer<Req, Res, E> {
        FallbackLayer {
            config: Arc::new(self.config),
        }
    }
}

/// A Tower layer that applies [`Fallback`] to a service.
pub struct FallbackLayer<Req, Res, E> {
    config: Arc<FallbackConfig<Req, Res, E>>,
}

impl<Req, Res, E> FallbackLayer<Req, Res, E> {
    pub fn builder() -> FallbackConfigBuilder<Req, Res, E> {
        FallbackConfigBuilder::new()
    }
}

impl<Req, Res, E> Clone for FallbackLayer<Req, Res, E> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, Req, Res, E> Layer<S> for FallbackLayer<Req, Res, E> {
    type Service = Fallback<S, Req, Res, E>;

    fn layer(&self, inner: S) -> Self::Service {
        Fallback {
            inner,
            config: Arc::clone(&self.config),
        }
    }
}

/// Service produced by [`FallbackLayer`].
pub struct Fallback<S, Req, Res, E> {
    inner: S,
    config: Arc<FallbackConfig<Req, Res, E>>,
}

impl<S: Clone, Req, Res, E> Clone for Fallback<S, Req, Res, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, Req, Res, E> Service<Req> for Fallback<S, Req, Res, E>
where
    S: Service<Req, Response = Res, Error = E> + Clone + Send + 'static,
    S::Future: Send + 'static,
    Req: Clone + Send + Sync + 'static,
    Res: Clone + Send + Sync + 'static,
    E: std::fmt::Display + Send + Sync + 'static,
{
    type Response = Res;
    type Error = E;
    type Future = BoxFuture<'static, Result<Res, E>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let inner = self.inner.clone();
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let error = match inner.oneshot(req.clone()).await {
                Ok(response) => {
                    record(&config.name, "success");
                    config.event_listeners.emit(&FallbackEvent::Success {
                        source: config.name.clone(),
                        timestamp: Instant::now(),
                    });
                    return Ok(response);
                }
                Err(error) => error,
            };

            let handled = config
                .handle_predicate
                .as_ref()
                .map_or(true, |predicate| predicate(&error));

            let fallback = match &config.from_request_error {
                Some(fallback) if handled => fallback,
                _ => {
                    tracing::debug!(fallback = %config.name, %error, "error not handled by fallback");
                    record(&config.name, "skipped");
                    config.event_listeners.emit(&FallbackEvent::Skipped {
                        source: config.name.clone(),
                        timestamp: Instant::now(),
                    });
                    return Err(error);
                }
            };

            tracing::info!(fallback = %config.name, %error, "serving fallback response");
            let response = fallback(&req, &error);

            record(&config.name, "applied");
            config.event_listeners.emit(&FallbackEvent::Applied {
                source: config.name.clone(),
                timestamp: Instant::now(),
            });
            Ok(response)
        })
    }
}

#[cfg(feature = "metrics")]
fn record(name: &str, result: &'static str) {
    counter!(
        "completion_calls_total",
        "fallback" => name.to_string(),
        "result" => result
    )
    .increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record(_name: &str, _result: &'static str) {}
