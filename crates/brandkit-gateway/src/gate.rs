use brandkit_connectivity::ConnectivityMonitor;
use brandkit_core::ClientError;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};

/// A Tower [`Layer`] that probes connectivity before each call and fails with
/// [`ClientError::Offline`] without touching the inner service when the probe
/// reports no network.
///
/// Placed outside the retry layer, so an offline call never consumes a retry.
#[derive(Debug, Clone)]
pub struct OfflineGateLayer {
    monitor: Arc<ConnectivityMonitor>,
}

impl OfflineGateLayer {
    pub fn new(monitor: Arc<ConnectivityMonitor>) -> Self {
        Self { monitor }
    }
}

impl<S> Layer<S> for OfflineGateLayer {
    type Service = OfflineGate<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OfflineGate {
            inner,
            monitor: Arc::clone(&self.monitor),
        }
    }
}

/// Service produced by [`OfflineGateLayer`].
#[derive(Debug, Clone)]
pub struct OfflineGate<S> {
    inner: S,
    monitor: Arc<ConnectivityMonitor>,
}

impl<S, Req> Service<Req> for OfflineGate<S>
where
    S: Service<Req, Error = ClientError> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    Req: Send + 'static,
{
    type Response = S::Response;
    type Error = ClientError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let inner = self.inner.clone();
        let monitor = Arc::clone(&self.monitor);

        Box::pin(async move {
            if !monitor.check_connection().await {
                tracing::warn!("request short-circuited, no internet connection");
                return Err(ClientError::Offline);
            }
            inner.oneshot(req).await
        })
    }
}
