use crate::auth::Auth;
use crate::config::GatewayConfig;
use crate::gate::OfflineGateLayer;
use crate::request::{RemoteRequest, RemoteResponse};
use crate::session::{MemoryStorage, Session, SessionStorage};
use crate::storage::Bucket;
use crate::table::TableQuery;
use crate::transport::{BoxTransport, HttpTransport};
use brandkit_connectivity::ConnectivityMonitor;
use brandkit_core::ClientError;
use brandkit_retry::RetryConfigBuilder;
use reqwest::Method;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tower::util::BoxCloneSyncService;
use tower::{Service, ServiceBuilder, ServiceExt};

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter};

/// The single client through which every remote call leaves the process.
///
/// Each request walks the same stack:
///
/// ```text
/// OfflineGate ──▶ Retry (3 × linear 1 s, transient only) ──▶ transport
/// ```
///
/// The gateway is shared as `Arc<Gateway>`. Apart from the current session,
/// which sits behind a lock, it holds no per-call state.
///
/// # Examples
///
/// ```rust,no_run
/// use brandkit_gateway::{Gateway, GatewayConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gateway = Gateway::builder(GatewayConfig::from_env()?).build();
///
/// let rows: Vec<serde_json::Value> = gateway
///     .from("projects")
///     .select("*")
///     .order("created_at", false)
///     .fetch()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Gateway {
    config: GatewayConfig,
    service: BoxTransport,
    monitor: Arc<ConnectivityMonitor>,
    session: RwLock<Option<Session>>,
    storage: Arc<dyn SessionStorage>,
}

impl Gateway {
    /// Create a new builder.
    pub fn builder(config: GatewayConfig) -> GatewayBuilder {
        GatewayBuilder::new(config)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The connectivity monitor consulted before every request.
    pub fn monitor(&self) -> &Arc<ConnectivityMonitor> {
        &self.monitor
    }

    /// Send a fully built request through the offline gate and the retry
    /// layer.
    pub async fn send(&self, request: RemoteRequest) -> Result<RemoteResponse, ClientError> {
        tracing::debug!(method = %request.method, path = request.url.path(), "sending request");

        let result = self.service.clone().oneshot(request).await;

        #[cfg(feature = "metrics")]
        {
            let outcome = match &result {
                Ok(_) => "ok".to_string(),
                Err(e) => e.kind().to_string(),
            };
            counter!("gateway_requests_total", "result" => outcome).increment(1);
        }

        result
    }

    /// Query builder over one table.
    pub fn from(&self, table: &str) -> TableQuery<'_> {
        TableQuery::new(self, table)
    }

    /// Authentication operations.
    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    /// File storage operations on one bucket.
    pub fn storage(&self, bucket: &str) -> Bucket<'_> {
        Bucket::new(self, bucket)
    }

    /// Verify that a session can be read and that a trivial read against the
    /// store succeeds.
    ///
    /// Failures are logged and returned; nothing else depends on the outcome.
    pub async fn self_check(&self) -> Result<(), ClientError> {
        let result = async {
            let session = self.auth().session().await?;
            tracing::debug!(
                authenticated = session.is_some(),
                user = session.as_ref().map(|s| s.user.id.as_str()),
                "session read"
            );

            self.from("profiles")
                .select("id")
                .limit(1)
                .fetch::<serde_json::Value>()
                .await?;
            Ok::<(), ClientError>(())
        }
        .await;

        match &result {
            Ok(()) => tracing::info!("store connection verified"),
            Err(error) => tracing::warn!(%error, "store self-check failed"),
        }
        result
    }

    /// Re-run [`self_check`](Self::self_check) every time connectivity comes
    /// back.
    ///
    /// The task ends once the gateway is dropped. Must be called from within a
    /// Tokio runtime.
    pub fn watch_connectivity(self: &Arc<Self>) -> JoinHandle<()> {
        let gateway = Arc::downgrade(self);
        let mut changes = self.monitor.subscribe();
        let mut was_online = *changes.borrow_and_update();

        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let online = *changes.borrow_and_update();
                if online && !was_online {
                    let Some(gateway) = gateway.upgrade() else {
                        break;
                    };
                    tracing::info!("connection restored");
                    let _ = gateway.self_check().await;
                } else if !online && was_online {
                    tracing::warn!("connection lost");
                }
                was_online = online;
            }
        })
    }

    pub(crate) fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_session(&self, session: Option<Session>) {
        let persisted = match &session {
            Some(s) => self.storage.store(s),
            None => self.storage.clear(),
        };
        if let Err(error) = persisted {
            tracing::warn!(%error, "failed to persist session");
        }
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// A request to `path` authorized with the current session, refreshed if
    /// it is about to expire, or with the anonymous key.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RemoteRequest, ClientError> {
        let token = match self.auth().session().await {
            Ok(Some(session)) => session.access_token,
            Ok(None) => self.config.anon_key().to_string(),
            Err(error) => {
                tracing::debug!(%error, "session refresh failed, using stored token");
                self.current_session()
                    .map(|s| s.access_token)
                    .unwrap_or_else(|| self.config.anon_key().to_string())
            }
        };
        self.request_with_token(method, path, &token)
    }

    /// A request to `path` authorized with the anonymous key.
    pub(crate) fn anon_request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RemoteRequest, ClientError> {
        self.request_with_token(method, path, self.config.anon_key())
    }

    pub(crate) fn request_with_token(
        &self,
        method: Method,
        path: &str,
        token: &str,
    ) -> Result<RemoteRequest, ClientError> {
        let url = self.config.endpoint(path)?;
        Ok(RemoteRequest::new(method, url)
            .header("apikey", self.config.anon_key())
            .header("Authorization", format!("Bearer {token}")))
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.config)
            .field("monitor", &self.monitor)
            .field("signed_in", &self.current_session().is_some())
            .finish()
    }
}

/// Builder for [`Gateway`].
pub struct GatewayBuilder {
    config: GatewayConfig,
    transport: Option<BoxTransport>,
    monitor: Option<Arc<ConnectivityMonitor>>,
    storage: Option<Arc<dyn SessionStorage>>,
    retry: RetryConfigBuilder<ClientError>,
    self_check_on_start: bool,
    watch_connectivity_on_start: bool,
}

impl GatewayBuilder {
    /// Defaults:
    /// - transport: [`HttpTransport`]
    /// - monitor: [`ConnectivityMonitor::default`] (HTTP probe, 5 s timeout)
    /// - session storage: [`MemoryStorage`]
    /// - retry: 3 retries, linear backoff with a 1 second base, transient
    ///   errors only
    /// - self-check on start: enabled
    /// - self-check on reconnect: enabled
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            transport: None,
            monitor: None,
            storage: None,
            retry: RetryConfigBuilder::new()
                .max_retries(brandkit_retry::DEFAULT_MAX_RETRIES)
                .linear_backoff(brandkit_retry::DEFAULT_BASE_DELAY)
                .retry_on(ClientError::is_transient)
                .name("gateway"),
            self_check_on_start: true,
            watch_connectivity_on_start: true,
        }
    }

    /// Replace the HTTP transport, e.g. with a `tower::service_fn` fake.
    pub fn transport<S>(mut self, transport: S) -> Self
    where
        S: Service<RemoteRequest, Response = RemoteResponse, Error = ClientError>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        self.transport = Some(BoxCloneSyncService::new(transport));
        self
    }

    /// Share an existing connectivity monitor.
    pub fn monitor(mut self, monitor: Arc<ConnectivityMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Where the session is persisted.
    pub fn session_storage<T>(mut self, storage: T) -> Self
    where
        T: SessionStorage + 'static,
    {
        self.storage = Some(Arc::new(storage));
        self
    }

    /// Override the retry bound and the linear backoff base.
    pub fn retry_policy(mut self, max_retries: usize, base_delay: Duration) -> Self {
        self.retry = self
            .retry
            .max_retries(max_retries)
            .linear_backoff(base_delay);
        self
    }

    /// Register a callback invoked before each retry.
    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, Duration) + Send + Sync + 'static,
    {
        self.retry = self.retry.on_retry(f);
        self
    }

    /// Whether [`build`](Self::build) spawns a best-effort self-check.
    pub fn self_check_on_start(mut self, enabled: bool) -> Self {
        self.self_check_on_start = enabled;
        self
    }

    /// Whether [`build`](Self::build) also spawns
    /// [`Gateway::watch_connectivity`]. Only takes effect together with
    /// [`self_check_on_start`](Self::self_check_on_start).
    pub fn watch_connectivity_on_start(mut self, enabled: bool) -> Self {
        self.watch_connectivity_on_start = enabled;
        self
    }

    /// Build the gateway.
    ///
    /// A session found in the storage is restored. When self-check on start
    /// is enabled and a Tokio runtime is available, the check runs in the
    /// background and only logs its outcome, and it runs again each time
    /// connectivity is restored.
    pub fn build(self) -> Arc<Gateway> {
        #[cfg(feature = "metrics")]
        describe_counter!(
            "gateway_requests_total",
            "Total number of gateway requests by outcome"
        );

        let monitor = self
            .monitor
            .unwrap_or_else(|| Arc::new(ConnectivityMonitor::default()));
        let transport = self
            .transport
            .unwrap_or_else(|| BoxCloneSyncService::new(HttpTransport::default()));

        let service = ServiceBuilder::new()
            .layer(OfflineGateLayer::new(Arc::clone(&monitor)))
            .layer(self.retry.build())
            .service(transport);

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let session = storage.load().unwrap_or_else(|error| {
            tracing::warn!(%error, "ignoring unreadable stored session");
            None
        });

        let gateway = Arc::new(Gateway {
            config: self.config,
            service: BoxCloneSyncService::new(service),
            monitor,
            session: RwLock::new(session),
            storage,
        });

        if self.self_check_on_start {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let checker = Arc::clone(&gateway);
                handle.spawn(async move {
                    let _ = checker.self_check().await;
                });
                if self.watch_connectivity_on_start {
                    let _ = gateway.watch_connectivity();
                }
            }
        }

        gateway
    }
}
