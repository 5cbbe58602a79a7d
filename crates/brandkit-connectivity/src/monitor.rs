//! The connectivity monitor.

use crate::config::ConnectivityConfig;
use crate::events::ConnectivityEvent;
use crate::probe::{ConnectivityProbe, DynProbe, HttpProbe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A reachability transition reported by the operating system or host
/// environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformSignal {
    /// The platform regained a network route.
    Online,
    /// The platform lost its network route.
    Offline,
}

/// Tracks whether the network is reachable.
///
/// The flag is fed from three sources: on-demand probes
/// ([`check_connection`](Self::check_connection)), platform transitions
/// ([`signal`](Self::signal)) and the background polling task started with
/// [`start`](Self::start). Observers either read the cached flag with
/// [`is_online`](Self::is_online) or follow changes through
/// [`subscribe`](Self::subscribe).
///
/// # Examples
///
/// ```rust
/// use brandkit_connectivity::{ConnectivityConfig, ConnectivityMonitor};
/// use std::time::Duration;
///
/// # async fn example() {
/// let monitor = ConnectivityMonitor::new(
///     || async { true },
///     ConnectivityConfig::builder()
///         .poll_interval(Duration::from_secs(30))
///         .build(),
/// );
///
/// monitor.start();
/// assert!(monitor.check_connection().await);
/// monitor.stop();
/// # }
/// ```
pub struct ConnectivityMonitor {
    inner: Arc<Inner>,

    /// Handle to the background polling task
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

struct Inner {
    probe: Box<dyn DynProbe>,
    state: watch::Sender<bool>,
    config: ConnectivityConfig,
}

impl Inner {
    async fn check(&self) -> bool {
        let started = Instant::now();
        // timeout elapsed = offline
        let online = tokio::time::timeout(self.config.timeout, self.probe.check_boxed())
            .await
            .unwrap_or(false);
        let elapsed = started.elapsed();

        tracing::debug!(monitor = %self.config.name, online, ?elapsed, "probe completed");
        self.config
            .event_listeners
            .emit(&ConnectivityEvent::ProbeCompleted {
                source: self.config.name.clone(),
                timestamp: Instant::now(),
                online,
                elapsed,
            });

        self.record(online);
        online
    }

    fn record(&self, online: bool) {
        let changed = self.state.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });

        if changed {
            tracing::info!(monitor = %self.config.name, online, "connectivity changed");
            self.config
                .event_listeners
                .emit(&ConnectivityEvent::StatusChanged {
                    source: self.config.name.clone(),
                    timestamp: Instant::now(),
                    online,
                });
        }
    }
}

impl ConnectivityMonitor {
    /// Create a monitor around `probe`.
    pub fn new<P>(probe: P, config: ConnectivityConfig) -> Self
    where
        P: ConnectivityProbe + 'static,
    {
        let (state, _) = watch::channel(config.initial_online);
        Self {
            inner: Arc::new(Inner {
                probe: Box::new(probe),
                state,
                config,
            }),
            poll_task: Mutex::new(None),
        }
    }

    /// Create a monitor using [`HttpProbe`] against `url`.
    pub fn http(url: impl Into<String>, config: ConnectivityConfig) -> Self {
        Self::new(HttpProbe::new(url), config)
    }

    /// Probe now and record the result.
    ///
    /// Returns `true` if the probe answered within the configured timeout.
    pub async fn check_connection(&self) -> bool {
        self.inner.check().await
    }

    /// Feed a platform reachability transition into the flag.
    pub fn signal(&self, signal: PlatformSignal) {
        self.inner.record(signal == PlatformSignal::Online);
    }

    /// The last observed reachability.
    pub fn is_online(&self) -> bool {
        *self.inner.state.borrow()
    }

    /// Follow changes of the online flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.state.subscribe()
    }

    /// The monitor's configuration.
    pub fn config(&self) -> &ConnectivityConfig {
        &self.inner.config
    }

    /// Start background polling.
    ///
    /// Probes immediately, then every poll interval. Calling `start` while the
    /// task is running does nothing. Must be called from within a Tokio
    /// runtime.
    pub fn start(&self) {
        let mut task = self
            .poll_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }

        let inner = Arc::clone(&self.inner);
        *task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(inner.config.poll_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                inner.check().await;
            }
        }));
    }

    /// Stop background polling.
    pub fn stop(&self) {
        let mut task = self
            .poll_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = task.take() {
            task.abort();
        }
    }

    /// Whether the polling task is running.
    pub fn is_polling(&self) -> bool {
        self.poll_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(HttpProbe::default(), ConnectivityConfig::default())
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        if let Some(task) = self
            .poll_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

impl std::fmt::Debug for ConnectivityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityMonitor")
            .field("name", &self.inner.config.name)
            .field("online", &self.is_online())
            .field("polling", &self.is_polling())
            .finish()
    }
}
