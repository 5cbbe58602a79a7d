//! Configuration for the connectivity monitor.

use crate::events::ConnectivityEvent;
use brandkit_core::{EventListeners, FnListener};
use std::time::Duration;

/// Default hard timeout for a single probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default period of the background polling task.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for [`ConnectivityMonitor`](crate::ConnectivityMonitor).
#[derive(Clone)]
pub struct ConnectivityConfig {
    /// A probe still pending after this long reports offline
    pub(crate) timeout: Duration,

    /// Period of the fallback polling task
    pub(crate) poll_interval: Duration,

    /// Flag value before the first probe or signal
    pub(crate) initial_online: bool,

    pub(crate) name: String,
    pub(crate) event_listeners: EventListeners<ConnectivityEvent>,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            initial_online: true,
            name: "connectivity".to_string(),
            event_listeners: EventListeners::new(),
        }
    }
}

impl ConnectivityConfig {
    /// Create a new builder.
    pub fn builder() -> ConnectivityConfigBuilder {
        ConnectivityConfigBuilder::default()
    }

    /// Get the probe timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the polling interval.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Get the initial online flag.
    pub fn initial_online(&self) -> bool {
        self.initial_online
    }

    /// Get the name reported in events.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`ConnectivityConfig`].
#[derive(Default)]
pub struct ConnectivityConfigBuilder {
    config: ConnectivityConfig,
}

impl ConnectivityConfigBuilder {
    /// Set the hard timeout of one probe.
    ///
    /// Default: 5 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the period of the background polling task.
    ///
    /// Default: 30 seconds
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the flag value reported before anything was observed.
    ///
    /// Default: `true`
    pub fn initial_online(mut self, online: bool) -> Self {
        self.config.initial_online = online;
        self
    }

    /// Set the name used in events and logs.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Register a callback invoked whenever the online flag flips.
    pub fn on_status_change<F>(mut self, f: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.config
            .event_listeners
            .add(FnListener::new(move |event| {
                if let ConnectivityEvent::StatusChanged { online, .. } = event {
                    f(*online);
                }
            }));
        self
    }

    /// Register a callback invoked after every probe with its outcome and
    /// duration.
    pub fn on_probe<F>(mut self, f: F) -> Self
    where
        F: Fn(bool, Duration) + Send + Sync + 'static,
    {
        self.config
            .event_listeners
            .add(FnListener::new(move |event| {
                if let ConnectivityEvent::ProbeCompleted {
                    online, elapsed, ..
                } = event
                {
                    f(*online, *elapsed);
                }
            }));
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ConnectivityConfig {
        self.config
    }
}
