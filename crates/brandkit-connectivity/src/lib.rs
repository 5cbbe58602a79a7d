//! Network reachability for the client core.
//!
//! A [`ConnectivityMonitor`] owns a single online flag. Remote calls ask it
//! for a fresh probe before leaving the process, so a dead network fails fast
//! instead of burning retries. Three sources keep the flag current:
//!
//! - an on-demand probe ([`ConnectivityMonitor::check_connection`]) with a hard
//!   timeout
//! - platform transitions ([`ConnectivityMonitor::signal`])
//! - a background polling task ([`ConnectivityMonitor::start`])
//!
//! The default probe is [`HttpProbe`], a cache-busting `HEAD` request against a
//! well-known resource. Any answer counts as online; the status code is
//! ignored.
//!
//! # Examples
//!
//! ```rust
//! use brandkit_connectivity::{ConnectivityConfig, ConnectivityMonitor, PlatformSignal};
//!
//! # async fn example() {
//! let monitor = ConnectivityMonitor::new(
//!     || async { true },
//!     ConnectivityConfig::builder()
//!         .on_status_change(|online| println!("online: {}", online))
//!         .build(),
//! );
//!
//! let mut changes = monitor.subscribe();
//! monitor.signal(PlatformSignal::Offline);
//! changes.changed().await.ok();
//! assert!(!monitor.is_online());
//! # }
//! ```

mod config;
mod events;
mod monitor;
mod probe;

pub use config::{
    ConnectivityConfig, ConnectivityConfigBuilder, DEFAULT_POLL_INTERVAL, DEFAULT_PROBE_TIMEOUT,
};
pub use events::ConnectivityEvent;
pub use monitor::{ConnectivityMonitor, PlatformSignal};
pub use probe::{ConnectivityProbe, HttpProbe, DEFAULT_PROBE_URL};
