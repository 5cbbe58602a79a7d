use brandkit_core::Event;
use std::time::{Duration, Instant};

/// Events emitted by the connectivity monitor.
#[derive(Debug, Clone)]
pub enum ConnectivityEvent {
    /// A probe finished (or timed out) with the given outcome.
    ProbeCompleted {
        source: String,
        timestamp: Instant,
        online: bool,
        elapsed: Duration,
    },
    /// The cached online flag flipped.
    StatusChanged {
        source: String,
        timestamp: Instant,
        online: bool,
    },
}

impl Event for ConnectivityEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ConnectivityEvent::ProbeCompleted { .. } => "probe_completed",
            ConnectivityEvent::StatusChanged { .. } => "status_changed",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            ConnectivityEvent::ProbeCompleted { timestamp, .. }
            | ConnectivityEvent::StatusChanged { timestamp, .. } => *timestamp,
        }
    }

    fn source(&self) -> &str {
        match self {
            ConnectivityEvent::ProbeCompleted { source, .. }
            | ConnectivityEvent::StatusChanged { source, .. } => source,
        }
    }
}
