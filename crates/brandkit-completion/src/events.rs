use brandkit_core::Event;
use std::time::Instant;

/// Events emitted by the [`Fallback`](crate::Fallback) service.
#[derive(Debug, Clone)]
pub enum FallbackEvent {
    /// The inner service answered; no fallback was needed.
    Success { source: String, timestamp: Instant },

    /// The inner service failed and the fallback produced the response.
    Applied { source: String, timestamp: Instant },

    /// The error was not handled and propagated unchanged.
    Skipped { source: String, timestamp: Instant },
}

impl Event for FallbackEvent {
    fn event_type(&self) -> &'static str {
        match self {
            FallbackEvent::Success { .. } => "success",
            FallbackEvent::Applied { .. } => "applied",
            FallbackEvent::Skipped { .. } => "skipped",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            FallbackEvent::Success { timestamp, .. }
            | FallbackEvent::Applied { timestamp, .. }
            | FallbackEvent::Skipped { timestamp, .. } => *timestamp,
        }
    }

    fn source(&self) -> &str {
        match self {
            FallbackEvent::Success { source, .. }
            | FallbackEvent::Applied { source, .. }
            | FallbackEvent::Skipped { source, .. } => source,
        }
    }
}
