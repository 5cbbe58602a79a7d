use brandkit_core::Event;
use std::time::{Duration, Instant};

/// Events emitted by the retry executor.
#[derive(Debug, Clone)]
pub enum RetryEvent {
    /// A retry is about to be made after `delay`.
    Retry {
        source: String,
        timestamp: Instant,
        retry: usize,
        delay: Duration,
    },
    /// The operation succeeded (either on first try or after retries).
    Success {
        source: String,
        timestamp: Instant,
        attempts: usize,
    },
    /// The operation failed after exhausting all retries.
    Error {
        source: String,
        timestamp: Instant,
        attempts: usize,
    },
    /// An error occurred but was not retried (filtered by retry predicate).
    IgnoredError { source: String, timestamp: Instant },
}

impl Event for RetryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RetryEvent::Retry { .. } => "retry",
            RetryEvent::Success { .. } => "success",
            RetryEvent::Error { .. } => "error",
            RetryEvent::IgnoredError { .. } => "ignored_error",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            RetryEvent::Retry { timestamp, .. }
            | RetryEvent::Success { timestamp, .. }
            | RetryEvent::Error { timestamp, .. }
            | RetryEvent::IgnoredError { timestamp, .. } => *timestamp,
        }
    }

    fn source(&self) -> &str {
        match self {
            RetryEvent::Retry { source, .. }
            | RetryEvent::Success { source, .. }
            | RetryEvent::Error { source, .. }
            | RetryEvent::IgnoredError { source, .. } => source,
        }
    }
}
