use std::time::Duration;

/// Abstraction for computing retry intervals.
pub trait IntervalFunction: Send + Sync {
    /// Computes the delay before retry number `retry`.
    ///
    /// # Arguments
    /// * `retry` - The retry number (1-indexed, so the first retry is 1)
    fn next_interval(&self, retry: usize) -> Duration;
}

/// Linear backoff: the delay before retry `k` is `base_delay × k`.
///
/// With a one second base the waits are 1 s, 2 s, 3 s, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBackoff {
    base_delay: Duration,
}

impl LinearBackoff {
    /// Creates a linear backoff growing in multiples of `base_delay`.
    pub fn new(base_delay: Duration) -> Self {
        Self { base_delay }
    }

    /// Returns the base delay.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }
}

impl IntervalFunction for LinearBackoff {
    fn next_interval(&self, retry: usize) -> Duration {
        let factor = u32::try_from(retry).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Fixed interval backoff - returns the same duration for every retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval {
    duration: Duration,
}

impl FixedInterval {
    /// Creates a new fixed interval backoff.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl IntervalFunction for FixedInterval {
    fn next_interval(&self, _retry: usize) -> Duration {
        self.duration
    }
}
