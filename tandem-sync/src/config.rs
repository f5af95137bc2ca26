//! Configuration for the sync layer.

use std::time::Duration;

/// Tunables for the binding layer.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Staleness window for ordinary content reads. Zero means entries are
    /// refetched on every enabled read, with the in-flight de-duplication
    /// window as the only coalescing.
    pub default_stale_time: Duration,
    /// Staleness window for the daily quote.
    pub quote_stale_time: Duration,
    /// Extra attempts a `retry: true` query may make after a transient
    /// failure.
    pub retry_attempts: u32,
    /// Capacity of the cache change-event channel.
    pub event_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_stale_time: Duration::ZERO,
            quote_stale_time: Duration::from_secs(24 * 60 * 60),
            retry_attempts: 2,
            event_capacity: 256,
        }
    }
}

impl SyncConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default staleness window.
    pub fn with_default_stale_time(mut self, stale_time: Duration) -> Self {
        self.default_stale_time = stale_time;
        self
    }

    /// Set the daily-quote staleness window.
    pub fn with_quote_stale_time(mut self, stale_time: Duration) -> Self {
        self.quote_stale_time = stale_time;
        self
    }

    /// Set the extra attempts allowed under `retry: true`.
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Set the change-event channel capacity.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}
