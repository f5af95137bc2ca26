//! Process-wide cache store with explicit freshness and single-flight reads.
//!
//! One store exists per running client. Every read goes through
//! [`CacheStore::ensure_fresh`]; every write-side effect goes through
//! [`CacheStore::invalidate`] or [`CacheStore::remove_prefix`]. Nothing else
//! mutates cached state.
//!
//! # Freshness
//!
//! An entry is served from cache while it is inside its staleness window and
//! has not been invalidated. A stale or invalidated entry triggers exactly
//! one underlying fetch; concurrent callers for the same key join the
//! in-flight fetch instead of issuing duplicates.
//!
//! # Errors
//!
//! A failed fetch records the error on the entry and leaves the previous
//! value in place (stale-while-error), so consumers can keep rendering
//! last-known-good data.

use crate::clock::Clock;
use crate::key::CacheKey;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tandem_core::{ActorError, SyncError, SyncResult};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

/// Default capacity of the change-event channel.
const DEFAULT_EVENT_CAPACITY: usize = 256;

/// One cached entry: last value, freshness state, and error state.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    /// Last successfully fetched value, kept through later failures.
    pub value: Option<Value>,
    /// When `value` was fetched.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Whether a fetch for this key is currently in flight.
    pub is_fetching: bool,
    /// Marked by `invalidate`; cleared by the next successful fetch.
    pub is_invalidated: bool,
    /// Error from the most recent failed fetch, if any.
    pub error: Option<SyncError>,
}

/// What happened to a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheChange {
    Updated,
    Failed,
    Invalidated,
    Removed,
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone)]
pub struct CacheEvent {
    pub key: CacheKey,
    pub change: CacheChange,
}

/// Per-call fetch options.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// A disabled call fetches nothing and records nothing.
    pub enabled: bool,
    /// Window after a successful fetch during which the cached value is
    /// served without refetching.
    pub stale_time: Duration,
}

impl FetchOptions {
    /// Enabled fetch with the given staleness window.
    pub fn with_stale_time(stale_time: Duration) -> Self {
        Self {
            enabled: true,
            stale_time,
        }
    }

    /// Disabled fetch; `ensure_fresh` reports `Skipped`.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            stale_time: Duration::ZERO,
        }
    }
}

/// Result of an `ensure_fresh` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The call was disabled; nothing was fetched or recorded.
    Skipped,
    /// Served from cache inside the staleness window.
    Cached(T),
    /// Fetched from the actor (directly or by joining an in-flight fetch).
    Fetched(T),
}

impl<T> FetchOutcome<T> {
    /// The carried value, if the call was not skipped.
    pub fn into_value(self) -> Option<T> {
        match self {
            FetchOutcome::Skipped => None,
            FetchOutcome::Cached(v) | FetchOutcome::Fetched(v) => Some(v),
        }
    }

    /// Whether the call was disabled.
    pub fn was_skipped(&self) -> bool {
        matches!(self, FetchOutcome::Skipped)
    }

    /// Whether the value came from cache without a fetch.
    pub fn was_cache_hit(&self) -> bool {
        matches!(self, FetchOutcome::Cached(_))
    }
}

/// Cache usage counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entry_count: u64,
}

impl CacheStats {
    /// Hit rate in 0.0..=1.0.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Result published to callers joined on an in-flight fetch.
type FlightResult = Option<Result<Value, SyncError>>;

/// Role decided under the lock for one `ensure_fresh` call.
enum Role {
    Join(u64, watch::Receiver<FlightResult>),
    Lead(watch::Sender<FlightResult>),
}

#[derive(Default)]
struct Inner {
    entries: HashMap<CacheKey, CacheEntry>,
    /// One flight per key; the id distinguishes a dead flight from a
    /// successor started after cleanup.
    in_flight: HashMap<CacheKey, (u64, watch::Receiver<FlightResult>)>,
    flight_seq: u64,
    hits: u64,
    misses: u64,
}

/// The process-wide keyed cache.
pub struct CacheStore {
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
    events: broadcast::Sender<CacheEvent>,
}

impl CacheStore {
    /// Create a store over the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_event_capacity(clock, DEFAULT_EVENT_CAPACITY)
    }

    /// Create a store with an explicit change-event channel capacity.
    pub fn with_event_capacity(clock: Arc<dyn Clock>, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            clock,
            inner: Mutex::new(Inner::default()),
            events,
        }
    }

    /// Synchronous snapshot of an entry. Never fetches.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.lock().entries.get(key).cloned()
    }

    /// Subscribe to entry changes. The UI layer consumes this to re-render;
    /// the store itself never calls back into consumers.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Usage counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            entry_count: inner.entries.len() as u64,
        }
    }

    /// Mark every entry under `prefix` stale. Returns how many entries were
    /// marked. Refetching happens lazily on the next enabled `ensure_fresh`.
    pub fn invalidate(&self, prefix: &CacheKey) -> usize {
        let marked: Vec<CacheKey> = {
            let mut inner = self.lock();
            inner
                .entries
                .iter_mut()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, entry)| {
                    entry.is_invalidated = true;
                    key.clone()
                })
                .collect()
        };
        debug!(prefix = %prefix, count = marked.len(), "cache invalidated");
        for key in &marked {
            self.emit(key.clone(), CacheChange::Invalidated);
        }
        marked.len()
    }

    /// Drop every entry under `prefix` entirely (identity re-keying).
    pub fn remove_prefix(&self, prefix: &CacheKey) -> usize {
        let removed: Vec<CacheKey> = {
            let mut inner = self.lock();
            let keys: Vec<CacheKey> = inner
                .entries
                .keys()
                .filter(|key| key.starts_with(prefix))
                .cloned()
                .collect();
            for key in &keys {
                inner.entries.remove(key);
            }
            keys
        };
        for key in &removed {
            self.emit(key.clone(), CacheChange::Removed);
        }
        removed.len()
    }

    /// Serve `key` from cache if fresh, otherwise fetch it exactly once.
    ///
    /// All concurrent callers for the same key share a single underlying
    /// fetch; joiners receive the same success or failure the leading call
    /// observed. A failed fetch leaves any previous value in place.
    pub async fn ensure_fresh<T, F, Fut>(
        &self,
        key: CacheKey,
        fetch: F,
        opts: FetchOptions,
    ) -> SyncResult<FetchOutcome<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = SyncResult<T>>,
    {
        if !opts.enabled {
            return Ok(FetchOutcome::Skipped);
        }

        let role = {
            let mut inner = self.lock();
            if let Some(entry) = inner.entries.get(&key) {
                if let (Some(value), Some(fetched_at)) = (&entry.value, entry.fetched_at) {
                    if !entry.is_invalidated && self.within_window(fetched_at, opts.stale_time) {
                        let value = value.clone();
                        inner.hits += 1;
                        drop(inner);
                        return decode::<T>(&key, &value).map(FetchOutcome::Cached);
                    }
                }
            }
            inner.misses += 1;
            if let Some((id, rx)) = inner.in_flight.get(&key) {
                Role::Join(*id, rx.clone())
            } else {
                let (tx, rx) = watch::channel(None);
                inner.flight_seq += 1;
                let id = inner.flight_seq;
                inner.in_flight.insert(key.clone(), (id, rx));
                inner.entries.entry(key.clone()).or_default().is_fetching = true;
                Role::Lead(tx)
            }
        };

        match role {
            Role::Join(id, rx) => self.join_flight(&key, id, rx).await,
            Role::Lead(tx) => self.lead_flight(&key, fetch, tx).await,
        }
    }

    /// Run the single fetch for a key and publish its result.
    async fn lead_flight<T, F, Fut>(
        &self,
        key: &CacheKey,
        fetch: F,
        tx: watch::Sender<FlightResult>,
    ) -> SyncResult<FetchOutcome<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = SyncResult<T>>,
    {
        debug!(key = %key, "fetching");
        let result = fetch().await;

        let stored: Result<Value, SyncError> = match &result {
            Ok(value) => serde_json::to_value(value).map_err(|e| SyncError::Decode {
                key: key.to_string(),
                reason: e.to_string(),
            }),
            Err(e) => Err(e.clone()),
        };

        let change = {
            let mut inner = self.lock();
            let entry = inner.entries.entry(key.clone()).or_default();
            entry.is_fetching = false;
            let change = match &stored {
                Ok(value) => {
                    entry.value = Some(value.clone());
                    entry.fetched_at = Some(self.clock.now());
                    entry.is_invalidated = false;
                    entry.error = None;
                    CacheChange::Updated
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "fetch failed; keeping last value");
                    entry.error = Some(e.clone());
                    CacheChange::Failed
                }
            };
            inner.in_flight.remove(key);
            change
        };
        self.emit(key.clone(), change);
        // Publish after the entry is settled so joiners re-reading the
        // store observe the same state.
        let _ = tx.send(Some(stored));

        result.map(FetchOutcome::Fetched)
    }

    /// Await the in-flight fetch another caller is leading.
    async fn join_flight<T>(
        &self,
        key: &CacheKey,
        flight_id: u64,
        mut rx: watch::Receiver<FlightResult>,
    ) -> SyncResult<FetchOutcome<T>>
    where
        T: DeserializeOwned,
    {
        let settled = match rx.wait_for(|result| result.is_some()).await {
            Ok(result) => Some(result.clone().expect("watch settles only with a result")),
            Err(_) => None,
        };
        let Some(shared) = settled else {
            // The leader was dropped without publishing; clear the dead
            // flight (if it is still this one) so a later call can start a
            // fresh fetch.
            let mut inner = self.lock();
            if inner
                .in_flight
                .get(key)
                .is_some_and(|(id, _)| *id == flight_id)
            {
                inner.in_flight.remove(key);
                if let Some(entry) = inner.entries.get_mut(key) {
                    entry.is_fetching = false;
                }
            }
            return Err(SyncError::Actor(ActorError::Transport {
                reason: "in-flight fetch abandoned".to_string(),
            }));
        };

        match shared {
            Ok(value) => decode::<T>(key, &value).map(FetchOutcome::Fetched),
            Err(e) => Err(e),
        }
    }

    fn within_window(&self, fetched_at: DateTime<Utc>, stale_time: Duration) -> bool {
        let age = self
            .clock
            .now()
            .signed_duration_since(fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        age <= stale_time
    }

    fn emit(&self, key: CacheKey, change: CacheChange) {
        // No subscribers is fine; events are advisory.
        let _ = self.events.send(CacheEvent { key, change });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .expect("cache lock should not be poisoned")
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("CacheStore")
            .field("entries", &stats.entry_count)
            .field("hits", &stats.hits)
            .field("misses", &stats.misses)
            .finish()
    }
}

/// Decode a cached snapshot back into its typed form.
fn decode<T: DeserializeOwned>(key: &CacheKey, value: &Value) -> SyncResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| SyncError::Decode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
