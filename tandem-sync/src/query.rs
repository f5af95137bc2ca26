//! Declarative read bindings.
//!
//! A [`QueryBinding`] ties one remote-actor read to one cache key, together
//! with its enablement, staleness window, and retry policy. Running a
//! binding yields a [`QuerySnapshot`], the only read shape the rest of the
//! application may depend on.

use crate::key::CacheKey;
use crate::store::{CacheStore, FetchOptions, FetchOutcome};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tandem_core::{SyncError, SyncResult};

/// Boxed future type used at the binding seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Reusable fetch factory; called once per fetch attempt.
type FetchFn<T> = Arc<dyn Fn() -> BoxFuture<'static, SyncResult<T>> + Send + Sync>;

/// Read state exposed to the UI: `{data, is_loading, is_fetched, error}`.
///
/// `data` can be present together with `error`: that is stale-while-error,
/// the consumer keeps rendering last-known-good data.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub is_fetched: bool,
    pub error: Option<SyncError>,
}

impl<T> QuerySnapshot<T> {
    /// State of a disabled or not-yet-runnable query.
    pub fn not_fetched() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_fetched: false,
            error: None,
        }
    }

    fn ready(data: T) -> Self {
        Self {
            data: Some(data),
            is_loading: false,
            is_fetched: true,
            error: None,
        }
    }
}

/// Declarative descriptor binding one actor read to one cache entry.
pub struct QueryBinding<T> {
    key: CacheKey,
    fetch: FetchFn<T>,
    enabled: bool,
    retry: bool,
    retry_attempts: u32,
    stale_time: Duration,
}

impl<T> QueryBinding<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a binding for `key` over a fetch factory.
    ///
    /// Defaults: enabled, no retry (a legitimately failing read such as
    /// "no partner linked" must not be masked as a transient error), zero
    /// staleness beyond the de-duplication window.
    pub fn new<F, Fut>(key: CacheKey, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SyncResult<T>> + Send + 'static,
    {
        Self {
            key,
            fetch: Arc::new(move || Box::pin(fetch()) as BoxFuture<'static, SyncResult<T>>),
            enabled: true,
            retry: false,
            retry_attempts: 2,
            stale_time: Duration::ZERO,
        }
    }

    /// Gate the binding; a disabled binding reports not-fetched.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Permit bounded re-attempts for transient failures.
    pub fn retry(mut self, retry: bool) -> Self {
        self.retry = retry;
        self
    }

    /// How many extra attempts `retry` permits.
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Staleness window for this binding's entries.
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// The cache key this binding reads through.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Synchronous snapshot from the store without fetching.
    pub fn peek(&self, store: &CacheStore) -> QuerySnapshot<T> {
        match store.get(&self.key) {
            None => QuerySnapshot::not_fetched(),
            Some(entry) => QuerySnapshot {
                data: entry
                    .value
                    .as_ref()
                    .and_then(|v| serde_json::from_value(v.clone()).ok()),
                is_loading: entry.is_fetching && entry.value.is_none(),
                is_fetched: entry.fetched_at.is_some() || entry.error.is_some(),
                error: entry.error.clone(),
            },
        }
    }

    /// Run the binding to completion against the store.
    ///
    /// Transient failures are re-attempted only when `retry` is set;
    /// authorization/business refusals are never retried. On failure the
    /// snapshot still carries any last-known-good data next to the error.
    pub async fn run(&self, store: &CacheStore) -> QuerySnapshot<T> {
        let opts = FetchOptions {
            enabled: self.enabled,
            stale_time: self.stale_time,
        };
        let max_attempts = if self.retry {
            1 + self.retry_attempts
        } else {
            1
        };

        let mut last_error = None;
        for _ in 0..max_attempts {
            match store
                .ensure_fresh(self.key.clone(), || (self.fetch)(), opts)
                .await
            {
                Ok(FetchOutcome::Skipped) => return QuerySnapshot::not_fetched(),
                Ok(outcome) => match outcome.into_value() {
                    Some(data) => return QuerySnapshot::ready(data),
                    None => return QuerySnapshot::not_fetched(),
                },
                Err(e) => {
                    let transient = e.is_transient();
                    last_error = Some(e);
                    if !transient {
                        break;
                    }
                }
            }
        }

        let stale = self.peek(store);
        QuerySnapshot {
            data: stale.data,
            is_loading: false,
            is_fetched: true,
            error: last_error,
        }
    }
}

impl<T> Clone for QueryBinding<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            fetch: Arc::clone(&self.fetch),
            enabled: self.enabled,
            retry: self.retry,
            retry_attempts: self.retry_attempts,
            stale_time: self.stale_time,
        }
    }
}
