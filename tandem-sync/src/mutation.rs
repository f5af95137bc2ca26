//! Declarative write bindings.
//!
//! A [`MutationBinding`] performs one remote-actor write and, only after the
//! write's success is observed, invalidates a fixed set of cache-key
//! prefixes declared at construction. The affected reads are always listed
//! explicitly, never inferred.

use crate::key::CacheKey;
use crate::query::BoxFuture;
use crate::store::CacheStore;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tandem_core::SyncResult;
use tracing::debug;

type ActionFn<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, SyncResult<O>> + Send + Sync>;

/// Declarative descriptor for one actor write and its invalidation set.
pub struct MutationBinding<I, O> {
    action: ActionFn<I, O>,
    invalidates: Vec<CacheKey>,
    store: Arc<CacheStore>,
    pending: Arc<AtomicBool>,
}

impl<I, O> MutationBinding<I, O> {
    /// Create a binding over a write action. The invalidation set starts
    /// empty; declare prefixes with [`MutationBinding::invalidating`].
    pub fn new<F, Fut>(store: Arc<CacheStore>, action: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SyncResult<O>> + Send + 'static,
    {
        Self {
            action: Arc::new(move |input| {
                Box::pin(action(input)) as BoxFuture<'static, SyncResult<O>>
            }),
            invalidates: Vec::new(),
            store,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Declare a cache-key prefix this write can affect.
    pub fn invalidating(mut self, prefix: CacheKey) -> Self {
        self.invalidates.push(prefix);
        self
    }

    /// Declare several prefixes at once.
    pub fn invalidating_all(mut self, prefixes: impl IntoIterator<Item = CacheKey>) -> Self {
        self.invalidates.extend(prefixes);
        self
    }

    /// The declared invalidation set.
    pub fn invalidation_set(&self) -> &[CacheKey] {
        &self.invalidates
    }

    /// Whether a mutate call is currently in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Execute the write.
    ///
    /// On success the declared prefixes are invalidated, strictly after the
    /// success is observed. On failure the error propagates unchanged and
    /// the cache is left untouched.
    pub async fn mutate(&self, input: I) -> SyncResult<O> {
        self.pending.store(true, Ordering::SeqCst);
        let result = (self.action)(input).await;
        match result {
            Ok(output) => {
                for prefix in &self.invalidates {
                    let marked = self.store.invalidate(prefix);
                    debug!(prefix = %prefix, marked, "mutation invalidated prefix");
                }
                self.pending.store(false, Ordering::SeqCst);
                Ok(output)
            }
            Err(e) => {
                self.pending.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }
}

impl<I, O> Clone for MutationBinding<I, O> {
    fn clone(&self) -> Self {
        Self {
            action: Arc::clone(&self.action),
            invalidates: self.invalidates.clone(),
            store: Arc::clone(&self.store),
            pending: Arc::clone(&self.pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::store::FetchOptions;
    use std::time::Duration;
    use tandem_core::{ActorError, EntityKind, Principal, SyncError};

    fn store() -> Arc<CacheStore> {
        Arc::new(CacheStore::new(Arc::new(SystemClock)))
    }

    fn seeded_key() -> CacheKey {
        CacheKey::caller(EntityKind::YearlyPlanner, &Principal::from_text("alice"))
    }

    async fn seed(store: &CacheStore, key: &CacheKey) {
        store
            .ensure_fresh(
                key.clone(),
                || async { Ok(1u32) },
                FetchOptions::with_stale_time(Duration::from_secs(3600)),
            )
            .await
            .expect("seed fetch should succeed");
    }

    #[tokio::test]
    async fn test_success_invalidates_declared_prefixes_only() {
        let store = store();
        let key = seeded_key();
        let other = CacheKey::caller(EntityKind::Profile, &Principal::from_text("alice"));
        seed(&store, &key).await;
        seed(&store, &other).await;

        let binding: MutationBinding<u32, ()> =
            MutationBinding::new(Arc::clone(&store), |_input| async { Ok(()) })
                .invalidating(CacheKey::root(EntityKind::YearlyPlanner));

        binding.mutate(5).await.expect("mutation should succeed");

        assert!(store.get(&key).expect("entry").is_invalidated);
        assert!(!store.get(&other).expect("entry").is_invalidated);
    }

    #[tokio::test]
    async fn test_failure_propagates_and_leaves_cache_untouched() {
        let store = store();
        let key = seeded_key();
        seed(&store, &key).await;

        let binding: MutationBinding<(), ()> =
            MutationBinding::new(Arc::clone(&store), |_| async {
                Err(SyncError::Actor(ActorError::Unavailable))
            })
            .invalidating(CacheKey::root(EntityKind::YearlyPlanner));

        let err = binding.mutate(()).await.expect_err("failure should propagate");
        assert!(err.is_transient());
        assert!(!store.get(&key).expect("entry").is_invalidated);
        assert!(!binding.is_pending());
    }

    #[tokio::test]
    async fn test_structured_refusal_passes_through_unchanged() {
        let store = store();
        let binding: MutationBinding<(), ()> =
            MutationBinding::new(Arc::clone(&store), |_| async {
                Err(SyncError::Link(
                    tandem_core::CoupleLinkError::PartnerAlreadyLinked,
                ))
            })
            .invalidating(CacheKey::root(EntityKind::Couple));

        let err = binding.mutate(()).await.expect_err("refusal should propagate");
        assert_eq!(
            err,
            SyncError::Link(tandem_core::CoupleLinkError::PartnerAlreadyLinked)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_is_pending_during_flight() {
        let store = store();
        let binding: MutationBinding<(), ()> =
            MutationBinding::new(Arc::clone(&store), |_| async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(())
            });

        let observer = binding.clone();
        let task = tokio::spawn(async move { binding.mutate(()).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(observer.is_pending());

        task.await
            .expect("task should not panic")
            .expect("mutation should succeed");
        assert!(!observer.is_pending());
    }
}
