//! Identity-provider boundary.
//!
//! Login and logout live in an external identity system; this layer only
//! consumes the current principal and reacts to changes by re-keying the
//! cache. Caller- and partner-scoped keys embed the principal text, so a
//! new login naturally maps to fresh entries; dropping the old principal's
//! entries keeps the store from accumulating dead sessions.

use crate::key::CacheKey;
use crate::store::CacheStore;
use tandem_core::{EntityKind, Principal};
use tracing::debug;

/// Source of the authenticated principal, if any.
pub trait IdentityProvider: Send + Sync {
    /// The current principal, or `None` while logged out or still
    /// resolving. Bindings that depend on the caller report not-fetched in
    /// the `None` state rather than fetching as an anonymous principal.
    fn current(&self) -> Option<Principal>;
}

/// Drop every principal-scoped cache entry after a login or logout.
///
/// The daily quote is keyed by day-of-year only and survives. Returns how
/// many entries were dropped.
pub fn rekey_on_identity_change(store: &CacheStore) -> usize {
    let mut dropped = 0;
    for kind in EntityKind::principal_scoped() {
        dropped += store.remove_prefix(&CacheKey::root(*kind));
    }
    debug!(dropped, "identity changed; principal-scoped cache dropped");
    dropped
}
