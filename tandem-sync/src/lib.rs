//! Tandem Sync - Client Data-Synchronization Layer
//!
//! The layer between UI forms and the remote planner actor: a process-wide
//! cache store with explicit freshness and single-flight fetches,
//! declarative query/mutation bindings per entity, and the couple-resolution
//! overlay gating partner-scoped reads.
//!
//! # Data flow
//!
//! ```text
//! UI action → MutationBinding → actor write
//!     → on success: invalidate declared prefixes
//!     → dependent QueryBindings refetch lazily
//!     → UI re-renders from CacheStore reads / change events
//! ```
//!
//! # Key Types
//!
//! - [`CacheStore`]: the only shared mutable state in this layer
//! - [`QueryBinding`] / [`QuerySnapshot`]: the read contract
//! - [`MutationBinding`]: the write contract with declared invalidation
//! - [`CoupleResolution`]: partner derivation and gating
//! - [`SyncClient`]: per-entity binding definitions
//!
//! # Traits
//!
//! - [`PlannerActor`]: the remote backend boundary
//! - [`IdentityProvider`]: the authenticated-principal boundary
//! - [`Clock`]: injectable time source for staleness

pub mod actor;
pub mod bindings;
pub mod clock;
pub mod config;
pub mod couple;
pub mod identity;
pub mod key;
pub mod mutation;
pub mod query;
pub mod store;

pub use actor::{ActorResult, LinkOutcome, PlannerActor};
pub use bindings::SyncClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SyncConfig;
pub use couple::CoupleResolution;
pub use identity::{rekey_on_identity_change, IdentityProvider};
pub use key::{CacheKey, KeySegment};
pub use mutation::MutationBinding;
pub use query::{BoxFuture, QueryBinding, QuerySnapshot};
pub use store::{
    CacheChange, CacheEntry, CacheEvent, CacheStats, CacheStore, FetchOptions, FetchOutcome,
};

// Re-export core types for convenience
pub use tandem_core::{
    ActorError, Couple, CoupleLinkError, DateKey, EntityKind, IsoWeek, MonthKey, Principal,
    SyncError, SyncResult,
};
