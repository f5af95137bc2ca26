//! Error types for Tandem sync operations

use thiserror::Error;

/// Transport-level errors from the remote planner actor.
///
/// These are the transient/infrastructure failures: the actor itself never
/// models absence as an error (a missing couple, entry, or profile is a
/// successful `None`/empty read).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActorError {
    #[error("Planner actor unavailable")]
    Unavailable,

    #[error("Transport failure: {reason}")]
    Transport { reason: String },

    #[error("Call rejected by actor: {reason}")]
    Rejected { reason: String },
}

/// Structured reasons a couple-link request can be refused.
///
/// Callers branch on the variant, never on message text, to choose recovery
/// UI (e.g. offering to dissolve an existing link before retrying).
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CoupleLinkError {
    #[error("Caller is already linked to a partner")]
    CallerAlreadyLinked,

    #[error("Requested partner is already linked")]
    PartnerAlreadyLinked,

    #[error("Anonymous principals cannot be linked")]
    AnonymousNotPermitted,

    #[error("Caller is not authorized to create this link")]
    Unauthorized,
}

/// Identity-provider errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("No authenticated principal; identity resolution pending or logged out")]
    Anonymous,
}

/// Master error type for the sync layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("Actor error: {0}")]
    Actor(#[from] ActorError),

    #[error("Couple link refused: {0}")]
    Link(#[from] CoupleLinkError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Cached value for {key} did not decode: {reason}")]
    Decode { key: String, reason: String },
}

impl SyncError {
    /// Whether this failure is transient infrastructure trouble, as opposed
    /// to an authorization/business refusal the caller must branch on.
    pub fn is_transient(&self) -> bool {
        matches!(self, SyncError::Actor(_))
    }
}

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
