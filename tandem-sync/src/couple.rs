//! Couple-resolution overlay.
//!
//! Derives, from the caller's principal and the cached couple record,
//! whether a partner exists and who it is, and gates partner-scoped
//! bindings on that resolution. A failed couple fetch degrades to "no
//! partner"; it never surfaces as an error to partner-scoped consumers.

use crate::query::QuerySnapshot;
use tandem_core::{Couple, Principal};
use tracing::debug;

/// Session-scoped partner resolution state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CoupleResolution {
    /// Identity unavailable, couple not yet fetched, or the fetch failed.
    /// Treated as "no partner" until re-resolution.
    #[default]
    Unresolved,
    /// The couple read succeeded and returned none: no partner is linked.
    Single,
    /// The caller is one side of a couple; `partner` is the other side.
    Paired { partner: Principal },
}

impl CoupleResolution {
    /// Resolve from a completed couple-query snapshot.
    ///
    /// - identity pending or query not fetched ⇒ `Unresolved`
    /// - query error ⇒ `Unresolved` (degrade, never throw)
    /// - `None` couple ⇒ `Single`
    /// - couple containing `me` ⇒ `Paired` with the other side
    /// - couple not containing `me` (inconsistent backend data) ⇒ `Single`
    pub fn from_snapshot(
        snapshot: &QuerySnapshot<Option<Couple>>,
        me: Option<&Principal>,
    ) -> Self {
        let Some(me) = me else {
            return CoupleResolution::Unresolved;
        };
        if snapshot.error.is_some() {
            debug!("couple fetch failed; degrading to no partner");
            return CoupleResolution::Unresolved;
        }
        if !snapshot.is_fetched {
            return CoupleResolution::Unresolved;
        }
        match snapshot.data.as_ref().and_then(|couple| couple.as_ref()) {
            None => CoupleResolution::Single,
            Some(couple) => match couple.partner_of(me) {
                Some(partner) => CoupleResolution::Paired {
                    partner: partner.clone(),
                },
                None => {
                    debug!("couple record does not contain caller; treating as single");
                    CoupleResolution::Single
                }
            },
        }
    }

    /// The resolved partner, if any.
    pub fn partner(&self) -> Option<&Principal> {
        match self {
            CoupleResolution::Paired { partner } => Some(partner),
            _ => None,
        }
    }

    /// Whether partner-scoped bindings may run.
    pub fn partner_enabled(&self) -> bool {
        matches!(self, CoupleResolution::Paired { .. })
    }
}
