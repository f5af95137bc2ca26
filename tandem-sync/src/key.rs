//! Structured cache keys with tuple-prefix invalidation.
//!
//! A key is an entity tag followed by an ordered list of discriminating
//! segments: an owner-scope tag (caller / partner / explicit owner) plus the
//! natural key of the read. Every parameter the underlying read depends on
//! appears in the key, so two reads that can return different data can never
//! share an entry.

use std::fmt;
use tandem_core::{EntityKind, Principal};

/// Owner-scope tag segment for caller-resolved reads.
const SCOPE_CALLER: &str = "caller";
/// Owner-scope tag segment for partner-resolved reads.
const SCOPE_PARTNER: &str = "partner";
/// Owner-scope tag segment for reads of an explicitly named owner.
const SCOPE_OWNER: &str = "owner";

/// One discriminating value inside a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeySegment {
    Text(String),
    Int(i64),
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySegment::Text(s) => f.write_str(s),
            KeySegment::Int(n) => write!(f, "{n}"),
        }
    }
}

/// A structured cache key: entity tag plus ordered segments.
///
/// A `CacheKey` with fewer segments acts as a prefix of any key of the same
/// tag that extends it; invalidation operates on such prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: EntityKind,
    segments: Vec<KeySegment>,
}

impl CacheKey {
    /// Prefix covering every scope and natural key of an entity tag.
    pub fn root(kind: EntityKind) -> Self {
        Self {
            kind,
            segments: Vec::new(),
        }
    }

    /// Key scope for data the actor resolves to the calling principal.
    ///
    /// The caller's principal text is part of the key: after a login change
    /// the same read maps to a different entry.
    pub fn caller(kind: EntityKind, me: &Principal) -> Self {
        Self::root(kind)
            .with_text(SCOPE_CALLER)
            .with_text(me.as_text())
    }

    /// Key scope for data the actor resolves to the caller's partner.
    ///
    /// Partner reads are a distinct data set from owner reads of the same
    /// principal (the backend filters them), so they carry their own scope
    /// tag.
    pub fn partner(kind: EntityKind, partner: &Principal) -> Self {
        Self::root(kind)
            .with_text(SCOPE_PARTNER)
            .with_text(partner.as_text())
    }

    /// Prefix covering every partner-scoped entry of an entity tag.
    pub fn partner_prefix(kind: EntityKind) -> Self {
        Self::root(kind).with_text(SCOPE_PARTNER)
    }

    /// Key scope for a read of an explicitly named owner.
    pub fn owner(kind: EntityKind, owner: &Principal) -> Self {
        Self::root(kind)
            .with_text(SCOPE_OWNER)
            .with_text(owner.as_text())
    }

    /// Append a text segment.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(KeySegment::Text(text.into()));
        self
    }

    /// Append an integer segment (natural keys: date, year, week, month).
    pub fn with_num(mut self, value: i64) -> Self {
        self.segments.push(KeySegment::Int(value));
        self
    }

    /// The entity tag of this key.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The discriminating segments of this key.
    pub fn segments(&self) -> &[KeySegment] {
        &self.segments
    }

    /// Whether this key starts with the given prefix.
    ///
    /// A prefix matches when the entity tags are equal and its segments are
    /// a leading run of this key's segments. Every key is a prefix of
    /// itself.
    pub fn starts_with(&self, prefix: &CacheKey) -> bool {
        self.kind == prefix.kind
            && self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn kind_strategy() -> impl Strategy<Value = EntityKind> {
        prop_oneof![
            Just(EntityKind::Profile),
            Just(EntityKind::Couple),
            Just(EntityKind::VisionBoard),
            Just(EntityKind::DailyPlanner),
            Just(EntityKind::WeeklyPlanner),
            Just(EntityKind::MonthlyPlanner),
            Just(EntityKind::YearlyPlanner),
            Just(EntityKind::DailyJournal),
            Just(EntityKind::EmotionalJournal),
            Just(EntityKind::NightReflection),
            Just(EntityKind::GrowthJournal),
            Just(EntityKind::DailyQuote),
        ]
    }

    fn segment_strategy() -> impl Strategy<Value = KeySegment> {
        prop_oneof![
            "[a-z0-9-]{1,12}".prop_map(KeySegment::Text),
            any::<i64>().prop_map(KeySegment::Int),
        ]
    }

    fn build(kind: EntityKind, segments: &[KeySegment]) -> CacheKey {
        segments.iter().fold(CacheKey::root(kind), |key, segment| {
            match segment {
                KeySegment::Text(text) => key.with_text(text.clone()),
                KeySegment::Int(value) => key.with_num(*value),
            }
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Property: appending segments preserves every shorter form of the
        /// key as a prefix.
        #[test]
        fn prop_extension_preserves_prefixes(
            kind in kind_strategy(),
            segments in proptest::collection::vec(segment_strategy(), 0..5),
        ) {
            let full = build(kind, &segments);
            for cut in 0..=segments.len() {
                let prefix = build(kind, &segments[..cut]);
                prop_assert!(full.starts_with(&prefix));
            }
        }

        /// Property: keys never match a prefix of a different entity tag,
        /// whatever the segments.
        #[test]
        fn prop_distinct_tags_never_match(
            kind_a in kind_strategy(),
            kind_b in kind_strategy(),
            segments in proptest::collection::vec(segment_strategy(), 0..5),
        ) {
            prop_assume!(kind_a != kind_b);
            let key = build(kind_a, &segments);
            let prefix = build(kind_b, &segments);
            prop_assert!(!key.starts_with(&prefix));
        }

        /// Property: a longer key is never a prefix of a shorter one.
        #[test]
        fn prop_longer_key_is_not_a_prefix(
            kind in kind_strategy(),
            segments in proptest::collection::vec(segment_strategy(), 0..4),
            extra in segment_strategy(),
        ) {
            let short = build(kind, &segments);
            let long = match &extra {
                KeySegment::Text(text) => short.clone().with_text(text.clone()),
                KeySegment::Int(value) => short.clone().with_num(*value),
            };
            prop_assert!(!short.starts_with(&long));
        }
    }
}
