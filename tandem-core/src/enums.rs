//! Enum types shared across the Tandem client

use serde::{Deserialize, Serialize};

/// Entity tag discriminating cached data sets.
///
/// Every cache key starts with one of these tags; invalidating a tag-wide
/// prefix marks every scope (caller, partner, explicit owner) of that
/// entity stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Profile,
    Couple,
    VisionBoard,
    DailyPlanner,
    WeeklyPlanner,
    MonthlyPlanner,
    YearlyPlanner,
    DailyJournal,
    EmotionalJournal,
    NightReflection,
    GrowthJournal,
    DailyQuote,
}

impl EntityKind {
    /// All entity tags that hold per-principal data.
    ///
    /// `DailyQuote` is excluded: it is keyed by day-of-year only and
    /// survives identity changes.
    pub fn principal_scoped() -> &'static [EntityKind] {
        &[
            EntityKind::Profile,
            EntityKind::Couple,
            EntityKind::VisionBoard,
            EntityKind::DailyPlanner,
            EntityKind::WeeklyPlanner,
            EntityKind::MonthlyPlanner,
            EntityKind::YearlyPlanner,
            EntityKind::DailyJournal,
            EntityKind::EmotionalJournal,
            EntityKind::NightReflection,
            EntityKind::GrowthJournal,
        ]
    }

    /// The entry tags a couple dissolution can affect on the partner side:
    /// the vision board, the four planner periods, and the four journals.
    pub fn partner_entry_kinds() -> &'static [EntityKind] {
        &[
            EntityKind::VisionBoard,
            EntityKind::DailyPlanner,
            EntityKind::WeeklyPlanner,
            EntityKind::MonthlyPlanner,
            EntityKind::YearlyPlanner,
            EntityKind::DailyJournal,
            EntityKind::EmotionalJournal,
            EntityKind::NightReflection,
            EntityKind::GrowthJournal,
        ]
    }
}

/// Life area a vision-board goal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalCategory {
    Relationship,
    Spiritual,
    Travel,
    PersonalGrowth,
    Career,
    Financial,
    Health,
}

/// Emotion recorded in an emotional-journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmotionTag {
    Sad,
    Fearful,
    Content,
    Anxious,
    Happy,
    Angry,
    Disappointed,
    Calm,
    Grateful,
    Peaceful,
    Overwhelmed,
    Motivated,
    Frustrated,
    Excited,
    Optimistic,
}

/// Growth area tracked by the growth journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GrowthArea {
    Spiritual,
    Mindset,
    Career,
    Relationships,
    Health,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_category_camel_case_wire_form() {
        let json = serde_json::to_string(&GoalCategory::PersonalGrowth)
            .expect("serialize should succeed");
        assert_eq!(json, "\"personalGrowth\"");

        let back: GoalCategory =
            serde_json::from_str("\"relationship\"").expect("deserialize should succeed");
        assert_eq!(back, GoalCategory::Relationship);
    }

    #[test]
    fn test_emotion_tag_roundtrip() {
        let json = serde_json::to_string(&EmotionTag::Overwhelmed)
            .expect("serialize should succeed");
        let back: EmotionTag = serde_json::from_str(&json).expect("deserialize should succeed");
        assert_eq!(back, EmotionTag::Overwhelmed);
    }

    #[test]
    fn test_partner_entry_kinds_cover_all_entry_types() {
        let kinds = EntityKind::partner_entry_kinds();
        assert_eq!(kinds.len(), 9);
        assert!(!kinds.contains(&EntityKind::Couple));
        assert!(!kinds.contains(&EntityKind::Profile));
        assert!(!kinds.contains(&EntityKind::DailyQuote));
    }
}
