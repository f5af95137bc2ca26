//! Tandem domain entities
//!
//! Pure data structures mirroring the planner backend's wire format. All
//! entries are owned by exactly one principal and keyed by a natural key
//! scoped to that owner; mutation is always create-or-replace by
//! owner + natural key.

use crate::enums::{EmotionTag, GoalCategory, GrowthArea};
use crate::identity::Principal;
use crate::keys::DateKey;
use serde::{Deserialize, Serialize};

// ============================================================================
// PROFILE & COUPLE
// ============================================================================

/// Per-principal profile, created by an explicit save on first login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub display_name: String,
}

/// A symmetric link between exactly two principals.
///
/// The pair is unordered: the caller may be stored in either slot, so
/// partner derivation must check both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Couple {
    pub partner_a: Principal,
    pub partner_b: Principal,
}

impl Couple {
    /// Create a couple record from its two members.
    pub fn new(partner_a: Principal, partner_b: Principal) -> Self {
        Self { partner_a, partner_b }
    }

    /// Whether the given principal is one side of this couple.
    pub fn contains(&self, principal: &Principal) -> bool {
        &self.partner_a == principal || &self.partner_b == principal
    }

    /// The other side of the pair, regardless of slot order.
    ///
    /// Returns `None` when `me` is not a member of this couple.
    pub fn partner_of(&self, me: &Principal) -> Option<&Principal> {
        if &self.partner_a == me {
            Some(&self.partner_b)
        } else if &self.partner_b == me {
            Some(&self.partner_a)
        } else {
            None
        }
    }
}

// ============================================================================
// SUPPORTING RECORDS
// ============================================================================

/// A checkable task line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub description: String,
    pub is_complete: bool,
}

/// One time block in a daily schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub time_block: String,
    pub activity: String,
}

/// A habit tracked across the seven days of one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitWeekly {
    pub name: String,
    pub daily_check_ins: Vec<bool>,
}

/// A habit tracked across the twelve months of one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitYearly {
    pub name: String,
    pub monthly_check_ins: Vec<bool>,
}

/// Monthly budget block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub income: i64,
    pub expenses: Vec<String>,
    pub notes: String,
}

/// A labeled date inside a monthly plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportantDate {
    pub date: DateKey,
    pub label_text: String,
}

// ============================================================================
// PLANNER & VISION BOARD ENTRIES
// ============================================================================

/// Vision-board goal; at most one per (owner, target year).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionBoardEntry {
    pub target_year: i32,
    pub category: GoalCategory,
    pub why_this_matters: String,
    pub milestones: Vec<String>,
    pub progress_percentage: u8,
}

/// Daily plan keyed by (owner, calendar date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlannerEntry {
    pub date: DateKey,
    pub schedule: Vec<ScheduleItem>,
    pub tasks: Vec<Task>,
    pub gratitude_entries: Vec<String>,
    pub journal_entry: String,
    pub water_intake: u32,
    pub mood_emoji: String,
    pub notes: String,
}

/// Weekly plan keyed by (owner, ISO year + week number).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyEntry {
    pub year: i32,
    pub week_number: u32,
    pub priorities: Vec<Task>,
    pub habit_tracker: Vec<HabitWeekly>,
    pub todos: Vec<Task>,
    pub energy_rating: u8,
    pub reflection: String,
}

/// Monthly plan keyed by (owner, year + month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEntry {
    pub year: i32,
    pub month: u32,
    pub goals: Vec<Task>,
    pub important_dates: Vec<ImportantDate>,
    pub budget: Budget,
    pub mood_tracker: Vec<String>,
    pub reflection: String,
}

/// Yearly plan keyed by (owner, year).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyEntry {
    pub year: i32,
    pub word_of_the_year: String,
    pub major_goals: Vec<Task>,
    pub habit_tracker: Vec<HabitYearly>,
    pub vision_images: Vec<String>,
    pub reflection: String,
}

// ============================================================================
// JOURNAL ENTRIES
// ============================================================================
//
// All four journal types are keyed by (owner, calendar date) and carry an
// is_public flag; the backend only shares public entries with a partner.

/// Free-form daily journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyJournalEntry {
    pub date: DateKey,
    pub body: String,
    pub is_public: bool,
}

/// Emotional check-in journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalJournalEntry {
    pub date: DateKey,
    pub emotion: EmotionTag,
    pub intensity: u8,
    pub trigger: String,
    pub reflection: String,
    pub is_public: bool,
}

/// Evening reflection journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightReflectionEntry {
    pub date: DateKey,
    pub gratitude: String,
    pub highlights: Vec<String>,
    pub improvements: String,
    pub intention: String,
    pub is_public: bool,
}

/// Personal-growth journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthJournalEntry {
    pub date: DateKey,
    pub growth_area: GrowthArea,
    pub lesson: String,
    pub action_step: String,
    pub growth_rating: u8,
    pub is_public: bool,
}
