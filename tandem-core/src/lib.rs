//! Tandem Core - Data Types and Natural Keys
//!
//! Pure data structures and pure functions with no I/O. All other crates
//! depend on this: domain entities mirroring the planner backend's wire
//! format, structured error enums, and the natural-key encoders shared by
//! every planner/journal/vision-board binding.

pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod keys;

pub use entities::{
    Budget, Couple, DailyJournalEntry, DailyPlannerEntry, EmotionalJournalEntry,
    GrowthJournalEntry, HabitWeekly, HabitYearly, ImportantDate, MonthlyEntry,
    NightReflectionEntry, ScheduleItem, Task, UserProfile, VisionBoardEntry, WeeklyEntry,
    YearlyEntry,
};
pub use enums::{EmotionTag, EntityKind, GoalCategory, GrowthArea};
pub use error::{ActorError, CoupleLinkError, IdentityError, SyncError, SyncResult};
pub use identity::{Principal, Timestamp};
pub use keys::{day_of_year, DateKey, IsoWeek, MonthKey};
