//! Remote planner actor boundary.
//!
//! The actor is the external backend: an opaque collection of async
//! request/response operations. Reads have no side effects and model
//! absence as `None`/empty, never as an error. Writes are at-least-once;
//! the client never assumes idempotency, so every write's invalidation set
//! is applied only after an observed success.
//!
//! This is the single supported contract revision: caller- and
//! partner-scoped reads resolve the principal on the actor side, and couple
//! creation reports refusals as a structured [`CoupleLinkError`], not as
//! message text.

use async_trait::async_trait;
use tandem_core::{
    ActorError, Couple, CoupleLinkError, DailyJournalEntry, DailyPlannerEntry, DateKey,
    EmotionalJournalEntry, GrowthJournalEntry, MonthlyEntry, NightReflectionEntry, Principal,
    UserProfile, VisionBoardEntry, WeeklyEntry, YearlyEntry,
};

/// Result type for actor calls: transport failures only. Domain refusals
/// ride inside the success value where an operation has them.
pub type ActorResult<T> = Result<T, ActorError>;

/// Outcome of a couple-link write: linked, or refused for a structured
/// reason the caller must branch on.
pub type LinkOutcome = Result<(), CoupleLinkError>;

/// Async operations exposed by the remote planner backend.
#[async_trait]
pub trait PlannerActor: Send + Sync {
    // ========================================================================
    // PROFILE
    // ========================================================================

    /// Profile of the calling principal, or `None` before first save.
    async fn caller_profile(&self) -> ActorResult<Option<UserProfile>>;

    /// Profile of an explicitly named principal.
    ///
    /// By contract this read does not distinguish "no profile" from lookup
    /// trouble; bindings collapse failures to `None`.
    async fn profile_of(&self, principal: &Principal) -> ActorResult<Option<UserProfile>>;

    /// Profile of the caller's linked partner, resolved actor-side.
    async fn partner_profile(&self) -> ActorResult<Option<UserProfile>>;

    /// Create or replace the caller's profile.
    async fn save_profile(&self, profile: UserProfile) -> ActorResult<()>;

    // ========================================================================
    // COUPLE
    // ========================================================================

    /// The couple a principal belongs to, or `None` when unlinked.
    async fn couple_of(&self, principal: &Principal) -> ActorResult<Option<Couple>>;

    /// Link the caller with `partner`. Refusals are structured, not thrown.
    async fn link_couple(&self, partner: &Principal) -> ActorResult<LinkOutcome>;

    /// Dissolve the caller's couple, unlinking both sides atomically.
    /// Returns whether a couple existed.
    async fn dissolve_couple(&self) -> ActorResult<bool>;

    // ========================================================================
    // VISION BOARD
    // ========================================================================

    async fn caller_vision_board(&self) -> ActorResult<Vec<VisionBoardEntry>>;
    async fn partner_vision_board(&self) -> ActorResult<Vec<VisionBoardEntry>>;
    async fn save_vision_entry(&self, entry: VisionBoardEntry) -> ActorResult<()>;
    async fn delete_vision_entry(&self, target_year: i32) -> ActorResult<()>;

    /// Set the progress percentage of one goal by its target year.
    ///
    /// Safe to call when no full entry exists for the year yet; the backend
    /// defines the semantics of that case.
    async fn update_vision_progress(&self, target_year: i32, progress: u8) -> ActorResult<()>;

    // ========================================================================
    // DAILY PLANNER
    // ========================================================================

    async fn caller_daily_entries(&self) -> ActorResult<Vec<DailyPlannerEntry>>;
    async fn partner_daily_entries(&self) -> ActorResult<Vec<DailyPlannerEntry>>;
    async fn partner_daily_entry_for(&self, date: DateKey)
        -> ActorResult<Option<DailyPlannerEntry>>;
    async fn save_daily_entry(&self, entry: DailyPlannerEntry) -> ActorResult<()>;
    async fn delete_daily_entry(&self, date: DateKey) -> ActorResult<()>;

    /// Set the water intake of one day.
    ///
    /// Like vision progress, this must be safe without a prior full entry.
    async fn update_water_intake(&self, date: DateKey, intake: u32) -> ActorResult<()>;

    // ========================================================================
    // WEEKLY / MONTHLY / YEARLY PLANNERS
    // ========================================================================

    async fn caller_weekly_entries(&self) -> ActorResult<Vec<WeeklyEntry>>;
    async fn partner_weekly_entries(&self) -> ActorResult<Vec<WeeklyEntry>>;
    async fn save_weekly_entry(&self, entry: WeeklyEntry) -> ActorResult<()>;
    async fn delete_weekly_entry(&self, year: i32, week: u32) -> ActorResult<()>;

    async fn caller_monthly_entries(&self) -> ActorResult<Vec<MonthlyEntry>>;
    async fn partner_monthly_entries(&self) -> ActorResult<Vec<MonthlyEntry>>;
    async fn save_monthly_entry(&self, entry: MonthlyEntry) -> ActorResult<()>;
    async fn delete_monthly_entry(&self, year: i32, month: u32) -> ActorResult<()>;

    async fn caller_yearly_entries(&self) -> ActorResult<Vec<YearlyEntry>>;
    async fn partner_yearly_entries(&self) -> ActorResult<Vec<YearlyEntry>>;
    async fn save_yearly_entry(&self, entry: YearlyEntry) -> ActorResult<()>;
    async fn delete_yearly_entry(&self, year: i32) -> ActorResult<()>;

    // ========================================================================
    // JOURNALS
    // ========================================================================

    async fn caller_daily_journals(&self) -> ActorResult<Vec<DailyJournalEntry>>;
    async fn partner_daily_journals(&self) -> ActorResult<Vec<DailyJournalEntry>>;
    async fn save_daily_journal(&self, entry: DailyJournalEntry) -> ActorResult<()>;

    async fn caller_emotional_journals(&self) -> ActorResult<Vec<EmotionalJournalEntry>>;
    async fn partner_emotional_journals(&self) -> ActorResult<Vec<EmotionalJournalEntry>>;
    async fn save_emotional_journal(&self, entry: EmotionalJournalEntry) -> ActorResult<()>;

    async fn caller_night_reflections(&self) -> ActorResult<Vec<NightReflectionEntry>>;
    async fn partner_night_reflections(&self) -> ActorResult<Vec<NightReflectionEntry>>;
    async fn save_night_reflection(&self, entry: NightReflectionEntry) -> ActorResult<()>;

    async fn caller_growth_journals(&self) -> ActorResult<Vec<GrowthJournalEntry>>;
    async fn partner_growth_journals(&self) -> ActorResult<Vec<GrowthJournalEntry>>;
    async fn save_growth_journal(&self, entry: GrowthJournalEntry) -> ActorResult<()>;

    // ========================================================================
    // QUOTES
    // ========================================================================

    /// Inspirational quote for a 1-based day of the year.
    async fn daily_quote(&self, day_of_year: u32) -> ActorResult<String>;
}
