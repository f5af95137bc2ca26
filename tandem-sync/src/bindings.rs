//! Per-entity query and mutation bindings.
//!
//! [`SyncClient`] is the surface the rest of the application talks to: one
//! constructor per read and write, each declaring its cache key, enablement,
//! staleness window, retry policy, and invalidation set. UI code consumes
//! the returned [`QueryBinding`]/[`MutationBinding`] handles and never
//! touches the store directly.

use crate::actor::{ActorResult, PlannerActor};
use crate::clock::Clock;
use crate::config::SyncConfig;
use crate::couple::CoupleResolution;
use crate::identity::IdentityProvider;
use crate::key::CacheKey;
use crate::mutation::MutationBinding;
use crate::query::QueryBinding;
use crate::store::CacheStore;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tandem_core::{
    day_of_year, Couple, DailyJournalEntry, DailyPlannerEntry, DateKey, EmotionalJournalEntry,
    EntityKind, GrowthJournalEntry, MonthlyEntry, NightReflectionEntry, Principal, SyncError,
    SyncResult, UserProfile, VisionBoardEntry, WeeklyEntry, YearlyEntry,
};

/// Placeholder scope segment for bindings constructed while logged out.
/// Such bindings are disabled and never touch the store.
const SCOPE_PENDING: &str = "caller";

/// The application-facing binding surface.
///
/// One instance per running client, sharing one [`CacheStore`].
pub struct SyncClient {
    store: Arc<CacheStore>,
    actor: Arc<dyn PlannerActor>,
    identity: Arc<dyn IdentityProvider>,
    config: SyncConfig,
}

impl SyncClient {
    /// Build a client over an actor and identity provider with default
    /// configuration.
    pub fn new(
        actor: Arc<dyn PlannerActor>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_config(actor, identity, clock, SyncConfig::default())
    }

    /// Build a client with explicit configuration.
    pub fn with_config(
        actor: Arc<dyn PlannerActor>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
        config: SyncConfig,
    ) -> Self {
        let store = Arc::new(CacheStore::with_event_capacity(clock, config.event_capacity));
        Self {
            store,
            actor,
            identity,
            config,
        }
    }

    /// The shared cache store (UI subscriptions, tests).
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// The current caller principal, if identity has resolved.
    pub fn current_principal(&self) -> Option<Principal> {
        self.identity.current()
    }

    /// React to a login/logout: drop every principal-scoped cache entry.
    pub fn handle_identity_change(&self) -> usize {
        crate::identity::rekey_on_identity_change(&self.store)
    }

    // ========================================================================
    // SCOPE HELPERS
    // ========================================================================

    fn caller_scope(&self, kind: EntityKind) -> (CacheKey, bool) {
        match self.identity.current() {
            Some(me) => (CacheKey::caller(kind, &me), true),
            None => (CacheKey::root(kind).with_text(SCOPE_PENDING), false),
        }
    }

    fn partner_scope(&self, kind: EntityKind, resolution: &CoupleResolution) -> (CacheKey, bool) {
        match resolution.partner() {
            Some(partner) => (CacheKey::partner(kind, partner), true),
            None => (CacheKey::partner_prefix(kind), false),
        }
    }

    /// Caller-scoped read binding; disabled while identity is pending so no
    /// fetch ever runs as an anonymous principal.
    fn caller_query<T, F, Fut>(&self, kind: EntityKind, retry: bool, fetch: F) -> QueryBinding<T>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(Arc<dyn PlannerActor>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActorResult<T>> + Send + 'static,
    {
        let (key, enabled) = self.caller_scope(kind);
        self.query(key, enabled, retry, fetch)
    }

    /// Partner-scoped read binding; enabled only under a paired resolution.
    fn partner_query<T, F, Fut>(
        &self,
        kind: EntityKind,
        resolution: &CoupleResolution,
        fetch: F,
    ) -> QueryBinding<T>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(Arc<dyn PlannerActor>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActorResult<T>> + Send + 'static,
    {
        let (key, enabled) = self.partner_scope(kind, resolution);
        // Partner reads legitimately fail while unlinked; never retried.
        self.query(key, enabled, false, fetch)
    }

    fn query<T, F, Fut>(
        &self,
        key: CacheKey,
        enabled: bool,
        retry: bool,
        fetch: F,
    ) -> QueryBinding<T>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(Arc<dyn PlannerActor>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActorResult<T>> + Send + 'static,
    {
        let actor = Arc::clone(&self.actor);
        QueryBinding::new(key, move || {
            let fut = fetch(Arc::clone(&actor));
            async move { fut.await.map_err(SyncError::from) }
        })
        .enabled(enabled)
        .retry(retry)
        .retry_attempts(self.config.retry_attempts)
        .stale_time(self.config.default_stale_time)
    }

    fn mutation<I, O, F, Fut>(&self, action: F) -> MutationBinding<I, O>
    where
        F: Fn(Arc<dyn PlannerActor>, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SyncResult<O>> + Send + 'static,
    {
        let actor = Arc::clone(&self.actor);
        MutationBinding::new(Arc::clone(&self.store), move |input| {
            action(Arc::clone(&actor), input)
        })
    }

    // ========================================================================
    // PROFILE
    // ========================================================================

    /// The caller's own profile; `None` until first save.
    pub fn caller_profile(&self) -> QueryBinding<Option<UserProfile>> {
        self.caller_query(EntityKind::Profile, false, |actor| async move {
            actor.caller_profile().await
        })
    }

    /// Profile of an explicitly named principal.
    ///
    /// Lookup trouble collapses to `None` by contract: this read cannot
    /// distinguish "no profile yet" from a transient failure.
    pub fn profile_of(&self, principal: &Principal) -> QueryBinding<Option<UserProfile>> {
        let key = CacheKey::owner(EntityKind::Profile, principal);
        let target = principal.clone();
        let actor = Arc::clone(&self.actor);
        QueryBinding::new(key, move || {
            let actor = Arc::clone(&actor);
            let target = target.clone();
            async move { Ok(actor.profile_of(&target).await.unwrap_or(None)) }
        })
        .stale_time(self.config.default_stale_time)
    }

    /// The linked partner's profile.
    pub fn partner_profile(
        &self,
        resolution: &CoupleResolution,
    ) -> QueryBinding<Option<UserProfile>> {
        self.partner_query(EntityKind::Profile, resolution, |actor| async move {
            actor.partner_profile().await
        })
    }

    /// Create or replace the caller's profile.
    pub fn save_profile(&self) -> MutationBinding<UserProfile, ()> {
        self.mutation(|actor, profile: UserProfile| async move {
            actor.save_profile(profile).await.map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::Profile))
    }

    // ========================================================================
    // COUPLE
    // ========================================================================

    /// The caller's couple record, if linked.
    pub fn couple(&self) -> QueryBinding<Option<Couple>> {
        let me = self.identity.current();
        let (key, enabled) = self.caller_scope(EntityKind::Couple);
        let actor = Arc::clone(&self.actor);
        QueryBinding::new(key, move || {
            let actor = Arc::clone(&actor);
            let me = me.clone();
            async move {
                match me {
                    Some(me) => actor.couple_of(&me).await.map_err(SyncError::from),
                    None => Ok(None),
                }
            }
        })
        .enabled(enabled)
        .stale_time(self.config.default_stale_time)
    }

    /// Run the couple query and fold the snapshot into a resolution state.
    /// Fetch failures degrade to "no partner"; this never errors.
    pub async fn resolve_couple(&self) -> CoupleResolution {
        let me = self.identity.current();
        let snapshot = self.couple().run(&self.store).await;
        CoupleResolution::from_snapshot(&snapshot, me.as_ref())
    }

    /// Link the caller with a partner. Refusals surface as
    /// `SyncError::Link` carrying the structured reason.
    pub fn link_couple(&self) -> MutationBinding<Principal, ()> {
        self.mutation(|actor, partner: Principal| async move {
            match actor.link_couple(&partner).await? {
                Ok(()) => Ok(()),
                Err(reason) => Err(SyncError::Link(reason)),
            }
        })
        .invalidating(CacheKey::root(EntityKind::Couple))
    }

    /// Dissolve the caller's couple.
    ///
    /// The partner link gates every partner-scoped read, so success
    /// invalidates the couple, the partner profile, and every partner-scoped
    /// entry prefix. The set is symmetric even though only this client
    /// executes the write; the partner's client refetches from its own
    /// stale-marked cache on next use.
    pub fn dissolve_couple(&self) -> MutationBinding<(), bool> {
        self.mutation(|actor, _: ()| async move {
            actor.dissolve_couple().await.map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::Couple))
        .invalidating(CacheKey::partner_prefix(EntityKind::Profile))
        .invalidating_all(
            EntityKind::partner_entry_kinds()
                .iter()
                .map(|kind| CacheKey::partner_prefix(*kind)),
        )
    }

    // ========================================================================
    // VISION BOARD
    // ========================================================================

    pub fn vision_board(&self) -> QueryBinding<Vec<VisionBoardEntry>> {
        self.caller_query(EntityKind::VisionBoard, true, |actor| async move {
            actor.caller_vision_board().await
        })
    }

    pub fn partner_vision_board(
        &self,
        resolution: &CoupleResolution,
    ) -> QueryBinding<Vec<VisionBoardEntry>> {
        self.partner_query(EntityKind::VisionBoard, resolution, |actor| async move {
            actor.partner_vision_board().await
        })
    }

    pub fn save_vision_entry(&self) -> MutationBinding<VisionBoardEntry, ()> {
        self.mutation(|actor, entry: VisionBoardEntry| async move {
            actor.save_vision_entry(entry).await.map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::VisionBoard))
    }

    /// Narrow write: progress percentage of one goal by target year. Safe
    /// to call when no full entry exists for that year.
    pub fn update_vision_progress(&self) -> MutationBinding<(i32, u8), ()> {
        self.mutation(|actor, (target_year, progress): (i32, u8)| async move {
            actor
                .update_vision_progress(target_year, progress)
                .await
                .map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::VisionBoard))
    }

    pub fn delete_vision_entry(&self) -> MutationBinding<i32, ()> {
        self.mutation(|actor, target_year: i32| async move {
            actor
                .delete_vision_entry(target_year)
                .await
                .map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::VisionBoard))
    }

    // ========================================================================
    // DAILY PLANNER
    // ========================================================================

    pub fn daily_planner(&self) -> QueryBinding<Vec<DailyPlannerEntry>> {
        self.caller_query(EntityKind::DailyPlanner, true, |actor| async move {
            actor.caller_daily_entries().await
        })
    }

    pub fn partner_daily_planner(
        &self,
        resolution: &CoupleResolution,
    ) -> QueryBinding<Vec<DailyPlannerEntry>> {
        self.partner_query(EntityKind::DailyPlanner, resolution, |actor| async move {
            actor.partner_daily_entries().await
        })
    }

    /// The partner's plan for one specific date.
    pub fn partner_daily_entry(
        &self,
        resolution: &CoupleResolution,
        date: DateKey,
    ) -> QueryBinding<Option<DailyPlannerEntry>> {
        let (key, enabled) = self.partner_scope(EntityKind::DailyPlanner, resolution);
        let key = key.with_num(i64::from(date.as_u32()));
        let actor = Arc::clone(&self.actor);
        QueryBinding::new(key, move || {
            let actor = Arc::clone(&actor);
            async move {
                actor
                    .partner_daily_entry_for(date)
                    .await
                    .map_err(SyncError::from)
            }
        })
        .enabled(enabled)
        .stale_time(self.config.default_stale_time)
    }

    pub fn save_daily_entry(&self) -> MutationBinding<DailyPlannerEntry, ()> {
        self.mutation(|actor, entry: DailyPlannerEntry| async move {
            actor.save_daily_entry(entry).await.map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::DailyPlanner))
    }

    /// Narrow write: water intake for one date, full entry or not.
    pub fn update_water_intake(&self) -> MutationBinding<(DateKey, u32), ()> {
        self.mutation(|actor, (date, intake): (DateKey, u32)| async move {
            actor
                .update_water_intake(date, intake)
                .await
                .map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::DailyPlanner))
    }

    pub fn delete_daily_entry(&self) -> MutationBinding<DateKey, ()> {
        self.mutation(|actor, date: DateKey| async move {
            actor.delete_daily_entry(date).await.map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::DailyPlanner))
    }

    // ========================================================================
    // WEEKLY PLANNER
    // ========================================================================

    pub fn weekly_planner(&self) -> QueryBinding<Vec<WeeklyEntry>> {
        self.caller_query(EntityKind::WeeklyPlanner, true, |actor| async move {
            actor.caller_weekly_entries().await
        })
    }

    pub fn partner_weekly_planner(
        &self,
        resolution: &CoupleResolution,
    ) -> QueryBinding<Vec<WeeklyEntry>> {
        self.partner_query(EntityKind::WeeklyPlanner, resolution, |actor| async move {
            actor.partner_weekly_entries().await
        })
    }

    pub fn save_weekly_entry(&self) -> MutationBinding<WeeklyEntry, ()> {
        self.mutation(|actor, entry: WeeklyEntry| async move {
            actor.save_weekly_entry(entry).await.map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::WeeklyPlanner))
    }

    pub fn delete_weekly_entry(&self) -> MutationBinding<(i32, u32), ()> {
        self.mutation(|actor, (year, week): (i32, u32)| async move {
            actor
                .delete_weekly_entry(year, week)
                .await
                .map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::WeeklyPlanner))
    }

    // ========================================================================
    // MONTHLY PLANNER
    // ========================================================================

    pub fn monthly_planner(&self) -> QueryBinding<Vec<MonthlyEntry>> {
        self.caller_query(EntityKind::MonthlyPlanner, true, |actor| async move {
            actor.caller_monthly_entries().await
        })
    }

    pub fn partner_monthly_planner(
        &self,
        resolution: &CoupleResolution,
    ) -> QueryBinding<Vec<MonthlyEntry>> {
        self.partner_query(EntityKind::MonthlyPlanner, resolution, |actor| async move {
            actor.partner_monthly_entries().await
        })
    }

    pub fn save_monthly_entry(&self) -> MutationBinding<MonthlyEntry, ()> {
        self.mutation(|actor, entry: MonthlyEntry| async move {
            actor.save_monthly_entry(entry).await.map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::MonthlyPlanner))
    }

    pub fn delete_monthly_entry(&self) -> MutationBinding<(i32, u32), ()> {
        self.mutation(|actor, (year, month): (i32, u32)| async move {
            actor
                .delete_monthly_entry(year, month)
                .await
                .map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::MonthlyPlanner))
    }

    // ========================================================================
    // YEARLY PLANNER
    // ========================================================================

    pub fn yearly_planner(&self) -> QueryBinding<Vec<YearlyEntry>> {
        self.caller_query(EntityKind::YearlyPlanner, true, |actor| async move {
            actor.caller_yearly_entries().await
        })
    }

    pub fn partner_yearly_planner(
        &self,
        resolution: &CoupleResolution,
    ) -> QueryBinding<Vec<YearlyEntry>> {
        self.partner_query(EntityKind::YearlyPlanner, resolution, |actor| async move {
            actor.partner_yearly_entries().await
        })
    }

    pub fn save_yearly_entry(&self) -> MutationBinding<YearlyEntry, ()> {
        self.mutation(|actor, entry: YearlyEntry| async move {
            actor.save_yearly_entry(entry).await.map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::YearlyPlanner))
    }

    pub fn delete_yearly_entry(&self) -> MutationBinding<i32, ()> {
        self.mutation(|actor, year: i32| async move {
            actor.delete_yearly_entry(year).await.map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::YearlyPlanner))
    }

    // ========================================================================
    // JOURNALS
    // ========================================================================

    pub fn daily_journals(&self) -> QueryBinding<Vec<DailyJournalEntry>> {
        self.caller_query(EntityKind::DailyJournal, true, |actor| async move {
            actor.caller_daily_journals().await
        })
    }

    pub fn partner_daily_journals(
        &self,
        resolution: &CoupleResolution,
    ) -> QueryBinding<Vec<DailyJournalEntry>> {
        self.partner_query(EntityKind::DailyJournal, resolution, |actor| async move {
            actor.partner_daily_journals().await
        })
    }

    pub fn save_daily_journal(&self) -> MutationBinding<DailyJournalEntry, ()> {
        self.mutation(|actor, entry: DailyJournalEntry| async move {
            actor.save_daily_journal(entry).await.map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::DailyJournal))
    }

    pub fn emotional_journals(&self) -> QueryBinding<Vec<EmotionalJournalEntry>> {
        self.caller_query(EntityKind::EmotionalJournal, true, |actor| async move {
            actor.caller_emotional_journals().await
        })
    }

    pub fn partner_emotional_journals(
        &self,
        resolution: &CoupleResolution,
    ) -> QueryBinding<Vec<EmotionalJournalEntry>> {
        self.partner_query(EntityKind::EmotionalJournal, resolution, |actor| async move {
            actor.partner_emotional_journals().await
        })
    }

    pub fn save_emotional_journal(&self) -> MutationBinding<EmotionalJournalEntry, ()> {
        self.mutation(|actor, entry: EmotionalJournalEntry| async move {
            actor
                .save_emotional_journal(entry)
                .await
                .map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::EmotionalJournal))
    }

    pub fn night_reflections(&self) -> QueryBinding<Vec<NightReflectionEntry>> {
        self.caller_query(EntityKind::NightReflection, true, |actor| async move {
            actor.caller_night_reflections().await
        })
    }

    pub fn partner_night_reflections(
        &self,
        resolution: &CoupleResolution,
    ) -> QueryBinding<Vec<NightReflectionEntry>> {
        self.partner_query(EntityKind::NightReflection, resolution, |actor| async move {
            actor.partner_night_reflections().await
        })
    }

    pub fn save_night_reflection(&self) -> MutationBinding<NightReflectionEntry, ()> {
        self.mutation(|actor, entry: NightReflectionEntry| async move {
            actor
                .save_night_reflection(entry)
                .await
                .map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::NightReflection))
    }

    pub fn growth_journals(&self) -> QueryBinding<Vec<GrowthJournalEntry>> {
        self.caller_query(EntityKind::GrowthJournal, true, |actor| async move {
            actor.caller_growth_journals().await
        })
    }

    pub fn partner_growth_journals(
        &self,
        resolution: &CoupleResolution,
    ) -> QueryBinding<Vec<GrowthJournalEntry>> {
        self.partner_query(EntityKind::GrowthJournal, resolution, |actor| async move {
            actor.partner_growth_journals().await
        })
    }

    pub fn save_growth_journal(&self) -> MutationBinding<GrowthJournalEntry, ()> {
        self.mutation(|actor, entry: GrowthJournalEntry| async move {
            actor.save_growth_journal(entry).await.map_err(SyncError::from)
        })
        .invalidating(CacheKey::root(EntityKind::GrowthJournal))
    }

    // ========================================================================
    // QUOTES
    // ========================================================================

    /// Quote of the day, keyed by day-of-year and cached for 24 hours.
    /// Principal-independent: it survives identity changes.
    pub fn daily_quote(&self, date: NaiveDate) -> QueryBinding<String> {
        let day = day_of_year(date);
        let key = CacheKey::root(EntityKind::DailyQuote).with_num(i64::from(day));
        let actor = Arc::clone(&self.actor);
        QueryBinding::new(key, move || {
            let actor = Arc::clone(&actor);
            async move { actor.daily_quote(day).await.map_err(SyncError::from) }
        })
        .retry(true)
        .retry_attempts(self.config.retry_attempts)
        .stale_time(self.config.quote_stale_time)
    }
}
