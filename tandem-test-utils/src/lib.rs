//! Tandem Test Utilities
//!
//! Centralized test infrastructure for the Tandem workspace:
//! - An in-memory planner backend with per-operation call counters and
//!   failure injection, shared between per-caller actor handles
//! - A settable identity provider
//! - Fixture builders for every entry type

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tandem_core::{
    ActorError, Couple, CoupleLinkError, DailyJournalEntry, DailyPlannerEntry, DateKey,
    EmotionTag, EmotionalJournalEntry, GoalCategory, GrowthArea, GrowthJournalEntry,
    MonthlyEntry, NightReflectionEntry, Principal, Task, UserProfile, VisionBoardEntry,
    WeeklyEntry, YearlyEntry,
};
use tandem_sync::{ActorResult, IdentityProvider, LinkOutcome, PlannerActor};

/// Principal text the mock backend treats as anonymous.
pub const ANONYMOUS_TEXT: &str = "2vxsx-fae";

/// The anonymous principal.
pub fn anonymous() -> Principal {
    Principal::from_text(ANONYMOUS_TEXT)
}

/// Shorthand principal constructor for tests.
pub fn principal(name: &str) -> Principal {
    Principal::from_text(name)
}

// ============================================================================
// SETTABLE IDENTITY PROVIDER
// ============================================================================

/// Identity provider whose principal tests can swap at will.
#[derive(Debug, Default)]
pub struct StaticIdentity {
    current: Mutex<Option<Principal>>,
}

impl StaticIdentity {
    /// Provider with no authenticated principal.
    pub fn logged_out() -> Self {
        Self::default()
    }

    /// Provider logged in as the given principal.
    pub fn logged_in(principal: Principal) -> Self {
        Self {
            current: Mutex::new(Some(principal)),
        }
    }

    /// Swap the current principal (login, logout, account switch).
    pub fn set(&self, principal: Option<Principal>) {
        *self.current.lock().expect("identity lock") = principal;
    }
}

impl IdentityProvider for StaticIdentity {
    fn current(&self) -> Option<Principal> {
        self.current.lock().expect("identity lock").clone()
    }
}

// ============================================================================
// IN-MEMORY PLANNER BACKEND
// ============================================================================

#[derive(Default)]
struct BackendState {
    offline: bool,
    calls: HashMap<&'static str, u32>,
    profiles: HashMap<Principal, UserProfile>,
    // Both members map to the same couple record; slot order is whatever
    // the initiating link produced, so derivation must not assume one.
    pairs: HashMap<Principal, Couple>,
    vision: HashMap<(Principal, i32), VisionBoardEntry>,
    daily: HashMap<(Principal, DateKey), DailyPlannerEntry>,
    weekly: HashMap<(Principal, (i32, u32)), WeeklyEntry>,
    monthly: HashMap<(Principal, (i32, u32)), MonthlyEntry>,
    yearly: HashMap<(Principal, i32), YearlyEntry>,
    daily_journals: HashMap<(Principal, DateKey), DailyJournalEntry>,
    emotional_journals: HashMap<(Principal, DateKey), EmotionalJournalEntry>,
    night_reflections: HashMap<(Principal, DateKey), NightReflectionEntry>,
    growth_journals: HashMap<(Principal, DateKey), GrowthJournalEntry>,
}

impl BackendState {
    fn partner_of(&self, principal: &Principal) -> Option<Principal> {
        self.pairs
            .get(principal)
            .and_then(|couple| couple.partner_of(principal))
            .cloned()
    }
}

/// Shared in-memory backend; hand out one actor handle per caller with
/// [`InMemoryBackend::actor_for`] to exercise multi-user scenarios over the
/// same state.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
}

impl InMemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// An actor handle whose implicit caller is `principal`.
    pub fn actor_for(self: &Arc<Self>, principal: &Principal) -> InMemoryPlannerActor {
        InMemoryPlannerActor {
            backend: Arc::clone(self),
            caller: principal.clone(),
        }
    }

    /// Fail every subsequent call with `ActorError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// How many times an operation (trait method name) was attempted.
    pub fn call_count(&self, op: &str) -> u32 {
        self.lock().calls.get(op).copied().unwrap_or(0)
    }

    /// Pre-link two principals, bypassing the mutual-consent flow.
    pub fn seed_couple(&self, a: &Principal, b: &Principal) {
        let couple = Couple::new(a.clone(), b.clone());
        let mut state = self.lock();
        state.pairs.insert(a.clone(), couple.clone());
        state.pairs.insert(b.clone(), couple);
    }

    /// Pre-store a profile.
    pub fn seed_profile(&self, owner: &Principal, profile: UserProfile) {
        self.lock().profiles.insert(owner.clone(), profile);
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().expect("backend lock should not be poisoned")
    }

    /// Count the call and apply failure injection.
    fn guard(&self, op: &'static str) -> Result<MutexGuard<'_, BackendState>, ActorError> {
        let mut state = self.lock();
        *state.calls.entry(op).or_insert(0) += 1;
        if state.offline {
            return Err(ActorError::Unavailable);
        }
        Ok(state)
    }
}

/// Per-caller handle over a shared [`InMemoryBackend`].
#[derive(Clone)]
pub struct InMemoryPlannerActor {
    backend: Arc<InMemoryBackend>,
    caller: Principal,
}

impl InMemoryPlannerActor {
    /// The backend this handle writes through.
    pub fn backend(&self) -> &Arc<InMemoryBackend> {
        &self.backend
    }
}

/// Sorted snapshot of one owner's entries from a keyed map.
fn entries_of<K: Ord + Copy, V: Clone>(
    map: &HashMap<(Principal, K), V>,
    owner: &Principal,
) -> Vec<V> {
    let mut keyed: Vec<(K, V)> = map
        .iter()
        .filter(|((p, _), _)| p == owner)
        .map(|((_, k), v)| (*k, v.clone()))
        .collect();
    keyed.sort_by_key(|(k, _)| *k);
    keyed.into_iter().map(|(_, v)| v).collect()
}

const QUOTES: &[&str] = &[
    "Small steps every day.",
    "Grow together, not apart.",
    "What you water, grows.",
    "Presence over perfection.",
];

#[async_trait]
impl PlannerActor for InMemoryPlannerActor {
    async fn caller_profile(&self) -> ActorResult<Option<UserProfile>> {
        let state = self.backend.guard("caller_profile")?;
        Ok(state.profiles.get(&self.caller).cloned())
    }

    async fn profile_of(&self, principal: &Principal) -> ActorResult<Option<UserProfile>> {
        let state = self.backend.guard("profile_of")?;
        Ok(state.profiles.get(principal).cloned())
    }

    async fn partner_profile(&self) -> ActorResult<Option<UserProfile>> {
        let state = self.backend.guard("partner_profile")?;
        Ok(state
            .partner_of(&self.caller)
            .and_then(|partner| state.profiles.get(&partner).cloned()))
    }

    async fn save_profile(&self, profile: UserProfile) -> ActorResult<()> {
        let mut state = self.backend.guard("save_profile")?;
        state.profiles.insert(self.caller.clone(), profile);
        Ok(())
    }

    async fn couple_of(&self, principal: &Principal) -> ActorResult<Option<Couple>> {
        let state = self.backend.guard("couple_of")?;
        Ok(state.pairs.get(principal).cloned())
    }

    async fn link_couple(&self, partner: &Principal) -> ActorResult<LinkOutcome> {
        let mut state = self.backend.guard("link_couple")?;
        if self.caller == anonymous() || *partner == anonymous() {
            return Ok(Err(CoupleLinkError::AnonymousNotPermitted));
        }
        if self.caller == *partner {
            return Ok(Err(CoupleLinkError::Unauthorized));
        }
        if state.pairs.contains_key(&self.caller) {
            return Ok(Err(CoupleLinkError::CallerAlreadyLinked));
        }
        if state.pairs.contains_key(partner) {
            return Ok(Err(CoupleLinkError::PartnerAlreadyLinked));
        }
        let couple = Couple::new(self.caller.clone(), partner.clone());
        state.pairs.insert(self.caller.clone(), couple.clone());
        state.pairs.insert(partner.clone(), couple);
        Ok(Ok(()))
    }

    async fn dissolve_couple(&self) -> ActorResult<bool> {
        let mut state = self.backend.guard("dissolve_couple")?;
        match state.partner_of(&self.caller) {
            Some(partner) => {
                // Both sides unlink atomically.
                state.pairs.remove(&self.caller);
                state.pairs.remove(&partner);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn caller_vision_board(&self) -> ActorResult<Vec<VisionBoardEntry>> {
        let state = self.backend.guard("caller_vision_board")?;
        Ok(entries_of(&state.vision, &self.caller))
    }

    async fn partner_vision_board(&self) -> ActorResult<Vec<VisionBoardEntry>> {
        let state = self.backend.guard("partner_vision_board")?;
        Ok(match state.partner_of(&self.caller) {
            Some(partner) => entries_of(&state.vision, &partner),
            None => Vec::new(),
        })
    }

    async fn save_vision_entry(&self, entry: VisionBoardEntry) -> ActorResult<()> {
        let mut state = self.backend.guard("save_vision_entry")?;
        state
            .vision
            .insert((self.caller.clone(), entry.target_year), entry);
        Ok(())
    }

    async fn delete_vision_entry(&self, target_year: i32) -> ActorResult<()> {
        let mut state = self.backend.guard("delete_vision_entry")?;
        state.vision.remove(&(self.caller.clone(), target_year));
        Ok(())
    }

    async fn update_vision_progress(&self, target_year: i32, progress: u8) -> ActorResult<()> {
        let mut state = self.backend.guard("update_vision_progress")?;
        state
            .vision
            .entry((self.caller.clone(), target_year))
            .or_insert_with(|| VisionBoardEntry {
                target_year,
                category: GoalCategory::PersonalGrowth,
                why_this_matters: String::new(),
                milestones: Vec::new(),
                progress_percentage: 0,
            })
            .progress_percentage = progress;
        Ok(())
    }

    async fn caller_daily_entries(&self) -> ActorResult<Vec<DailyPlannerEntry>> {
        let state = self.backend.guard("caller_daily_entries")?;
        Ok(entries_of(&state.daily, &self.caller))
    }

    async fn partner_daily_entries(&self) -> ActorResult<Vec<DailyPlannerEntry>> {
        let state = self.backend.guard("partner_daily_entries")?;
        Ok(match state.partner_of(&self.caller) {
            Some(partner) => entries_of(&state.daily, &partner),
            None => Vec::new(),
        })
    }

    async fn partner_daily_entry_for(
        &self,
        date: DateKey,
    ) -> ActorResult<Option<DailyPlannerEntry>> {
        let state = self.backend.guard("partner_daily_entry_for")?;
        Ok(state
            .partner_of(&self.caller)
            .and_then(|partner| state.daily.get(&(partner, date)).cloned()))
    }

    async fn save_daily_entry(&self, entry: DailyPlannerEntry) -> ActorResult<()> {
        let mut state = self.backend.guard("save_daily_entry")?;
        state.daily.insert((self.caller.clone(), entry.date), entry);
        Ok(())
    }

    async fn delete_daily_entry(&self, date: DateKey) -> ActorResult<()> {
        let mut state = self.backend.guard("delete_daily_entry")?;
        state.daily.remove(&(self.caller.clone(), date));
        Ok(())
    }

    async fn update_water_intake(&self, date: DateKey, intake: u32) -> ActorResult<()> {
        let mut state = self.backend.guard("update_water_intake")?;
        state
            .daily
            .entry((self.caller.clone(), date))
            .or_insert_with(|| sample_daily_entry(date))
            .water_intake = intake;
        Ok(())
    }

    async fn caller_weekly_entries(&self) -> ActorResult<Vec<WeeklyEntry>> {
        let state = self.backend.guard("caller_weekly_entries")?;
        Ok(entries_of(&state.weekly, &self.caller))
    }

    async fn partner_weekly_entries(&self) -> ActorResult<Vec<WeeklyEntry>> {
        let state = self.backend.guard("partner_weekly_entries")?;
        Ok(match state.partner_of(&self.caller) {
            Some(partner) => entries_of(&state.weekly, &partner),
            None => Vec::new(),
        })
    }

    async fn save_weekly_entry(&self, entry: WeeklyEntry) -> ActorResult<()> {
        let mut state = self.backend.guard("save_weekly_entry")?;
        state
            .weekly
            .insert((self.caller.clone(), (entry.year, entry.week_number)), entry);
        Ok(())
    }

    async fn delete_weekly_entry(&self, year: i32, week: u32) -> ActorResult<()> {
        let mut state = self.backend.guard("delete_weekly_entry")?;
        state.weekly.remove(&(self.caller.clone(), (year, week)));
        Ok(())
    }

    async fn caller_monthly_entries(&self) -> ActorResult<Vec<MonthlyEntry>> {
        let state = self.backend.guard("caller_monthly_entries")?;
        Ok(entries_of(&state.monthly, &self.caller))
    }

    async fn partner_monthly_entries(&self) -> ActorResult<Vec<MonthlyEntry>> {
        let state = self.backend.guard("partner_monthly_entries")?;
        Ok(match state.partner_of(&self.caller) {
            Some(partner) => entries_of(&state.monthly, &partner),
            None => Vec::new(),
        })
    }

    async fn save_monthly_entry(&self, entry: MonthlyEntry) -> ActorResult<()> {
        let mut state = self.backend.guard("save_monthly_entry")?;
        state
            .monthly
            .insert((self.caller.clone(), (entry.year, entry.month)), entry);
        Ok(())
    }

    async fn delete_monthly_entry(&self, year: i32, month: u32) -> ActorResult<()> {
        let mut state = self.backend.guard("delete_monthly_entry")?;
        state.monthly.remove(&(self.caller.clone(), (year, month)));
        Ok(())
    }

    async fn caller_yearly_entries(&self) -> ActorResult<Vec<YearlyEntry>> {
        let state = self.backend.guard("caller_yearly_entries")?;
        Ok(entries_of(&state.yearly, &self.caller))
    }

    async fn partner_yearly_entries(&self) -> ActorResult<Vec<YearlyEntry>> {
        let state = self.backend.guard("partner_yearly_entries")?;
        Ok(match state.partner_of(&self.caller) {
            Some(partner) => entries_of(&state.yearly, &partner),
            None => Vec::new(),
        })
    }

    async fn save_yearly_entry(&self, entry: YearlyEntry) -> ActorResult<()> {
        let mut state = self.backend.guard("save_yearly_entry")?;
        state.yearly.insert((self.caller.clone(), entry.year), entry);
        Ok(())
    }

    async fn delete_yearly_entry(&self, year: i32) -> ActorResult<()> {
        let mut state = self.backend.guard("delete_yearly_entry")?;
        state.yearly.remove(&(self.caller.clone(), year));
        Ok(())
    }

    async fn caller_daily_journals(&self) -> ActorResult<Vec<DailyJournalEntry>> {
        let state = self.backend.guard("caller_daily_journals")?;
        Ok(entries_of(&state.daily_journals, &self.caller))
    }

    async fn partner_daily_journals(&self) -> ActorResult<Vec<DailyJournalEntry>> {
        let state = self.backend.guard("partner_daily_journals")?;
        Ok(match state.partner_of(&self.caller) {
            Some(partner) => entries_of(&state.daily_journals, &partner)
                .into_iter()
                .filter(|entry| entry.is_public)
                .collect(),
            None => Vec::new(),
        })
    }

    async fn save_daily_journal(&self, entry: DailyJournalEntry) -> ActorResult<()> {
        let mut state = self.backend.guard("save_daily_journal")?;
        state
            .daily_journals
            .insert((self.caller.clone(), entry.date), entry);
        Ok(())
    }

    async fn caller_emotional_journals(&self) -> ActorResult<Vec<EmotionalJournalEntry>> {
        let state = self.backend.guard("caller_emotional_journals")?;
        Ok(entries_of(&state.emotional_journals, &self.caller))
    }

    async fn partner_emotional_journals(&self) -> ActorResult<Vec<EmotionalJournalEntry>> {
        let state = self.backend.guard("partner_emotional_journals")?;
        Ok(match state.partner_of(&self.caller) {
            Some(partner) => entries_of(&state.emotional_journals, &partner)
                .into_iter()
                .filter(|entry| entry.is_public)
                .collect(),
            None => Vec::new(),
        })
    }

    async fn save_emotional_journal(&self, entry: EmotionalJournalEntry) -> ActorResult<()> {
        let mut state = self.backend.guard("save_emotional_journal")?;
        state
            .emotional_journals
            .insert((self.caller.clone(), entry.date), entry);
        Ok(())
    }

    async fn caller_night_reflections(&self) -> ActorResult<Vec<NightReflectionEntry>> {
        let state = self.backend.guard("caller_night_reflections")?;
        Ok(entries_of(&state.night_reflections, &self.caller))
    }

    async fn partner_night_reflections(&self) -> ActorResult<Vec<NightReflectionEntry>> {
        let state = self.backend.guard("partner_night_reflections")?;
        Ok(match state.partner_of(&self.caller) {
            Some(partner) => entries_of(&state.night_reflections, &partner)
                .into_iter()
                .filter(|entry| entry.is_public)
                .collect(),
            None => Vec::new(),
        })
    }

    async fn save_night_reflection(&self, entry: NightReflectionEntry) -> ActorResult<()> {
        let mut state = self.backend.guard("save_night_reflection")?;
        state
            .night_reflections
            .insert((self.caller.clone(), entry.date), entry);
        Ok(())
    }

    async fn caller_growth_journals(&self) -> ActorResult<Vec<GrowthJournalEntry>> {
        let state = self.backend.guard("caller_growth_journals")?;
        Ok(entries_of(&state.growth_journals, &self.caller))
    }

    async fn partner_growth_journals(&self) -> ActorResult<Vec<GrowthJournalEntry>> {
        let state = self.backend.guard("partner_growth_journals")?;
        Ok(match state.partner_of(&self.caller) {
            Some(partner) => entries_of(&state.growth_journals, &partner)
                .into_iter()
                .filter(|entry| entry.is_public)
                .collect(),
            None => Vec::new(),
        })
    }

    async fn save_growth_journal(&self, entry: GrowthJournalEntry) -> ActorResult<()> {
        let mut state = self.backend.guard("save_growth_journal")?;
        state
            .growth_journals
            .insert((self.caller.clone(), entry.date), entry);
        Ok(())
    }

    async fn daily_quote(&self, day_of_year: u32) -> ActorResult<String> {
        self.backend.guard("daily_quote")?;
        let index = day_of_year.saturating_sub(1) as usize % QUOTES.len();
        Ok(QUOTES[index].to_string())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Profile fixture named after its owner.
pub fn sample_profile(name: &str) -> UserProfile {
    UserProfile {
        name: name.to_string(),
        display_name: format!("{name} ♥"),
    }
}

/// Vision-board fixture for a target year.
pub fn sample_vision_entry(target_year: i32) -> VisionBoardEntry {
    VisionBoardEntry {
        target_year,
        category: GoalCategory::Travel,
        why_this_matters: "a trip we keep postponing".to_string(),
        milestones: vec!["pick the month".to_string(), "book flights".to_string()],
        progress_percentage: 10,
    }
}

/// Daily planner fixture for a date.
pub fn sample_daily_entry(date: DateKey) -> DailyPlannerEntry {
    DailyPlannerEntry {
        date,
        schedule: Vec::new(),
        tasks: vec![Task {
            description: "call the venue".to_string(),
            is_complete: false,
        }],
        gratitude_entries: Vec::new(),
        journal_entry: String::new(),
        water_intake: 0,
        mood_emoji: "🙂".to_string(),
        notes: String::new(),
    }
}

/// Weekly planner fixture.
pub fn sample_weekly_entry(year: i32, week_number: u32) -> WeeklyEntry {
    WeeklyEntry {
        year,
        week_number,
        priorities: vec![Task {
            description: "date night".to_string(),
            is_complete: false,
        }],
        habit_tracker: Vec::new(),
        todos: Vec::new(),
        energy_rating: 3,
        reflection: String::new(),
    }
}

/// Monthly planner fixture.
pub fn sample_monthly_entry(year: i32, month: u32) -> MonthlyEntry {
    MonthlyEntry {
        year,
        month,
        goals: Vec::new(),
        important_dates: Vec::new(),
        budget: tandem_core::Budget {
            income: 0,
            expenses: Vec::new(),
            notes: String::new(),
        },
        mood_tracker: Vec::new(),
        reflection: String::new(),
    }
}

/// Yearly planner fixture.
pub fn sample_yearly_entry(year: i32) -> YearlyEntry {
    YearlyEntry {
        year,
        word_of_the_year: "together".to_string(),
        major_goals: Vec::new(),
        habit_tracker: Vec::new(),
        vision_images: Vec::new(),
        reflection: String::new(),
    }
}

/// Daily journal fixture.
pub fn sample_daily_journal(date: DateKey, is_public: bool) -> DailyJournalEntry {
    DailyJournalEntry {
        date,
        body: "an ordinary good day".to_string(),
        is_public,
    }
}

/// Emotional journal fixture.
pub fn sample_emotional_journal(date: DateKey, is_public: bool) -> EmotionalJournalEntry {
    EmotionalJournalEntry {
        date,
        emotion: EmotionTag::Grateful,
        intensity: 3,
        trigger: String::new(),
        reflection: String::new(),
        is_public,
    }
}

/// Night reflection fixture.
pub fn sample_night_reflection(date: DateKey, is_public: bool) -> NightReflectionEntry {
    NightReflectionEntry {
        date,
        gratitude: "the quiet evening".to_string(),
        highlights: Vec::new(),
        improvements: String::new(),
        intention: String::new(),
        is_public,
    }
}

/// Growth journal fixture.
pub fn sample_growth_journal(date: DateKey, is_public: bool) -> GrowthJournalEntry {
    GrowthJournalEntry {
        date,
        growth_area: GrowthArea::Mindset,
        lesson: String::new(),
        action_step: String::new(),
        growth_rating: 3,
        is_public,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_link_and_dissolve_are_symmetric() {
        let backend = InMemoryBackend::new();
        let alice = principal("alice");
        let bob = principal("bob");

        let alice_actor = backend.actor_for(&alice);
        let bob_actor = backend.actor_for(&bob);

        let outcome = alice_actor
            .link_couple(&bob)
            .await
            .expect("transport should succeed");
        assert_eq!(outcome, Ok(()));

        // Both sides resolve the same couple.
        let from_alice = alice_actor.couple_of(&alice).await.expect("read").unwrap();
        let from_bob = bob_actor.couple_of(&bob).await.expect("read").unwrap();
        assert_eq!(from_alice, from_bob);
        assert_eq!(from_alice.partner_of(&bob), Some(&alice));

        assert!(bob_actor.dissolve_couple().await.expect("dissolve"));
        assert!(alice_actor.couple_of(&alice).await.expect("read").is_none());
        assert!(bob_actor.couple_of(&bob).await.expect("read").is_none());
    }

    #[tokio::test]
    async fn test_mock_rejects_conflicting_link_with_structured_reason() {
        let backend = InMemoryBackend::new();
        let (alice, bob, carol) = (principal("alice"), principal("bob"), principal("carol"));
        backend.seed_couple(&alice, &bob);

        let carol_actor = backend.actor_for(&carol);
        let outcome = carol_actor
            .link_couple(&alice)
            .await
            .expect("transport should succeed");
        assert_eq!(outcome, Err(CoupleLinkError::PartnerAlreadyLinked));

        // Carol herself remains unlinked.
        assert!(carol_actor.couple_of(&carol).await.expect("read").is_none());
    }

    #[tokio::test]
    async fn test_mock_partner_journals_filter_private_entries() {
        let backend = InMemoryBackend::new();
        let (alice, bob) = (principal("alice"), principal("bob"));
        backend.seed_couple(&alice, &bob);

        let bob_actor = backend.actor_for(&bob);
        bob_actor
            .save_daily_journal(sample_daily_journal(DateKey::from_raw(2026_08_07), true))
            .await
            .expect("save");
        bob_actor
            .save_daily_journal(sample_daily_journal(DateKey::from_raw(2026_08_08), false))
            .await
            .expect("save");

        let alice_actor = backend.actor_for(&alice);
        let shared = alice_actor
            .partner_daily_journals()
            .await
            .expect("partner read");
        assert_eq!(shared.len(), 1);
        assert!(shared[0].is_public);
    }

    #[tokio::test]
    async fn test_mock_offline_injection_and_call_counting() {
        let backend = InMemoryBackend::new();
        let actor = backend.actor_for(&principal("alice"));

        actor.caller_vision_board().await.expect("online read");
        backend.set_offline(true);
        let err = actor
            .caller_vision_board()
            .await
            .expect_err("offline read should fail");
        assert_eq!(err, ActorError::Unavailable);
        assert_eq!(backend.call_count("caller_vision_board"), 2);
    }

    #[tokio::test]
    async fn test_mock_scalar_update_without_full_entry() {
        let backend = InMemoryBackend::new();
        let actor = backend.actor_for(&principal("alice"));

        actor
            .update_vision_progress(2027, 40)
            .await
            .expect("progress update");
        let board = actor.caller_vision_board().await.expect("read");
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].progress_percentage, 40);

        let date = DateKey::from_raw(2026_08_08);
        actor.update_water_intake(date, 5).await.expect("water update");
        let entries = actor.caller_daily_entries().await.expect("read");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].water_intake, 5);
    }
}
