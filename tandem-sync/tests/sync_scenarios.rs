//! End-to-end scenarios over the binding layer and the in-memory backend:
//! couple lifecycle, invalidation completeness, partner gating, staleness,
//! and identity re-keying.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tandem_core::{CoupleLinkError, DateKey, SyncError};
use tandem_sync::{CoupleResolution, ManualClock, PlannerActor, Principal, SyncClient, SyncConfig};
use tandem_test_utils::{
    principal, sample_daily_journal, sample_vision_entry, sample_weekly_entry, InMemoryBackend,
    StaticIdentity,
};

/// One hour of content staleness so cache hits are observable; refetches in
/// these tests happen through invalidation, not expiry.
fn client_for(
    backend: &Arc<InMemoryBackend>,
    me: &Principal,
) -> (SyncClient, Arc<ManualClock>, Arc<StaticIdentity>) {
    let clock = Arc::new(ManualClock::starting_at(Utc::now()));
    let identity = Arc::new(StaticIdentity::logged_in(me.clone()));
    let config = SyncConfig::new().with_default_stale_time(Duration::from_secs(3600));
    let provider: Arc<dyn tandem_sync::IdentityProvider> = identity.clone();
    let client = SyncClient::with_config(
        Arc::new(backend.actor_for(me)),
        provider,
        clock.clone(),
        config,
    );
    (client, clock, identity)
}

#[tokio::test]
async fn link_then_unlink_round_trip() {
    let backend = InMemoryBackend::new();
    let (alice, bob) = (principal("alice"), principal("bob"));
    let (client, _clock, _identity) = client_for(&backend, &alice);

    // No partner yet.
    assert_eq!(client.resolve_couple().await, CoupleResolution::Single);

    client
        .link_couple()
        .mutate(bob.clone())
        .await
        .expect("link should succeed");

    // Link invalidated the couple entry, so re-resolution refetches.
    let resolution = client.resolve_couple().await;
    assert_eq!(resolution.partner(), Some(&bob));

    client
        .dissolve_couple()
        .mutate(())
        .await
        .expect("dissolve should succeed");

    assert_eq!(client.resolve_couple().await, CoupleResolution::Single);
}

#[tokio::test]
async fn conflicting_link_reports_structured_reason_and_changes_nothing() {
    let backend = InMemoryBackend::new();
    let (alice, bob, carol) = (principal("alice"), principal("bob"), principal("carol"));
    backend.seed_couple(&alice, &bob);

    let (client, _clock, _identity) = client_for(&backend, &carol);
    assert_eq!(client.resolve_couple().await, CoupleResolution::Single);

    let err = client
        .link_couple()
        .mutate(alice.clone())
        .await
        .expect_err("link into an existing couple must be refused");
    assert_eq!(err, SyncError::Link(CoupleLinkError::PartnerAlreadyLinked));

    // Refusal applied no invalidation and created no couple: the cached
    // single-state answer is still served without a refetch.
    let calls_before = backend.call_count("couple_of");
    assert_eq!(client.resolve_couple().await, CoupleResolution::Single);
    assert_eq!(backend.call_count("couple_of"), calls_before);
}

#[tokio::test]
async fn dissolution_invalidates_every_partner_scoped_read() {
    let backend = InMemoryBackend::new();
    let (alice, bob) = (principal("alice"), principal("bob"));
    backend.seed_couple(&alice, &bob);
    backend.seed_profile(&bob, tandem_test_utils::sample_profile("bob"));

    let bob_actor = backend.actor_for(&bob);
    bob_actor
        .save_vision_entry(sample_vision_entry(2027))
        .await
        .expect("seed vision");
    bob_actor
        .save_weekly_entry(sample_weekly_entry(2026, 32))
        .await
        .expect("seed weekly");
    bob_actor
        .save_daily_journal(sample_daily_journal(DateKey::from_raw(2026_08_08), true))
        .await
        .expect("seed journal");

    let (client, _clock, _identity) = client_for(&backend, &alice);
    let paired = client.resolve_couple().await;
    assert!(paired.partner_enabled());

    let partner_reads = [
        "partner_profile",
        "partner_vision_board",
        "partner_daily_entries",
        "partner_weekly_entries",
        "partner_monthly_entries",
        "partner_yearly_entries",
        "partner_daily_journals",
        "partner_emotional_journals",
        "partner_night_reflections",
        "partner_growth_journals",
    ];

    let run_all = |resolution: CoupleResolution| {
        let client = &client;
        async move {
            let store = client.store();
            client.partner_profile(&resolution).run(store).await;
            client.partner_vision_board(&resolution).run(store).await;
            client.partner_daily_planner(&resolution).run(store).await;
            client.partner_weekly_planner(&resolution).run(store).await;
            client.partner_monthly_planner(&resolution).run(store).await;
            client.partner_yearly_planner(&resolution).run(store).await;
            client.partner_daily_journals(&resolution).run(store).await;
            client
                .partner_emotional_journals(&resolution)
                .run(store)
                .await;
            client
                .partner_night_reflections(&resolution)
                .run(store)
                .await;
            client.partner_growth_journals(&resolution).run(store).await;
        }
    };

    // First pass fetches, second pass is served from cache.
    run_all(paired.clone()).await;
    run_all(paired.clone()).await;
    for op in partner_reads {
        assert_eq!(backend.call_count(op), 1, "{op} should be cached");
    }

    client
        .dissolve_couple()
        .mutate(())
        .await
        .expect("dissolve should succeed");

    // Every partner-scoped entry was marked stale: re-running the same
    // bindings (still holding the old paired resolution) refetches each.
    run_all(paired).await;
    for op in partner_reads {
        assert_eq!(backend.call_count(op), 2, "{op} should refetch");
    }

    // And the couple itself re-resolves to single.
    assert_eq!(client.resolve_couple().await, CoupleResolution::Single);
}

#[tokio::test]
async fn partner_reads_are_gated_until_paired() {
    let backend = InMemoryBackend::new();
    let alice = principal("alice");
    let (client, _clock, _identity) = client_for(&backend, &alice);

    let resolution = client.resolve_couple().await;
    assert_eq!(resolution, CoupleResolution::Single);

    let snapshot = client
        .partner_vision_board(&resolution)
        .run(client.store())
        .await;
    assert!(!snapshot.is_fetched);
    assert!(snapshot.data.is_none());
    assert_eq!(backend.call_count("partner_vision_board"), 0);
}

#[tokio::test]
async fn identity_pending_reports_not_fetched_instead_of_anonymous_fetch() {
    let backend = InMemoryBackend::new();
    let clock = Arc::new(ManualClock::starting_at(Utc::now()));
    let identity: Arc<dyn tandem_sync::IdentityProvider> =
        Arc::new(StaticIdentity::logged_out());
    let client = SyncClient::new(
        Arc::new(backend.actor_for(&principal("nobody"))),
        identity,
        clock,
    );

    let snapshot = client.vision_board().run(client.store()).await;
    assert!(!snapshot.is_fetched);
    assert_eq!(backend.call_count("caller_vision_board"), 0);

    assert_eq!(client.resolve_couple().await, CoupleResolution::Unresolved);
}

#[tokio::test]
async fn couple_fetch_failure_degrades_to_no_partner() {
    let backend = InMemoryBackend::new();
    let alice = principal("alice");
    let (client, _clock, _identity) = client_for(&backend, &alice);

    backend.set_offline(true);
    let resolution = client.resolve_couple().await;
    assert_eq!(resolution, CoupleResolution::Unresolved);
    assert!(!resolution.partner_enabled());
}

#[tokio::test]
async fn vision_progress_update_without_full_entry_invalidates_and_refetches() {
    let backend = InMemoryBackend::new();
    let alice = principal("alice");
    let (client, _clock, _identity) = client_for(&backend, &alice);

    let board = client.vision_board();
    let snapshot = board.run(client.store()).await;
    assert_eq!(snapshot.data, Some(Vec::new()));
    assert_eq!(backend.call_count("caller_vision_board"), 1);

    client
        .update_vision_progress()
        .mutate((2027, 55))
        .await
        .expect("scalar update without a prior entry must not fail");

    let snapshot = board.run(client.store()).await;
    assert_eq!(backend.call_count("caller_vision_board"), 2);
    let entries = snapshot.data.expect("board should refetch");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].progress_percentage, 55);
}

#[tokio::test]
async fn water_intake_update_without_full_entry_invalidates_daily_cache() {
    let backend = InMemoryBackend::new();
    let alice = principal("alice");
    let (client, _clock, _identity) = client_for(&backend, &alice);

    let planner = client.daily_planner();
    planner.run(client.store()).await;

    client
        .update_water_intake()
        .mutate((DateKey::from_raw(2026_08_08), 6))
        .await
        .expect("water update should succeed");

    let snapshot = planner.run(client.store()).await;
    assert_eq!(backend.call_count("caller_daily_entries"), 2);
    let entries = snapshot.data.expect("planner should refetch");
    assert_eq!(entries[0].water_intake, 6);
}

#[tokio::test]
async fn daily_quote_staleness_window_is_24_hours() {
    let backend = InMemoryBackend::new();
    let alice = principal("alice");
    let (client, clock, _identity) = client_for(&backend, &alice);
    let today = chrono::NaiveDate::from_ymd_opt(2026, 8, 8).expect("valid date");

    let quote = client.daily_quote(today);
    let first = quote.run(client.store()).await;
    assert!(first.data.is_some());

    clock.advance(chrono::Duration::hours(23));
    quote.run(client.store()).await;
    assert_eq!(backend.call_count("daily_quote"), 1);

    clock.advance(chrono::Duration::hours(2));
    quote.run(client.store()).await;
    assert_eq!(backend.call_count("daily_quote"), 2);
}

#[tokio::test]
async fn logout_drops_caller_scoped_cache_entries() {
    let backend = InMemoryBackend::new();
    let alice = principal("alice");
    backend.seed_profile(&alice, tandem_test_utils::sample_profile("alice"));
    let (client, _clock, identity) = client_for(&backend, &alice);

    let profile = client.caller_profile();
    let snapshot = profile.run(client.store()).await;
    assert!(snapshot.data.expect("fetched").is_some());

    identity.set(None);
    client.handle_identity_change();

    // The old entry is gone and the logged-out binding does not fetch.
    let snapshot = client.caller_profile().run(client.store()).await;
    assert!(!snapshot.is_fetched);
    assert_eq!(backend.call_count("caller_profile"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_binding_runs_share_one_fetch() {
    let backend = InMemoryBackend::new();
    let alice = principal("alice");
    let (client, _clock, _identity) = client_for(&backend, &alice);

    let binding = client.vision_board();
    let store = Arc::clone(client.store());

    let mut handles = Vec::new();
    for _ in 0..6 {
        let binding = binding.clone();
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move { binding.run(&store).await }));
    }
    for handle in handles {
        let snapshot = handle.await.expect("task should not panic");
        assert!(snapshot.error.is_none());
    }

    assert_eq!(backend.call_count("caller_vision_board"), 1);
}

#[tokio::test]
async fn actor_outage_keeps_last_known_good_partner_data() {
    let backend = InMemoryBackend::new();
    let (alice, bob) = (principal("alice"), principal("bob"));
    backend.seed_couple(&alice, &bob);
    backend
        .actor_for(&bob)
        .save_vision_entry(sample_vision_entry(2026))
        .await
        .expect("seed");

    let (client, _clock, _identity) = client_for(&backend, &alice);
    let paired = client.resolve_couple().await;

    let binding = client.partner_vision_board(&paired);
    let good = binding.run(client.store()).await;
    assert_eq!(good.data.as_ref().map(Vec::len), Some(1));

    // Force a refetch against a dead actor.
    client.store().invalidate(binding.key());
    backend.set_offline(true);

    let degraded = binding.run(client.store()).await;
    assert!(degraded.error.is_some());
    assert_eq!(
        degraded.data.as_ref().map(Vec::len),
        Some(1),
        "stale-while-error keeps last good data"
    );
}
