//! End-to-end garden scenarios against the in-memory collaborators.
//!
//! Time is driven by a [`ManualClock`], growth takes one hour, and the RNG
//! is seeded, so every scenario is deterministic.

// Panicking on an unexpected result is the correct failure mode here.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use petgarden_core::{
    Clock, GardenError, GardenService, GardenSettings, ManualClock, MemorySession, MemoryStore,
    NotFoundError, PendingCatchLedger, ValidationError,
};
use petgarden_garden::{GrowthDuration, StaticCatalog};
use petgarden_types::{
    CatchDecision, CreatureId, PlantRequest, PlotColor, PlotPosition, SeedInstanceId,
    SeedTypeId, UserId,
};

const USER: UserId = UserId(1001);
const START: i64 = 1_700_000_000;
const GROWTH: i64 = 3600;
const EMPTY: &str = "0~black~-1~0~0~0|1~black~-1~0~0~0|2~black~-1~0~0~0";

const SUNPETAL: SeedTypeId = SeedTypeId(1);
const MOSSBELL: SeedTypeId = SeedTypeId(2);
const PETALPUP: CreatureId = CreatureId(10);
const DUNEHOPPER: CreatureId = CreatureId(11);
const MOSSMOUSE: CreatureId = CreatureId(12);

const CATALOG: &str = r"
seeds:
  - { id: 1, name: Sunpetal Seed, asset_path: seeds/sunpetal.png }
  - { id: 2, name: Mossbell Seed, asset_path: seeds/mossbell.png }
creatures:
  - creature_id: 10
    name: Petalpup
    capture_method: planted_seeds
    rarity_rank: 3
    requirements:
      - { asset_path: seeds/sunpetal.png }
      - { asset_path: seeds/sunpetal.png }
      - { asset_path: seeds/mossbell.png }
  - creature_id: 11
    name: Dunehopper
    capture_method: wild
    rarity_rank: 1
  - creature_id: 12
    name: Mossmouse
    capture_method: planted_seeds
    rarity_rank: 1
    requirements:
      - { asset_path: seeds/mossbell.png }
      - { asset_path: seeds/mossbell.png }
      - { asset_path: seeds/mossbell.png }
";

type Service = GardenService<MemoryStore, MemorySession>;

struct Harness {
    service: Arc<Service>,
    clock: Arc<ManualClock>,
}

impl Harness {
    async fn new() -> Self {
        Self::with(StaticCatalog::parse(CATALOG).expect("catalog"), &["black"]).await
    }

    async fn with(catalog: StaticCatalog, palette: &[&str]) -> Self {
        let store = MemoryStore::new();
        store.add_user(USER).await;
        let clock = Arc::new(ManualClock::new(START));
        let settings = GardenSettings {
            growth: GrowthDuration::from_config(Some(GROWTH)),
            palette: palette.iter().copied().map(PlotColor::new).collect(),
        };
        let shared_clock: Arc<dyn Clock> = clock.clone();
        let service = GardenService::new(store, MemorySession::new(), Arc::new(catalog), settings)
            .with_clock(shared_clock)
            .with_rng_seed(42);
        Self {
            service: Arc::new(service),
            clock,
        }
    }

    fn store(&self) -> &MemoryStore {
        self.service.records()
    }

    async fn raw(&self) -> Option<String> {
        self.store().raw_garden(USER).await
    }

    async fn grant(&self, seeds: &[(i64, SeedTypeId)]) {
        for &(instance, seed_type_id) in seeds {
            self.store()
                .grant_seed(USER, SeedInstanceId(instance), seed_type_id)
                .await;
        }
    }

    /// Plant three Mossbell seeds and let them grow fully.
    async fn grow_mossmouse_garden(&self) {
        self.grant(&[(1, MOSSBELL), (2, MOSSBELL), (3, MOSSBELL)]).await;
        let report = self
            .service
            .plant(USER, &[req(1, 0), req(2, 1), req(3, 2)])
            .await
            .expect("plant");
        assert_eq!(report.planted.len(), 3);
        self.clock.advance(GROWTH);
    }
}

const fn req(seed: i64, position: i64) -> PlantRequest {
    PlantRequest {
        seed_instance_id: SeedInstanceId(seed),
        position,
    }
}

// ---------------------------------------------------------------------------
// enter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn entering_a_new_garden_renders_empty_plots_and_a_suggestion() {
    let h = Harness::new().await;
    assert_eq!(h.raw().await, None);

    let view = h.service.enter(USER).await.expect("enter");
    assert_eq!(view.plots.len(), 3);
    assert!(view.plots.iter().all(|p| p.seed_type_id.is_none() && p.progress == 0));
    assert!(view.catch.is_none());

    let target = view.target.expect("suggested target");
    assert!(!target.pinned);
    assert!([PETALPUP, MOSSMOUSE].contains(&target.creature_id));

    assert_eq!(h.raw().await.as_deref(), Some(EMPTY));
}

#[tokio::test]
async fn enter_reports_prior_progress_from_the_last_visit() {
    let h = Harness::new().await;
    h.grant(&[(1, SUNPETAL)]).await;
    h.service.plant(USER, &[req(1, 1)]).await.expect("plant");

    h.clock.advance(GROWTH / 2);
    let first = h.service.enter(USER).await.expect("enter");
    let [_, middle, _] = PlotPosition::ALL;
    let plot = &first.plots[usize::from(middle.get())];
    assert_eq!((plot.progress, plot.prior_progress), (50, 0));
    assert_eq!(plot.seed_name.as_deref(), Some("Sunpetal Seed"));
    assert_eq!(plot.asset_path.as_deref(), Some("seeds/sunpetal.png"));

    h.clock.advance(GROWTH / 2);
    let second = h.service.enter(USER).await.expect("enter");
    let plot = &second.plots[usize::from(middle.get())];
    assert_eq!((plot.progress, plot.prior_progress), (100, 50));

    let expected = format!(
        "0~black~-1~0~0~0|1~black~1~{START}~{}~1|2~black~-1~0~0~0",
        START + GROWTH
    );
    assert_eq!(h.raw().await, Some(expected));
}

#[tokio::test]
async fn entering_normalizes_a_malformed_garden() {
    let h = Harness::new().await;
    h.store()
        .set_raw_garden(USER, Some("0~black~2~oops~0~1|garbage"))
        .await;

    let view = h.service.enter(USER).await.expect("enter");
    assert!(view.plots.iter().all(|p| p.seed_type_id.is_none()));
    assert_eq!(h.raw().await.as_deref(), Some(EMPTY));
}

#[tokio::test]
async fn colored_plots_render_their_asset_variant() {
    let catalog = StaticCatalog::parse(CATALOG).expect("catalog");
    let h = Harness::with(catalog, &["red", "blue"]).await;
    h.grant(&[(1, MOSSBELL)]).await;
    h.service.plant(USER, &[req(1, 0)]).await.expect("plant");

    let view = h.service.enter(USER).await.expect("enter");
    let plot = &view.plots[0];
    let expected = format!("seeds/mossbell_{}.png", plot.color);
    assert!(["red", "blue"].contains(&plot.color.as_str()));
    assert_eq!(plot.asset_path.as_deref(), Some(expected.as_str()));
}

// ---------------------------------------------------------------------------
// plant
// ---------------------------------------------------------------------------

#[tokio::test]
async fn plant_sets_plot_fields_and_consumes_the_seed() {
    let h = Harness::new().await;
    h.grant(&[(1, SUNPETAL)]).await;

    let report = h.service.plant(USER, &[req(1, 2)]).await.expect("plant");
    assert_eq!(report.planted, vec![PlotPosition::ALL[2]]);
    assert!(report.skipped.is_empty());
    assert!(!h.store().has_seed(USER, SeedInstanceId(1)).await);
    assert_eq!(
        h.raw().await,
        Some(format!("0~black~-1~0~0~0|1~black~-1~0~0~0|2~black~1~{START}~0~1"))
    );
}

#[tokio::test]
async fn plant_on_occupied_plot_keeps_plot_and_seed() {
    let h = Harness::new().await;
    h.grant(&[(1, SUNPETAL), (2, MOSSBELL)]).await;
    h.service.plant(USER, &[req(1, 0)]).await.expect("plant");
    let before = h.raw().await;

    h.clock.advance(10);
    let report = h.service.plant(USER, &[req(2, 0)]).await.expect("plant");
    assert!(report.planted.is_empty());
    assert_eq!(
        report.skipped.first().map(|s| s.reason.clone()),
        Some(ValidationError::PlotOccupied(PlotPosition::ALL[0]))
    );
    assert!(h.store().has_seed(USER, SeedInstanceId(2)).await);
    assert_eq!(h.raw().await, before);
}

#[tokio::test]
async fn plant_batch_skips_bad_entries_individually() {
    let h = Harness::new().await;
    h.grant(&[(1, SUNPETAL), (2, MOSSBELL), (3, MOSSBELL)]).await;

    let report = h
        .service
        .plant(
            USER,
            &[req(1, 0), req(2, 3), req(2, -1), req(99, 1), req(2, 0), req(3, 2)],
        )
        .await
        .expect("plant");

    let [first, _, last] = PlotPosition::ALL;
    assert_eq!(report.planted, vec![first, last]);
    let reasons: Vec<ValidationError> = report.skipped.iter().map(|s| s.reason.clone()).collect();
    assert_eq!(
        reasons,
        vec![
            ValidationError::InvalidPosition(3),
            ValidationError::InvalidPosition(-1),
            ValidationError::SeedNotOwned(SeedInstanceId(99)),
            ValidationError::PlotOccupied(first),
        ]
    );
    assert!(h.store().has_seed(USER, SeedInstanceId(2)).await);
    assert_eq!(h.store().garden_writes(), 1);
}

#[tokio::test]
async fn plant_with_no_successes_persists_nothing() {
    let h = Harness::new().await;
    let report = h.service.plant(USER, &[req(5, 0), req(6, 9)]).await.expect("plant");
    assert!(report.planted.is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(h.store().garden_writes(), 0);
    assert_eq!(h.raw().await, None);
}

#[tokio::test]
async fn seeds_owned_by_someone_else_cannot_be_planted() {
    let h = Harness::new().await;
    h.store()
        .grant_seed(UserId(2002), SeedInstanceId(1), SUNPETAL)
        .await;
    let report = h.service.plant(USER, &[req(1, 0)]).await.expect("plant");
    assert_eq!(
        report.skipped.first().map(|s| s.reason.clone()),
        Some(ValidationError::SeedNotOwned(SeedInstanceId(1)))
    );
    assert!(h.store().has_seed(UserId(2002), SeedInstanceId(1)).await);
}

#[tokio::test]
async fn concurrent_duplicate_plants_consume_the_seed_once() {
    let h = Harness::new().await;
    h.grant(&[(7, SUNPETAL)]).await;

    let mut handles = Vec::new();
    for position in 0..3 {
        let service = Arc::clone(&h.service);
        handles.push(tokio::spawn(async move {
            service.plant(USER, &[req(7, position)]).await
        }));
    }

    let mut planted = 0;
    for handle in handles {
        let report = handle.await.expect("join").expect("plant");
        planted += report.planted.len();
    }
    assert_eq!(planted, 1);

    let garden = petgarden_garden::decode(h.raw().await.as_deref());
    assert_eq!(garden.occupied().count(), 1);
}

// ---------------------------------------------------------------------------
// dig
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dig_on_empty_plot_leaves_the_string_byte_identical() {
    let h = Harness::new().await;
    let raw = "0~black~-1~0~0~0|1~red~2~1690000000~1690000500~1|2~black~-1~0~0~0";
    h.store().set_raw_garden(USER, Some(raw)).await;

    assert!(!h.service.dig(USER, 0).await.expect("dig"));
    assert!(!h.service.dig(USER, 2).await.expect("dig"));
    assert_eq!(h.raw().await.as_deref(), Some(raw));
    assert_eq!(h.store().garden_writes(), 0);
}

#[tokio::test]
async fn dig_resets_only_the_target_plot() {
    let h = Harness::new().await;
    let raw = "0~blue~1~100~200~1|1~red~2~1690000000~1690000500~1|2~black~-1~0~0~0";
    h.store().set_raw_garden(USER, Some(raw)).await;

    assert!(h.service.dig(USER, 1).await.expect("dig"));
    assert_eq!(
        h.raw().await.as_deref(),
        Some("0~blue~1~100~200~1|1~black~-1~0~0~0|2~black~-1~0~0~0")
    );
}

#[tokio::test]
async fn dig_rejects_out_of_range_positions() {
    let h = Harness::new().await;
    for position in [-1, 3, 255] {
        assert!(matches!(
            h.service.dig(USER, position).await,
            Err(GardenError::Validation(ValidationError::InvalidPosition(p))) if p == position
        ));
    }
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_with_full_half_and_fresh_plots() {
    let h = Harness::new().await;
    let raw = format!(
        "0~black~1~{}~0~1|1~black~1~{}~0~1|2~black~2~{START}~0~1",
        START - GROWTH,
        START - GROWTH / 2
    );
    h.store().set_raw_garden(USER, Some(&raw)).await;

    let status = h.service.status(USER).await.expect("status");
    assert_eq!(status.progress, 50);
    assert!(status.has_newly_grown_flowers);
    assert_eq!(status.next_completion_at, Some(START + GROWTH));
}

#[tokio::test]
async fn status_with_full_half_and_empty_plots() {
    let h = Harness::new().await;
    let raw = format!(
        "0~black~1~{}~0~1|1~black~1~{}~0~1|2~black~-1~0~0~0",
        START - GROWTH,
        START - GROWTH / 2
    );
    h.store().set_raw_garden(USER, Some(&raw)).await;

    let status = h.service.status(USER).await.expect("status");
    assert_eq!(status.progress, 50);
    assert!(status.has_newly_grown_flowers);
}

#[tokio::test]
async fn status_of_default_garden_is_zero() {
    let h = Harness::new().await;
    h.store().set_raw_garden(USER, Some(EMPTY)).await;

    let status = h.service.status(USER).await.expect("status");
    assert_eq!(status.progress, 0);
    assert!(!status.has_newly_grown_flowers);
    assert_eq!(status.next_completion_at, None);
}

#[tokio::test]
async fn unseen_growth_clears_after_a_visit() {
    let h = Harness::new().await;
    h.grow_mossmouse_garden().await;

    let before = h.service.status(USER).await.expect("status");
    assert_eq!(before.progress, 100);
    assert!(before.unseen_growth);

    h.service.set_target(USER, PETALPUP).await.expect("pin");
    h.service.enter(USER).await.expect("enter");

    let after = h.service.status(USER).await.expect("status");
    assert!(after.has_newly_grown_flowers);
    assert!(!after.unseen_growth);
}

#[tokio::test]
async fn status_of_missing_user_is_not_found() {
    let h = Harness::new().await;
    assert!(matches!(
        h.service.status(UserId(5)).await,
        Err(GardenError::NotFound(NotFoundError::User(UserId(5))))
    ));
}

// ---------------------------------------------------------------------------
// catches
// ---------------------------------------------------------------------------

#[tokio::test]
async fn grown_garden_offers_a_catch_that_commits_once() {
    let h = Harness::new().await;
    h.grow_mossmouse_garden().await;

    let view = h.service.enter(USER).await.expect("enter");
    assert!(view.target.is_none());
    let offer = view.catch.expect("catch offer");
    assert_eq!(offer.creature_id, MOSSMOUSE);
    assert_eq!(offer.name, "Mossmouse");

    let pending = h
        .service
        .pending_catch(USER, offer.temporary_id)
        .await
        .expect("pending");
    assert!(pending.garden_originated);

    let resolution = h
        .service
        .resolve_catch(USER, offer.temporary_id, CatchDecision::Commit)
        .await
        .expect("commit");
    assert_eq!(resolution.creature_id, MOSSMOUSE);
    assert!(resolution.instance_id.is_some());
    assert!(resolution.garden_reset);
    assert_eq!(h.raw().await.as_deref(), Some(EMPTY));

    let owned = h.store().creatures_of(USER).await;
    assert_eq!(owned.len(), 1);
    assert!(owned.iter().all(|c| c.creature_id == MOSSMOUSE && c.from_garden));
    assert_eq!(owned.first().map(|c| c.instance_id), resolution.instance_id);

    for decision in [CatchDecision::Commit, CatchDecision::Discard] {
        assert!(matches!(
            h.service.resolve_catch(USER, offer.temporary_id, decision).await,
            Err(GardenError::NotFound(NotFoundError::PendingCatch(_)))
        ));
    }
    assert!(h.store().creatures_of(USER).await.len() == 1);
}

#[tokio::test]
async fn discarding_a_garden_catch_resets_without_materializing() {
    let h = Harness::new().await;
    h.grow_mossmouse_garden().await;
    let offer = h.service.enter(USER).await.expect("enter").catch.expect("catch");

    let resolution = h
        .service
        .resolve_catch(USER, offer.temporary_id, CatchDecision::Discard)
        .await
        .expect("discard");
    assert_eq!(resolution.instance_id, None);
    assert!(resolution.garden_reset);
    assert!(h.store().creatures_of(USER).await.is_empty());
    assert_eq!(h.raw().await.as_deref(), Some(EMPTY));
}

#[tokio::test]
async fn reentering_replaces_the_garden_offer() {
    let h = Harness::new().await;
    h.grow_mossmouse_garden().await;
    let first = h.service.enter(USER).await.expect("enter").catch.expect("catch");
    let second = h.service.enter(USER).await.expect("enter").catch.expect("catch");
    assert_ne!(first.temporary_id, second.temporary_id);

    assert!(matches!(
        h.service.pending_catch(USER, first.temporary_id).await,
        Err(GardenError::NotFound(NotFoundError::PendingCatch(_)))
    ));
    assert!(h.service.pending_catch(USER, second.temporary_id).await.is_ok());
}

#[tokio::test]
async fn replanting_after_digging_invalidates_the_old_garden_offer() {
    let h = Harness::new().await;
    h.grow_mossmouse_garden().await;
    let offer = h.service.enter(USER).await.expect("enter").catch.expect("catch");

    for position in 0..3 {
        assert!(h.service.dig(USER, position).await.expect("dig"));
    }
    h.grant(&[(4, SUNPETAL), (5, SUNPETAL), (6, MOSSBELL)]).await;
    let report = h
        .service
        .plant(USER, &[req(4, 0), req(5, 1), req(6, 2)])
        .await
        .expect("replant");
    assert_eq!(report.planted.len(), 3);
    let replanted = h.raw().await;

    for decision in [CatchDecision::Commit, CatchDecision::Discard] {
        assert!(matches!(
            h.service.resolve_catch(USER, offer.temporary_id, decision).await,
            Err(GardenError::NotFound(NotFoundError::PendingCatch(_)))
        ));
    }
    assert!(h.store().creatures_of(USER).await.is_empty());
    assert_eq!(h.raw().await, replanted);
    assert_eq!(
        h.service.status(USER).await.expect("status").progress,
        0,
        "fresh plantings survive"
    );
}

#[tokio::test]
async fn digging_one_plot_retires_the_garden_offer() {
    let h = Harness::new().await;
    h.grow_mossmouse_garden().await;
    let offer = h.service.enter(USER).await.expect("enter").catch.expect("catch");

    assert!(h.service.dig(USER, 1).await.expect("dig"));
    assert!(matches!(
        h.service.pending_catch(USER, offer.temporary_id).await,
        Err(GardenError::NotFound(NotFoundError::PendingCatch(_)))
    ));
    assert_eq!(h.service.status(USER).await.expect("status").progress, 100);
}

#[tokio::test]
async fn planting_retires_the_garden_offer_only_when_something_grows() {
    let h = Harness::new().await;
    let offer = h
        .service
        .session()
        .allocate(USER, MOSSMOUSE, true)
        .await
        .expect("allocate");
    let other = h
        .service
        .session()
        .allocate(USER, PETALPUP, false)
        .await
        .expect("allocate");

    let report = h.service.plant(USER, &[req(7, 0)]).await.expect("plant");
    assert!(report.planted.is_empty());
    assert!(h.service.pending_catch(USER, offer.temporary_id).await.is_ok());

    h.grant(&[(7, SUNPETAL)]).await;
    let report = h.service.plant(USER, &[req(7, 0)]).await.expect("plant");
    assert_eq!(report.planted.len(), 1);
    assert!(matches!(
        h.service.pending_catch(USER, offer.temporary_id).await,
        Err(GardenError::NotFound(NotFoundError::PendingCatch(_)))
    ));
    assert!(h.service.pending_catch(USER, other.temporary_id).await.is_ok());
}

#[tokio::test]
async fn growing_garden_offers_no_catch() {
    let h = Harness::new().await;
    h.grant(&[(1, MOSSBELL), (2, MOSSBELL), (3, MOSSBELL)]).await;
    h.service
        .plant(USER, &[req(1, 0), req(2, 1), req(3, 2)])
        .await
        .expect("plant");
    h.clock.advance(GROWTH - 60);

    let view = h.service.enter(USER).await.expect("enter");
    assert!(view.catch.is_none());
    assert!(view.target.is_some());
}

#[tokio::test]
async fn unmatched_grown_garden_falls_back_to_a_suggestion() {
    let h = Harness::new().await;
    h.grant(&[(1, SUNPETAL), (2, SUNPETAL), (3, SUNPETAL)]).await;
    h.service
        .plant(USER, &[req(1, 0), req(2, 1), req(3, 2)])
        .await
        .expect("plant");
    h.clock.advance(GROWTH);

    let view = h.service.enter(USER).await.expect("enter");
    assert!(view.catch.is_none());
    assert!(view.target.is_some_and(|t| !t.pinned));
}

#[tokio::test]
async fn already_owned_match_is_still_offered() {
    let h = Harness::new().await;
    for _ in 0..2 {
        h.grow_mossmouse_garden().await;
        let offer = h.service.enter(USER).await.expect("enter").catch.expect("catch");
        assert_eq!(offer.creature_id, MOSSMOUSE);
        h.service
            .resolve_catch(USER, offer.temporary_id, CatchDecision::Commit)
            .await
            .expect("commit");
    }
    assert_eq!(h.store().creatures_of(USER).await.len(), 2);
}

#[tokio::test]
async fn unknown_temporary_id_is_not_found() {
    let h = Harness::new().await;
    let id = petgarden_types::PendingCatchId::new();
    assert!(matches!(
        h.service.pending_catch(USER, id).await,
        Err(GardenError::NotFound(NotFoundError::PendingCatch(_)))
    ));
}

// ---------------------------------------------------------------------------
// targets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pinned_target_suppresses_catch_resolution() {
    let h = Harness::new().await;
    h.grow_mossmouse_garden().await;

    let hint = h.service.set_target(USER, PETALPUP).await.expect("pin");
    assert!(hint.pinned);
    assert_eq!(hint.name, "Petalpup");

    let view = h.service.enter(USER).await.expect("enter");
    assert!(view.catch.is_none());
    assert_eq!(view.target, Some(hint));

    h.service.clear_target(USER).await.expect("clear");
    let view = h.service.enter(USER).await.expect("enter");
    assert_eq!(view.catch.map(|c| c.creature_id), Some(MOSSMOUSE));
    assert!(view.target.is_none());
}

#[tokio::test]
async fn only_seed_catchable_creatures_can_be_pinned() {
    let h = Harness::new().await;
    assert!(matches!(
        h.service.set_target(USER, DUNEHOPPER).await,
        Err(GardenError::Validation(ValidationError::NotSeedCatchable(DUNEHOPPER)))
    ));
    assert!(matches!(
        h.service.set_target(USER, CreatureId(999)).await,
        Err(GardenError::NotFound(NotFoundError::Creature(CreatureId(999))))
    ));
}

// ---------------------------------------------------------------------------
// failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unloaded_catalog_is_a_configuration_error() {
    let h = Harness::with(StaticCatalog::unloaded(), &["black"]).await;
    h.grant(&[(1, MOSSBELL)]).await;
    let report = h.service.plant(USER, &[req(1, 0)]).await.expect("plant");
    assert_eq!(report.planted.len(), 1);

    assert!(matches!(
        h.service.enter(USER).await,
        Err(GardenError::Configuration { .. })
    ));
    assert!(matches!(
        h.service.set_target(USER, MOSSMOUSE).await,
        Err(GardenError::Configuration { .. })
    ));
}

#[tokio::test]
async fn storage_failures_surface_to_the_caller() {
    let h = Harness::new().await;
    h.grant(&[(1, SUNPETAL)]).await;
    h.service.plant(USER, &[req(1, 0)]).await.expect("plant");
    h.store().fail_writes(true);

    assert!(matches!(
        h.service.dig(USER, 0).await,
        Err(GardenError::Storage { .. })
    ));
    h.grant(&[(2, SUNPETAL)]).await;
    assert!(matches!(
        h.service.plant(USER, &[req(2, 1)]).await,
        Err(GardenError::Storage { .. })
    ));
    assert!(h.store().has_seed(USER, SeedInstanceId(2)).await);
}
