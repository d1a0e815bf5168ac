//! The garden service: plant, dig, enter, status, targets, and catches.
//!
//! [`GardenService`] owns no state of its own beyond configuration. Every
//! operation loads the encoded garden through the [`UserRecordStore`],
//! decodes it immediately, applies the rules from `petgarden-garden`, and
//! writes the re-encoded garden back. Mutating operations hold the user's
//! lock from [`UserLocks`] for the whole cycle.
//!
//! # Operations
//!
//! - [`enter`](GardenService::enter) -- render plots, a target hint or a
//!   catch offer, and advance the visit watermark
//! - [`plant`](GardenService::plant) -- plant a batch of seeds, skipping
//!   invalid entries individually
//! - [`dig`](GardenService::dig) -- clear one plot
//! - [`status`](GardenService::status) -- headline growth summary
//! - [`set_target`](GardenService::set_target) /
//!   [`clear_target`](GardenService::clear_target) -- pin a creature hint
//! - [`pending_catch`](GardenService::pending_catch) /
//!   [`resolve_catch`](GardenService::resolve_catch) -- answer a catch offer

use std::sync::{Arc, Mutex, PoisonError};

use petgarden_garden::growth::{self, FULLY_GROWN};
use petgarden_garden::{CatchCatalog, CatchResolver, codec, variant_path};
use petgarden_types::{
    CatchDecision, CatchOffer, CatchResolution, CreatureId, Garden, GardenStatus, GardenView,
    PendingCatch, PendingCatchId, PlantRequest, Plot, PlotColor, PlotPosition, PlotView,
    TargetHint, UserId,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::GardenSettings;
use crate::error::{GardenError, NotFoundError, ValidationError};
use crate::ledger::PendingCatchLedger;
use crate::locks::UserLocks;
use crate::store::{CreatureCollection, SeedInventory, TargetPins, UserRecordStore};

/// One planting entry that was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPlant {
    /// The entry as submitted.
    pub request: PlantRequest,
    /// Why it was skipped.
    pub reason: ValidationError,
}

/// Outcome of a planting batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantReport {
    /// Plots planted, in request order.
    pub planted: Vec<PlotPosition>,
    /// Entries skipped, in request order.
    pub skipped: Vec<SkippedPlant>,
}

/// Orchestrates garden operations over injected collaborators.
///
/// `R` provides the user record, seed inventory, and creature collection;
/// `S` provides session-scoped target pins and the pending catch ledger.
pub struct GardenService<R, S> {
    records: R,
    session: S,
    catalog: Arc<dyn CatchCatalog>,
    clock: Arc<dyn Clock>,
    settings: GardenSettings,
    locks: UserLocks,
    rng: Mutex<StdRng>,
}

impl<R, S> GardenService<R, S>
where
    R: UserRecordStore + SeedInventory + CreatureCollection,
    S: TargetPins + PendingCatchLedger,
{
    /// Build a service on the system clock with an OS-seeded RNG.
    pub fn new(
        records: R,
        session: S,
        catalog: Arc<dyn CatchCatalog>,
        settings: GardenSettings,
    ) -> Self {
        Self {
            records,
            session,
            catalog,
            clock: Arc::new(SystemClock),
            settings,
            locks: UserLocks::new(),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the RNG with a deterministic one.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// The user-record collaborator.
    pub const fn records(&self) -> &R {
        &self.records
    }

    /// The session collaborator.
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// The validated garden settings.
    pub const fn settings(&self) -> &GardenSettings {
        &self.settings
    }

    /// Enter the garden.
    ///
    /// Shows the pinned target if one is set. Otherwise, a fully grown
    /// garden is resolved into a catch offer; when there is nothing to
    /// offer, a random seed-catchable creature is suggested. Afterwards the
    /// visit watermark of every occupied plot is set to now and the garden
    /// is persisted.
    pub async fn enter(&self, user_id: UserId) -> Result<GardenView, GardenError> {
        let _guard = self.locks.lock(user_id).await;
        let mut garden = self.load(user_id).await?;
        let now = self.clock.unix_now();
        let resolver = CatchResolver::new(self.catalog.as_ref());

        let mut target = self.pinned_hint(user_id).await?;
        let mut catch = None;

        if target.is_none() {
            if growth::is_ready_to_harvest(&garden, now, self.settings.growth) {
                let owned = self.records.owned_creatures(user_id).await?;
                let resolved = self.with_rng(|rng| resolver.resolve(&garden, &owned, rng))?;
                if let Some(resolved) = resolved {
                    let offer = self
                        .session
                        .allocate(user_id, resolved.creature_id, true)
                        .await?;
                    info!(
                        %user_id,
                        creature_id = %resolved.creature_id,
                        temporary_id = %offer.temporary_id,
                        already_owned = resolved.already_owned,
                        "Garden catch offered"
                    );
                    catch = Some(CatchOffer {
                        temporary_id: offer.temporary_id,
                        creature_id: resolved.creature_id,
                        name: resolved.name,
                    });
                }
            }
            if catch.is_none() {
                let suggestion = self.with_rng(|rng| resolver.suggest_target(rng))?;
                target = suggestion.map(|creature| TargetHint {
                    creature_id: creature.creature_id,
                    name: creature.name.clone(),
                    pinned: false,
                });
            }
        }

        let plots = garden
            .plots()
            .map(|plot| self.render_plot(plot, now))
            .collect::<Result<Vec<_>, _>>()?;

        for plot in garden.plots_mut().filter(|plot| !plot.is_empty()) {
            plot.prior_check_at = now;
        }
        self.records
            .save_garden(user_id, &codec::encode(&garden))
            .await?;

        debug!(%user_id, occupied = garden.occupied().count(), "Garden entered");
        Ok(GardenView {
            plots,
            target,
            catch,
        })
    }

    /// Plant a batch of seeds.
    ///
    /// Entries are applied in order. An entry is skipped if its position is
    /// out of range, the plot is already planted (checked before touching
    /// the inventory, so the seed is kept), or the seed is not owned.
    /// Earlier successes are never rolled back. The garden is persisted only
    /// if at least one entry was planted, and doing so retires any live
    /// garden catch offer.
    pub async fn plant(
        &self,
        user_id: UserId,
        requests: &[PlantRequest],
    ) -> Result<PlantReport, GardenError> {
        let _guard = self.locks.lock(user_id).await;
        let mut garden = self.load(user_id).await?;
        let now = self.clock.unix_now();
        let mut report = PlantReport::default();

        let mut outcome = Ok(());
        for request in requests {
            match self.plant_one(user_id, &mut garden, *request, now).await {
                Ok(Ok(position)) => report.planted.push(position),
                Ok(Err(reason)) => {
                    debug!(%user_id, position = request.position, %reason, "Plant entry skipped");
                    report.skipped.push(SkippedPlant {
                        request: *request,
                        reason,
                    });
                }
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }

        // Seeds already consumed must not be lost if a later entry hit a
        // storage failure.
        if !report.planted.is_empty() {
            self.records
                .save_garden(user_id, &codec::encode(&garden))
                .await?;
            self.retire_garden_offer(user_id).await?;
            info!(
                %user_id,
                planted = report.planted.len(),
                skipped = report.skipped.len(),
                "Seeds planted"
            );
        }

        outcome.map(|()| report)
    }

    async fn plant_one(
        &self,
        user_id: UserId,
        garden: &mut Garden,
        request: PlantRequest,
        now: i64,
    ) -> Result<Result<PlotPosition, ValidationError>, GardenError> {
        let Some(position) = PlotPosition::from_raw(request.position) else {
            return Ok(Err(ValidationError::InvalidPosition(request.position)));
        };
        if !garden.plot(position).is_empty() {
            return Ok(Err(ValidationError::PlotOccupied(position)));
        }

        let Some(seed) = self
            .records
            .seed_instance(user_id, request.seed_instance_id)
            .await?
        else {
            return Ok(Err(ValidationError::SeedNotOwned(request.seed_instance_id)));
        };
        if !self
            .records
            .consume_seed(user_id, request.seed_instance_id)
            .await?
        {
            return Ok(Err(ValidationError::SeedAlreadyConsumed(
                request.seed_instance_id,
            )));
        }

        let color = self.random_color();
        *garden.plot_mut(position) = Plot {
            position,
            color,
            seed_type_id: Some(seed.seed_type_id),
            planted_at: now,
            prior_check_at: 0,
            active: true,
        };
        Ok(Ok(position))
    }

    /// Clear one plot back to the empty default.
    ///
    /// Returns whether anything changed. Digging a plot that is already the
    /// default writes nothing, so the stored garden stays byte-identical.
    /// A change retires any live garden catch offer.
    pub async fn dig(&self, user_id: UserId, position: i64) -> Result<bool, GardenError> {
        let position =
            PlotPosition::from_raw(position).ok_or(ValidationError::InvalidPosition(position))?;

        let _guard = self.locks.lock(user_id).await;
        let mut garden = self.load(user_id).await?;
        if garden.plot(position).is_default() {
            return Ok(false);
        }

        garden.reset(position);
        self.records
            .save_garden(user_id, &codec::encode(&garden))
            .await?;
        self.retire_garden_offer(user_id).await?;
        info!(%user_id, %position, "Plot dug");
        Ok(true)
    }

    /// Headline growth summary. Read-only.
    ///
    /// Overall progress is 100 when every planted plot is fully grown,
    /// otherwise the highest progress among plots still growing. The next
    /// completion is the latest planting time plus the growth duration.
    pub async fn status(&self, user_id: UserId) -> Result<GardenStatus, GardenError> {
        let garden = self.load(user_id).await?;
        Ok(summarize(&garden, self.clock.unix_now(), self.settings.growth))
    }

    /// Pin a seed-catchable creature as the target hint.
    pub async fn set_target(
        &self,
        user_id: UserId,
        creature_id: CreatureId,
    ) -> Result<TargetHint, GardenError> {
        let creature = self
            .catalog
            .requirements_for(creature_id)?
            .ok_or(NotFoundError::Creature(creature_id))?;
        if !creature.is_seed_catchable() {
            return Err(ValidationError::NotSeedCatchable(creature_id).into());
        }
        let hint = TargetHint {
            creature_id,
            name: creature.name.clone(),
            pinned: true,
        };

        self.session.pin_target(user_id, creature_id).await?;
        info!(%user_id, %creature_id, "Garden target pinned");
        Ok(hint)
    }

    /// Remove the pinned target hint.
    pub async fn clear_target(&self, user_id: UserId) -> Result<(), GardenError> {
        self.session.clear_target(user_id).await?;
        debug!(%user_id, "Garden target cleared");
        Ok(())
    }

    /// Look up a live catch offer without consuming it.
    pub async fn pending_catch(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
    ) -> Result<PendingCatch, GardenError> {
        self.session
            .resolve(user_id, temporary_id)
            .await?
            .ok_or_else(|| NotFoundError::PendingCatch(temporary_id).into())
    }

    /// Commit or discard a catch offer.
    ///
    /// The offer is consumed first, so a second call with the same id is
    /// [`NotFoundError::PendingCatch`] whichever decision either call made.
    /// Committing materializes an owned creature. A garden-originated offer
    /// resets the garden on either decision.
    pub async fn resolve_catch(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
        decision: CatchDecision,
    ) -> Result<CatchResolution, GardenError> {
        let _guard = self.locks.lock(user_id).await;
        let offer = self
            .session
            .take(user_id, temporary_id)
            .await?
            .ok_or(NotFoundError::PendingCatch(temporary_id))?;

        let instance_id = match decision {
            CatchDecision::Commit => Some(
                self.records
                    .add_creature(user_id, offer.creature_id, offer.garden_originated)
                    .await?,
            ),
            CatchDecision::Discard => None,
        };

        if offer.garden_originated {
            self.records
                .save_garden(user_id, &codec::encode(&Garden::empty()))
                .await?;
        }

        info!(
            %user_id,
            %temporary_id,
            creature_id = %offer.creature_id,
            ?decision,
            garden_reset = offer.garden_originated,
            "Catch resolved"
        );
        Ok(CatchResolution {
            temporary_id,
            creature_id: offer.creature_id,
            decision,
            instance_id,
            garden_reset: offer.garden_originated,
        })
    }

    /// A garden offer describes the harvest it was made for; once the plots
    /// change it must not be committed against them.
    async fn retire_garden_offer(&self, user_id: UserId) -> Result<(), GardenError> {
        if let Some(temporary_id) = self.session.retire_garden_offer(user_id).await? {
            info!(%user_id, %temporary_id, "Garden catch offer retired after garden change");
        }
        Ok(())
    }

    async fn load(&self, user_id: UserId) -> Result<Garden, GardenError> {
        let raw = self.records.load_garden(user_id).await?;
        let (garden, report) = codec::decode_checked(raw.as_deref());
        if !report.is_clean() {
            warn!(
                %user_id,
                normalized_segments = report.normalized_segments,
                extra_segments = report.extra_segments,
                "Stored garden was malformed, normalized to defaults"
            );
        }
        Ok(garden)
    }

    async fn pinned_hint(&self, user_id: UserId) -> Result<Option<TargetHint>, GardenError> {
        let Some(creature_id) = self.session.pinned_target(user_id).await? else {
            return Ok(None);
        };
        let Some(creature) = self.catalog.requirements_for(creature_id)? else {
            warn!(%user_id, %creature_id, "Pinned target missing from catalog, ignoring pin");
            return Ok(None);
        };
        Ok(Some(TargetHint {
            creature_id,
            name: creature.name.clone(),
            pinned: true,
        }))
    }

    fn render_plot(&self, plot: &Plot, now: i64) -> Result<PlotView, GardenError> {
        let seed = match plot.seed_type_id {
            Some(seed_type_id) => self.catalog.seed(seed_type_id)?,
            None => None,
        };
        Ok(PlotView {
            position: plot.position,
            color: plot.color.clone(),
            seed_type_id: plot.seed_type_id,
            seed_name: seed.map(|seed| seed.name.clone()),
            asset_path: seed.map(|seed| variant_path(&seed.asset_path, &plot.color)),
            progress: growth::plot_progress(plot, now, self.settings.growth),
            prior_progress: growth::plot_prior_progress(plot, self.settings.growth),
            planted_at: plot.planted_at,
        })
    }

    fn random_color(&self) -> PlotColor {
        let palette = &self.settings.palette;
        self.with_rng(|rng| {
            let index = rng.random_range(0..palette.len().max(1));
            palette.get(index).cloned().unwrap_or_default()
        })
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

/// Collapse three independent growth timers into one headline status.
pub fn summarize(garden: &Garden, now: i64, total: growth::GrowthDuration) -> GardenStatus {
    let mut all_grown = true;
    let mut any_grown = false;
    let mut unseen_growth = false;
    let mut growing_max = 0_u8;
    let mut latest_planted: Option<i64> = None;

    for plot in garden.occupied() {
        let live = growth::plot_progress(plot, now, total);
        if live == FULLY_GROWN {
            any_grown = true;
            if growth::plot_prior_progress(plot, total) < FULLY_GROWN {
                unseen_growth = true;
            }
        } else {
            all_grown = false;
            growing_max = growing_max.max(live);
        }
        latest_planted = latest_planted.max(Some(plot.planted_at));
    }

    let Some(latest_planted) = latest_planted else {
        return GardenStatus {
            progress: 0,
            has_newly_grown_flowers: false,
            unseen_growth: false,
            next_completion_at: None,
        };
    };

    GardenStatus {
        progress: if all_grown { FULLY_GROWN } else { growing_max },
        has_newly_grown_flowers: any_grown,
        unseen_growth,
        next_completion_at: Some(growth::completes_at(latest_planted, total)),
    }
}

#[cfg(test)]
mod tests {
    use petgarden_garden::GrowthDuration;
    use petgarden_types::SeedTypeId;

    use super::*;

    fn planted(planted_at: i64, prior_check_at: i64) -> Plot {
        Plot {
            position: PlotPosition::ALL[0],
            color: PlotColor::default(),
            seed_type_id: Some(SeedTypeId(1)),
            planted_at,
            prior_check_at,
            active: true,
        }
    }

    fn garden(plots: [Option<Plot>; 3]) -> Garden {
        let [a, b, c] = PlotPosition::ALL;
        let [pa, pb, pc] = plots;
        Garden::from_plots([
            pa.unwrap_or_else(|| Plot::empty(a)),
            pb.unwrap_or_else(|| Plot::empty(b)),
            pc.unwrap_or_else(|| Plot::empty(c)),
        ])
    }

    const HOUR: i64 = 3600;

    fn hour() -> GrowthDuration {
        GrowthDuration::from_config(Some(HOUR))
    }

    #[test]
    fn empty_garden_reports_nothing() {
        let status = summarize(&Garden::empty(), 10_000, hour());
        assert_eq!(status.progress, 0);
        assert!(!status.has_newly_grown_flowers);
        assert!(!status.unseen_growth);
        assert_eq!(status.next_completion_at, None);
    }

    #[test]
    fn mixed_growth_reports_highest_growing_plot() {
        let now = 10_000;
        let g = garden([
            Some(planted(now - HOUR, 0)),
            Some(planted(now - HOUR / 2, 0)),
            Some(planted(now, 0)),
        ]);
        let status = summarize(&g, now, hour());
        assert_eq!(status.progress, 50);
        assert!(status.has_newly_grown_flowers);
        assert!(status.unseen_growth);
        assert_eq!(status.next_completion_at, Some(now + HOUR));
    }

    #[test]
    fn all_grown_is_forced_to_full() {
        let now = 100_000;
        let g = garden([Some(planted(1000, 0)), None, Some(planted(2000, 0))]);
        let status = summarize(&g, now, hour());
        assert_eq!(status.progress, 100);
        assert!(status.has_newly_grown_flowers);
        assert_eq!(status.next_completion_at, Some(2000 + HOUR));
    }

    #[test]
    fn growth_seen_at_last_visit_is_not_unseen() {
        let now = 100_000;
        let g = garden([Some(planted(1000, 1000 + HOUR)), None, None]);
        let status = summarize(&g, now, hour());
        assert!(status.has_newly_grown_flowers);
        assert!(!status.unseen_growth);
    }
}
