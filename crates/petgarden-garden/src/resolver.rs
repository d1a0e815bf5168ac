//! Resolution of a fully grown garden into a creature capture.
//!
//! Each plot contributes one asset path: the catalog path of its seed, or
//! the color-qualified variant of that path when the plot rolled a
//! non-default color. The resulting multiset is compared against every
//! seed-catchable creature's required multiset. Plot order never matters.
//!
//! Among the matches, creatures the player does not own yet win, rarest
//! first (lowest `rarity_rank`, then lowest creature id). When the player
//! already owns every match, one is drawn uniformly at random so repeat
//! harvests still vary.

use std::collections::{BTreeMap, BTreeSet};

use petgarden_types::{CreatureCaptureRequirement, CreatureId, Garden, PlotColor};
use rand::Rng;

use crate::catalog::{CatalogError, CatchCatalog};

/// Asset path counts, keyed by final (color-qualified) path.
type AssetMultiset = BTreeMap<String, usize>;

/// A creature selected for a catch offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCatch {
    /// The selected creature.
    pub creature_id: CreatureId,
    /// Its display name.
    pub name: String,
    /// Whether the player already owned it.
    pub already_owned: bool,
}

/// Color-qualified variant of an asset path.
///
/// The default color leaves the path untouched. Any other color is inserted
/// as a `_{color}` suffix before the file extension:
/// `seeds/rose.png` + `red` becomes `seeds/rose_red.png`. Paths without an
/// extension get the suffix appended.
pub fn variant_path(asset_path: &str, color: &PlotColor) -> String {
    if color.is_default() {
        return asset_path.to_owned();
    }
    match asset_path.rsplit_once('.') {
        Some((stem, extension))
            if !extension.contains('/') && !stem.is_empty() && !stem.ends_with('/') =>
        {
            format!("{stem}_{color}.{extension}")
        }
        _ => format!("{asset_path}_{color}"),
    }
}

/// Matches gardens against the catalog and picks a capture.
pub struct CatchResolver<'a> {
    catalog: &'a dyn CatchCatalog,
}

impl<'a> CatchResolver<'a> {
    /// Resolve against `catalog`.
    pub const fn new(catalog: &'a dyn CatchCatalog) -> Self {
        Self { catalog }
    }

    /// Every seed-catchable creature whose requirements equal the garden's
    /// planted multiset, in creature id order.
    ///
    /// Empty when a plot is unplanted or holds a seed the catalog does not
    /// know. Errors only when the catalog itself is unavailable.
    pub fn candidates(
        &self,
        garden: &Garden,
    ) -> Result<Vec<&'a CreatureCaptureRequirement>, CatalogError> {
        let creatures = self.catalog.seed_catchable_creatures()?;
        let Some(planted) = self.planted_multiset(garden)? else {
            return Ok(Vec::new());
        };

        Ok(creatures
            .into_iter()
            .filter(|creature| required_multiset(creature) == planted)
            .collect())
    }

    /// Select the capture for a fully grown garden, or `None` if nothing
    /// matches.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        garden: &Garden,
        owned: &BTreeSet<CreatureId>,
        rng: &mut R,
    ) -> Result<Option<ResolvedCatch>, CatalogError> {
        let candidates = self.candidates(garden)?;
        let selected = select(&candidates, owned, rng);
        if let Some(catch) = &selected {
            tracing::debug!(
                creature_id = %catch.creature_id,
                candidates = candidates.len(),
                already_owned = catch.already_owned,
                "Garden resolved to a catch"
            );
        }
        Ok(selected)
    }

    /// A random seed-catchable creature to suggest as a target, `None` if
    /// the catalog has none.
    pub fn suggest_target<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Option<&'a CreatureCaptureRequirement>, CatalogError> {
        let creatures = self.catalog.seed_catchable_creatures()?;
        if creatures.is_empty() {
            return Ok(None);
        }
        let index = rng.random_range(0..creatures.len());
        Ok(creatures.get(index).copied())
    }

    fn planted_multiset(&self, garden: &Garden) -> Result<Option<AssetMultiset>, CatalogError> {
        let mut planted = AssetMultiset::new();
        for plot in garden.plots() {
            let Some(seed_type_id) = plot.seed_type_id else {
                return Ok(None);
            };
            let Some(seed) = self.catalog.seed(seed_type_id)? else {
                tracing::warn!(
                    seed_type_id = %seed_type_id,
                    position = %plot.position,
                    "Planted seed missing from catalog, no catch possible"
                );
                return Ok(None);
            };
            let count = planted
                .entry(variant_path(&seed.asset_path, &plot.color))
                .or_insert(0);
            *count = count.saturating_add(1);
        }
        Ok(Some(planted))
    }
}

fn required_multiset(creature: &CreatureCaptureRequirement) -> AssetMultiset {
    let mut required = AssetMultiset::new();
    for plant in &creature.requirements {
        let count = required
            .entry(variant_path(&plant.asset_path, &plant.color))
            .or_insert(0);
        *count = count.saturating_add(1);
    }
    required
}

/// Apply the selection policy to matching candidates.
///
/// Unowned candidates win, rarest first with ties broken by lowest creature
/// id. If every candidate is owned, one is drawn uniformly from all of them.
pub fn select<R: Rng + ?Sized>(
    candidates: &[&CreatureCaptureRequirement],
    owned: &BTreeSet<CreatureId>,
    rng: &mut R,
) -> Option<ResolvedCatch> {
    let rarest_unowned = candidates
        .iter()
        .filter(|creature| !owned.contains(&creature.creature_id))
        .min_by_key(|creature| (creature.rarity_rank, creature.creature_id));

    if let Some(creature) = rarest_unowned {
        return Some(ResolvedCatch {
            creature_id: creature.creature_id,
            name: creature.name.clone(),
            already_owned: false,
        });
    }

    if candidates.is_empty() {
        return None;
    }
    let index = rng.random_range(0..candidates.len());
    candidates.get(index).map(|creature| ResolvedCatch {
        creature_id: creature.creature_id,
        name: creature.name.clone(),
        already_owned: true,
    })
}
