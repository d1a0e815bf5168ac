//! Static catalog entries: seed metadata and creature capture requirements.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{CreatureId, SeedTypeId};
use crate::plot::PlotColor;

/// Number of planted seeds a garden capture requirement names.
pub const REQUIRED_PLANTS: usize = 3;

/// Metadata for one plantable seed type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SeedCatalogEntry {
    /// Seed type identifier referenced by plots and inventory.
    pub id: SeedTypeId,
    /// Display name.
    pub name: String,
    /// Base asset path; colored plantings use a color-qualified variant.
    pub asset_path: String,
}

/// How a creature can be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CaptureMethod {
    /// Grown from a matching combination of garden seeds.
    PlantedSeeds,
    /// Encountered while exploring the world map.
    Wild,
    /// Handed out by a limited-time event.
    Event,
}

/// One `(asset, color)` pair a capture requirement asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RequiredPlant {
    /// Base asset path of the seed.
    pub asset_path: String,
    /// Required palette color; omitted or `black` means uncolored.
    #[serde(default)]
    pub color: PlotColor,
}

/// What it takes to catch a creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CreatureCaptureRequirement {
    /// Creature species identifier.
    pub creature_id: CreatureId,
    /// Display name.
    pub name: String,
    /// How the creature is obtained.
    pub capture_method: CaptureMethod,
    /// Lower is rarer; rarer creatures win ties between matches.
    pub rarity_rank: u32,
    /// Order-irrelevant required plantings.
    #[serde(default)]
    pub requirements: Vec<RequiredPlant>,
}

impl CreatureCaptureRequirement {
    /// Whether this creature can be caught by the garden minigame.
    pub fn is_seed_catchable(&self) -> bool {
        self.capture_method == CaptureMethod::PlantedSeeds
            && self.requirements.len() == REQUIRED_PLANTS
    }
}
