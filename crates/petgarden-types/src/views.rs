//! Rendered garden state handed to the request layer.
//!
//! These are projections, never persisted. The browser client consumes
//! them through the generated `TypeScript` bindings.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{CreatureId, PendingCatchId, SeedInstanceId, SeedTypeId};
use crate::plot::{PlotColor, PlotPosition};

/// One plot as shown on the garden screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlotView {
    /// Slot index.
    pub position: PlotPosition,
    /// Palette color.
    pub color: PlotColor,
    /// Seed growing here.
    pub seed_type_id: Option<SeedTypeId>,
    /// Seed display name, when the catalog knows the seed.
    pub seed_name: Option<String>,
    /// Asset to draw, color-qualified when the plot is colored.
    pub asset_path: Option<String>,
    /// Live growth percentage.
    pub progress: u8,
    /// Growth percentage as of the previous visit.
    pub prior_progress: u8,
    /// Unix seconds when planted, `0` when empty.
    pub planted_at: i64,
}

/// Creature the player is steering toward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TargetHint {
    /// Suggested or pinned creature.
    pub creature_id: CreatureId,
    /// Display name.
    pub name: String,
    /// Pinned by the player rather than suggested.
    pub pinned: bool,
}

/// A catch presented in place of the target hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CatchOffer {
    /// Handle to commit or discard.
    pub temporary_id: PendingCatchId,
    /// Creature on offer.
    pub creature_id: CreatureId,
    /// Display name.
    pub name: String,
}

/// Everything the garden screen needs after entering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GardenView {
    /// Plots in position order.
    pub plots: Vec<PlotView>,
    /// Target hint; `None` when a catch is presented instead.
    pub target: Option<TargetHint>,
    /// Catch resolved from the fully grown garden.
    pub catch: Option<CatchOffer>,
}

/// Headline growth summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GardenStatus {
    /// Single overall percentage.
    pub progress: u8,
    /// At least one planted plot is fully grown.
    pub has_newly_grown_flowers: bool,
    /// A plot finished growing since the last visit.
    pub unseen_growth: bool,
    /// Unix seconds of the next reported milestone, `None` if nothing is planted.
    pub next_completion_at: Option<i64>,
}

/// One entry of a planting batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlantRequest {
    /// Seed to plant.
    pub seed_instance_id: SeedInstanceId,
    /// Raw target plot index, validated by the service.
    pub position: i64,
}
