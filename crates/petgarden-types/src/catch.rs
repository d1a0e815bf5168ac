//! Pending catch offers and the inventory units gardening consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{CreatureId, CreatureInstanceId, PendingCatchId, SeedInstanceId, SeedTypeId};

/// An unconfirmed capture offer awaiting commit or discard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PendingCatch {
    /// Temporary handle presented to the player.
    pub temporary_id: PendingCatchId,
    /// The creature on offer.
    pub creature_id: CreatureId,
    /// Produced by the garden; resolving it resets the garden.
    pub garden_originated: bool,
    /// When the offer was made.
    pub offered_at: DateTime<Utc>,
}

/// The player's answer to a pending catch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CatchDecision {
    /// Keep the creature.
    Commit,
    /// Let it go.
    Discard,
}

/// Outcome of resolving a pending catch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CatchResolution {
    /// The consumed temporary handle.
    pub temporary_id: PendingCatchId,
    /// The creature that was on offer.
    pub creature_id: CreatureId,
    /// What the player chose.
    pub decision: CatchDecision,
    /// The owned instance created on commit.
    pub instance_id: Option<CreatureInstanceId>,
    /// Whether the garden was reset to its empty default.
    pub garden_reset: bool,
}

/// A seed in a player's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OwnedSeedInstance {
    /// Unique inventory unit.
    pub instance_id: SeedInstanceId,
    /// What grows when it is planted.
    pub seed_type_id: SeedTypeId,
}
