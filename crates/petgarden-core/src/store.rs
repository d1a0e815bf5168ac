//! Collaborators the garden service reads from and writes to.
//!
//! Each trait covers one external concern: the user record holding the
//! encoded garden, the seed inventory, the owned-creature collection, and
//! the session-scoped target pin. In-memory implementations live in
//! [`crate::memory`]; `PostgreSQL` and `Dragonfly` implementations live in
//! `petgarden-db`.
//!
//! Methods return `Send` futures so a service built on them can be shared
//! across tokio tasks.

use std::collections::BTreeSet;
use std::future::Future;

use petgarden_types::{CreatureId, CreatureInstanceId, OwnedSeedInstance, SeedInstanceId, UserId};

use crate::error::GardenError;

/// The user record's single encoded `garden` field.
pub trait UserRecordStore: Send + Sync {
    /// Read the raw encoded garden. `Ok(None)` means the field is null
    /// (never written); a missing user is
    /// [`NotFoundError::User`](crate::error::NotFoundError::User).
    fn load_garden(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<String>, GardenError>> + Send;

    /// Overwrite the raw encoded garden.
    fn save_garden(
        &self,
        user_id: UserId,
        encoded: &str,
    ) -> impl Future<Output = Result<(), GardenError>> + Send;
}

/// The player's seed inventory.
pub trait SeedInventory: Send + Sync {
    /// Look up a seed instance the user owns, `None` if they do not own it.
    fn seed_instance(
        &self,
        user_id: UserId,
        instance_id: SeedInstanceId,
    ) -> impl Future<Output = Result<Option<OwnedSeedInstance>, GardenError>> + Send;

    /// Remove a seed instance from the user's inventory.
    ///
    /// Returns `false` if it was no longer there, so at most one caller
    /// ever consumes a given instance.
    fn consume_seed(
        &self,
        user_id: UserId,
        instance_id: SeedInstanceId,
    ) -> impl Future<Output = Result<bool, GardenError>> + Send;
}

/// The player's permanent creature collection.
pub trait CreatureCollection: Send + Sync {
    /// Creature species the user owns at least one of.
    fn owned_creatures(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<BTreeSet<CreatureId>, GardenError>> + Send;

    /// Materialize a new owned creature and return its instance id.
    fn add_creature(
        &self,
        user_id: UserId,
        creature_id: CreatureId,
        from_garden: bool,
    ) -> impl Future<Output = Result<CreatureInstanceId, GardenError>> + Send;
}

/// Session-scoped pinned target creature.
pub trait TargetPins: Send + Sync {
    /// The pinned creature, if any.
    fn pinned_target(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<CreatureId>, GardenError>> + Send;

    /// Pin a creature, replacing any previous pin.
    fn pin_target(
        &self,
        user_id: UserId,
        creature_id: CreatureId,
    ) -> impl Future<Output = Result<(), GardenError>> + Send;

    /// Remove the pin. A no-op if nothing is pinned.
    fn clear_target(&self, user_id: UserId) -> impl Future<Output = Result<(), GardenError>> + Send;
}
