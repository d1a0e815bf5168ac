//! In-memory collaborators.
//!
//! [`MemoryStore`] stands in for the user-record, inventory, and collection
//! tables; [`MemorySession`] stands in for the session store. They back the
//! service tests and local runs without `PostgreSQL` or `Dragonfly`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::Duration;
use petgarden_types::{
    CreatureId, CreatureInstanceId, OwnedSeedInstance, PendingCatch, PendingCatchId,
    SeedInstanceId, SeedTypeId, UserId,
};
use tokio::sync::RwLock;

use crate::error::{GardenError, NotFoundError};
use crate::ledger::{MemoryLedger, PendingCatchLedger};
use crate::store::{CreatureCollection, SeedInventory, TargetPins, UserRecordStore};

/// A creature materialized into a player's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedCreature {
    /// Instance handle.
    pub instance_id: CreatureInstanceId,
    /// Owner.
    pub user_id: UserId,
    /// Species.
    pub creature_id: CreatureId,
    /// Whether it came from a garden harvest.
    pub from_garden: bool,
}

#[derive(Debug, Default)]
struct StoreData {
    gardens: BTreeMap<UserId, Option<String>>,
    seeds: BTreeMap<SeedInstanceId, (UserId, SeedTypeId)>,
    creatures: BTreeMap<CreatureInstanceId, OwnedCreature>,
}

/// User records, seed inventory, and creature collection in one map set.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
    garden_writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// An empty store with no users.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a user whose garden field is null.
    pub async fn add_user(&self, user_id: UserId) {
        self.data.write().await.gardens.entry(user_id).or_insert(None);
    }

    /// Overwrite a user's raw garden field, creating the user if needed.
    pub async fn set_raw_garden(&self, user_id: UserId, raw: Option<&str>) {
        self.data
            .write()
            .await
            .gardens
            .insert(user_id, raw.map(str::to_owned));
    }

    /// A user's raw garden field; `None` for a missing user or null field.
    pub async fn raw_garden(&self, user_id: UserId) -> Option<String> {
        self.data.read().await.gardens.get(&user_id).cloned().flatten()
    }

    /// Put a seed instance in a user's inventory.
    pub async fn grant_seed(
        &self,
        user_id: UserId,
        instance_id: SeedInstanceId,
        seed_type_id: SeedTypeId,
    ) {
        self.data
            .write()
            .await
            .seeds
            .insert(instance_id, (user_id, seed_type_id));
    }

    /// Whether a user still holds a seed instance.
    pub async fn has_seed(&self, user_id: UserId, instance_id: SeedInstanceId) -> bool {
        self.data
            .read()
            .await
            .seeds
            .get(&instance_id)
            .is_some_and(|(owner, _)| *owner == user_id)
    }

    /// Creatures owned by a user, in instance order.
    pub async fn creatures_of(&self, user_id: UserId) -> Vec<OwnedCreature> {
        self.data
            .read()
            .await
            .creatures
            .values()
            .filter(|creature| creature.user_id == user_id)
            .copied()
            .collect()
    }

    /// Number of successful garden writes so far.
    pub fn garden_writes(&self) -> usize {
        self.garden_writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), GardenError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GardenError::storage("memory store is read-only"));
        }
        Ok(())
    }
}

impl UserRecordStore for MemoryStore {
    async fn load_garden(&self, user_id: UserId) -> Result<Option<String>, GardenError> {
        self.data
            .read()
            .await
            .gardens
            .get(&user_id)
            .cloned()
            .ok_or(GardenError::NotFound(NotFoundError::User(user_id)))
    }

    async fn save_garden(&self, user_id: UserId, encoded: &str) -> Result<(), GardenError> {
        self.check_writable()?;
        let mut data = self.data.write().await;
        let Some(garden) = data.gardens.get_mut(&user_id) else {
            return Err(NotFoundError::User(user_id).into());
        };
        *garden = Some(encoded.to_owned());
        self.garden_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl SeedInventory for MemoryStore {
    async fn seed_instance(
        &self,
        user_id: UserId,
        instance_id: SeedInstanceId,
    ) -> Result<Option<OwnedSeedInstance>, GardenError> {
        Ok(self
            .data
            .read()
            .await
            .seeds
            .get(&instance_id)
            .filter(|(owner, _)| *owner == user_id)
            .map(|&(_, seed_type_id)| OwnedSeedInstance {
                instance_id,
                seed_type_id,
            }))
    }

    async fn consume_seed(
        &self,
        user_id: UserId,
        instance_id: SeedInstanceId,
    ) -> Result<bool, GardenError> {
        self.check_writable()?;
        let mut data = self.data.write().await;
        let owned = data
            .seeds
            .get(&instance_id)
            .is_some_and(|(owner, _)| *owner == user_id);
        if owned {
            data.seeds.remove(&instance_id);
        }
        Ok(owned)
    }
}

impl CreatureCollection for MemoryStore {
    async fn owned_creatures(&self, user_id: UserId) -> Result<BTreeSet<CreatureId>, GardenError> {
        Ok(self
            .data
            .read()
            .await
            .creatures
            .values()
            .filter(|creature| creature.user_id == user_id)
            .map(|creature| creature.creature_id)
            .collect())
    }

    async fn add_creature(
        &self,
        user_id: UserId,
        creature_id: CreatureId,
        from_garden: bool,
    ) -> Result<CreatureInstanceId, GardenError> {
        self.check_writable()?;
        let instance_id = CreatureInstanceId::new();
        self.data.write().await.creatures.insert(
            instance_id,
            OwnedCreature {
                instance_id,
                user_id,
                creature_id,
                from_garden,
            },
        );
        Ok(instance_id)
    }
}

/// Session state: target pins plus the pending catch ledger.
#[derive(Debug, Default)]
pub struct MemorySession {
    pins: RwLock<BTreeMap<UserId, CreatureId>>,
    ledger: MemoryLedger,
}

impl MemorySession {
    /// A session store whose offers never expire.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session store whose offers expire after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            pins: RwLock::default(),
            ledger: MemoryLedger::with_ttl(ttl),
        }
    }
}

impl TargetPins for MemorySession {
    async fn pinned_target(&self, user_id: UserId) -> Result<Option<CreatureId>, GardenError> {
        Ok(self.pins.read().await.get(&user_id).copied())
    }

    async fn pin_target(&self, user_id: UserId, creature_id: CreatureId) -> Result<(), GardenError> {
        self.pins.write().await.insert(user_id, creature_id);
        Ok(())
    }

    async fn clear_target(&self, user_id: UserId) -> Result<(), GardenError> {
        self.pins.write().await.remove(&user_id);
        Ok(())
    }
}

impl PendingCatchLedger for MemorySession {
    async fn allocate(
        &self,
        user_id: UserId,
        creature_id: CreatureId,
        garden_originated: bool,
    ) -> Result<PendingCatch, GardenError> {
        self.ledger.allocate(user_id, creature_id, garden_originated).await
    }

    async fn resolve(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
    ) -> Result<Option<PendingCatch>, GardenError> {
        self.ledger.resolve(user_id, temporary_id).await
    }

    async fn take(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
    ) -> Result<Option<PendingCatch>, GardenError> {
        self.ledger.take(user_id, temporary_id).await
    }

    async fn retire_garden_offer(
        &self,
        user_id: UserId,
    ) -> Result<Option<PendingCatchId>, GardenError> {
        self.ledger.retire_garden_offer(user_id).await
    }
}
