//! `PostgreSQL` implementation of the garden's record collaborators.
//!
//! | Table | Used for |
//! |-------|----------|
//! | `users` | The encoded `garden` field |
//! | `seed_instances` | Seed inventory; planting deletes a row |
//! | `owned_creatures` | Creature collection; committing a catch inserts a row |

use std::collections::BTreeSet;

use chrono::Utc;
use petgarden_core::{
    CreatureCollection, GardenError, NotFoundError, SeedInventory, UserRecordStore,
};
use petgarden_types::{
    CreatureId, CreatureInstanceId, OwnedSeedInstance, SeedInstanceId, SeedTypeId, UserId,
};
use sqlx::PgPool;

use crate::error::DbError;

/// Garden-facing queries over the player tables.
#[derive(Clone)]
pub struct GardenStore {
    pool: PgPool,
}

impl GardenStore {
    /// Create a store backed by the given pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read a user's garden field.
    ///
    /// The outer `Option` is `None` when the user does not exist; the inner
    /// one is `None` when the field is null.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn fetch_garden(&self, user_id: UserId) -> Result<Option<Option<String>>, DbError> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT garden FROM users WHERE id = $1")
                .bind(user_id.into_inner())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(garden,)| garden))
    }

    /// Overwrite a user's garden field. Returns `false` if no such user.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn write_garden(&self, user_id: UserId, encoded: &str) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE users SET garden = $2 WHERE id = $1")
            .bind(user_id.into_inner())
            .bind(encoded)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Look up a seed instance owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn fetch_seed(
        &self,
        user_id: UserId,
        instance_id: SeedInstanceId,
    ) -> Result<Option<OwnedSeedInstance>, DbError> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT seed_type_id FROM seed_instances WHERE id = $1 AND user_id = $2",
        )
        .bind(instance_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(seed_type_id,)| OwnedSeedInstance {
            instance_id,
            seed_type_id: SeedTypeId(seed_type_id),
        }))
    }

    /// Delete a seed instance if `user_id` still owns it.
    ///
    /// The delete is conditional on ownership, so two concurrent plants of
    /// the same instance see exactly one `true`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete_seed(
        &self,
        user_id: UserId,
        instance_id: SeedInstanceId,
    ) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM seed_instances WHERE id = $1 AND user_id = $2")
            .bind(instance_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Distinct creature species in a user's collection.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn fetch_owned_creatures(
        &self,
        user_id: UserId,
    ) -> Result<BTreeSet<CreatureId>, DbError> {
        let rows: Vec<(i32,)> =
            sqlx::query_as("SELECT DISTINCT creature_id FROM owned_creatures WHERE user_id = $1")
                .bind(user_id.into_inner())
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| CreatureId(id)).collect())
    }

    /// Insert a newly caught creature.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert_creature(
        &self,
        user_id: UserId,
        creature_id: CreatureId,
        from_garden: bool,
    ) -> Result<CreatureInstanceId, DbError> {
        let instance_id = CreatureInstanceId::new();
        sqlx::query(
            "INSERT INTO owned_creatures (id, user_id, creature_id, from_garden, caught_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(instance_id.into_inner())
        .bind(user_id.into_inner())
        .bind(creature_id.into_inner())
        .bind(from_garden)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!(%user_id, %creature_id, %instance_id, from_garden, "Creature inserted");
        Ok(instance_id)
    }
}

impl UserRecordStore for GardenStore {
    async fn load_garden(&self, user_id: UserId) -> Result<Option<String>, GardenError> {
        self.fetch_garden(user_id)
            .await?
            .ok_or(GardenError::NotFound(NotFoundError::User(user_id)))
    }

    async fn save_garden(&self, user_id: UserId, encoded: &str) -> Result<(), GardenError> {
        if self.write_garden(user_id, encoded).await? {
            Ok(())
        } else {
            Err(NotFoundError::User(user_id).into())
        }
    }
}

impl SeedInventory for GardenStore {
    async fn seed_instance(
        &self,
        user_id: UserId,
        instance_id: SeedInstanceId,
    ) -> Result<Option<OwnedSeedInstance>, GardenError> {
        Ok(self.fetch_seed(user_id, instance_id).await?)
    }

    async fn consume_seed(
        &self,
        user_id: UserId,
        instance_id: SeedInstanceId,
    ) -> Result<bool, GardenError> {
        Ok(self.delete_seed(user_id, instance_id).await?)
    }
}

impl CreatureCollection for GardenStore {
    async fn owned_creatures(&self, user_id: UserId) -> Result<BTreeSet<CreatureId>, GardenError> {
        Ok(self.fetch_owned_creatures(user_id).await?)
    }

    async fn add_creature(
        &self,
        user_id: UserId,
        creature_id: CreatureId,
        from_garden: bool,
    ) -> Result<CreatureInstanceId, GardenError> {
        Ok(self.insert_creature(user_id, creature_id, from_garden).await?)
    }
}
