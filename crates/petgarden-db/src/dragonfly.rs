//! `Dragonfly` (Redis-compatible) session state.
//!
//! Target pins and pending catch offers are short-lived and per-session, so
//! they live in `Dragonfly` with an expiry rather than in `PostgreSQL`.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `session:{user}:target` | Integer | Pinned target creature id |
//! | `pending:{user}:{id}` | JSON | A [`PendingCatch`] awaiting an answer |
//! | `pending:{user}:garden` | String | Temporary id of the live garden offer |

use std::time::Duration;

use fred::prelude::*;
use fred::types::Expiration;
use petgarden_core::{GardenError, PendingCatchLedger, TargetPins};
use petgarden_types::{CreatureId, PendingCatch, PendingCatchId, UserId};

use crate::error::DbError;

/// Connection handle to a `Dragonfly` instance.
#[derive(Clone)]
pub struct DragonflyPool {
    client: Client,
}

impl DragonflyPool {
    /// Connect to `Dragonfly` at the given URL.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL cannot be parsed.
    /// Returns [`DbError::Dragonfly`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let config = Config::from_url(url)
            .map_err(|e| DbError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to Dragonfly");
        Ok(Self { client })
    }

    /// The underlying [`Client`].
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Close the connection gracefully.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the shutdown command fails.
    pub async fn close(&self) -> Result<(), DbError> {
        self.client.quit().await?;
        tracing::info!("Dragonfly connection closed");
        Ok(())
    }
}

fn target_key(user_id: UserId) -> String {
    format!("session:{user_id}:target")
}

fn pending_key(user_id: UserId, temporary_id: PendingCatchId) -> String {
    format!("pending:{user_id}:{temporary_id}")
}

fn garden_offer_key(user_id: UserId) -> String {
    format!("pending:{user_id}:garden")
}

/// Target pins and the pending catch ledger, stored in `Dragonfly`.
///
/// Every key carries the same expiry, so an abandoned offer or pin
/// disappears on its own.
#[derive(Clone)]
pub struct SessionStore {
    client: Client,
    ttl_seconds: Option<i64>,
}

impl SessionStore {
    /// Create a session store whose keys expire after `ttl`.
    ///
    /// A zero `ttl` means keys never expire.
    pub fn new(pool: &DragonflyPool, ttl: Duration) -> Self {
        let ttl_seconds = i64::try_from(ttl.as_secs())
            .ok()
            .filter(|seconds| *seconds > 0);
        Self {
            client: pool.client.clone(),
            ttl_seconds,
        }
    }

    fn expiration(&self) -> Option<Expiration> {
        self.ttl_seconds.map(Expiration::EX)
    }

    /// Read the pinned creature id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the stored value is not an integer,
    /// or [`DbError::Dragonfly`] if the read fails.
    pub async fn get_target(&self, user_id: UserId) -> Result<Option<CreatureId>, DbError> {
        let key = target_key(user_id);
        let value: Option<String> = self.client.get(&key).await?;
        value
            .map(|raw| {
                raw.parse::<i32>()
                    .map(CreatureId)
                    .map_err(|e| DbError::Config(format!("{key} is not a valid creature id: {e}")))
            })
            .transpose()
    }

    /// Pin a creature, replacing any previous pin.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the write fails.
    pub async fn set_target(&self, user_id: UserId, creature_id: CreatureId) -> Result<(), DbError> {
        let _: () = self
            .client
            .set(
                target_key(user_id),
                creature_id.into_inner(),
                self.expiration(),
                None,
                false,
            )
            .await?;
        Ok(())
    }

    /// Remove the pin.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the delete fails.
    pub async fn delete_target(&self, user_id: UserId) -> Result<(), DbError> {
        let _: u32 = self.client.del(target_key(user_id)).await?;
        Ok(())
    }

    /// Store a new offer. A garden offer swaps the garden marker and
    /// deletes whichever offer it pointed at before.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the offer cannot be encoded,
    /// or [`DbError::Dragonfly`] if a write fails.
    pub async fn put_offer(&self, user_id: UserId, offer: &PendingCatch) -> Result<(), DbError> {
        let json = serde_json::to_string(offer)?;
        let _: () = self
            .client
            .set(
                pending_key(user_id, offer.temporary_id),
                json.as_str(),
                self.expiration(),
                None,
                false,
            )
            .await?;

        if offer.garden_originated {
            let previous: Option<String> = self
                .client
                .set(
                    garden_offer_key(user_id),
                    offer.temporary_id.to_string().as_str(),
                    self.expiration(),
                    None,
                    true,
                )
                .await?;
            if let Some(previous) = previous.and_then(|raw| raw.parse::<PendingCatchId>().ok()) {
                let _: u32 = self.client.del(pending_key(user_id, previous)).await?;
                tracing::debug!(%user_id, %previous, "Previous garden offer retired");
            }
        }
        Ok(())
    }

    /// Read an offer without consuming it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the stored JSON is invalid,
    /// or [`DbError::Dragonfly`] if the read fails.
    pub async fn get_offer(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
    ) -> Result<Option<PendingCatch>, DbError> {
        let value: Option<String> = self.client.get(pending_key(user_id, temporary_id)).await?;
        Ok(value.map(|raw| serde_json::from_str(&raw)).transpose()?)
    }

    /// Remove and return an offer with `GETDEL`, so only one caller can
    /// receive it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the stored JSON is invalid,
    /// or [`DbError::Dragonfly`] if the command fails.
    pub async fn take_offer(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
    ) -> Result<Option<PendingCatch>, DbError> {
        let value: Option<String> = self
            .client
            .getdel(pending_key(user_id, temporary_id))
            .await?;
        Ok(value.map(|raw| serde_json::from_str(&raw)).transpose()?)
    }

    /// Remove the garden marker and the offer it points at.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if a command fails.
    pub async fn delete_garden_offer(
        &self,
        user_id: UserId,
    ) -> Result<Option<PendingCatchId>, DbError> {
        let marker: Option<String> = self.client.getdel(garden_offer_key(user_id)).await?;
        let Some(retired) = marker.and_then(|raw| raw.parse::<PendingCatchId>().ok()) else {
            return Ok(None);
        };
        let removed: u32 = self.client.del(pending_key(user_id, retired)).await?;
        Ok((removed > 0).then_some(retired))
    }
}

impl TargetPins for SessionStore {
    async fn pinned_target(&self, user_id: UserId) -> Result<Option<CreatureId>, GardenError> {
        Ok(self.get_target(user_id).await?)
    }

    async fn pin_target(&self, user_id: UserId, creature_id: CreatureId) -> Result<(), GardenError> {
        Ok(self.set_target(user_id, creature_id).await?)
    }

    async fn clear_target(&self, user_id: UserId) -> Result<(), GardenError> {
        Ok(self.delete_target(user_id).await?)
    }
}

impl PendingCatchLedger for SessionStore {
    async fn allocate(
        &self,
        user_id: UserId,
        creature_id: CreatureId,
        garden_originated: bool,
    ) -> Result<PendingCatch, GardenError> {
        let offer = PendingCatch {
            temporary_id: PendingCatchId::new(),
            creature_id,
            garden_originated,
            offered_at: chrono::Utc::now(),
        };
        self.put_offer(user_id, &offer).await?;
        Ok(offer)
    }

    async fn resolve(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
    ) -> Result<Option<PendingCatch>, GardenError> {
        Ok(self.get_offer(user_id, temporary_id).await?)
    }

    async fn take(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
    ) -> Result<Option<PendingCatch>, GardenError> {
        Ok(self.take_offer(user_id, temporary_id).await?)
    }

    async fn retire_garden_offer(
        &self,
        user_id: UserId,
    ) -> Result<Option<PendingCatchId>, GardenError> {
        Ok(self.delete_garden_offer(user_id).await?)
    }
}
