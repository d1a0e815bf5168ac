//! Staging area for catch offers awaiting the player's answer.
//!
//! A catch is offered under a temporary id. The player then commits it
//! (keeping the creature) or discards it. Both paths go through
//! [`PendingCatchLedger::take`], which removes and returns the entry in one
//! step, so an id can be consumed exactly once.
//!
//! Each user has at most one live garden-originated offer: resolving the
//! garden again replaces the previous one rather than stacking offers for
//! the same harvest. Changing the garden retires that offer through
//! [`PendingCatchLedger::retire_garden_offer`], since it no longer describes
//! what is planted.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use petgarden_types::{CreatureId, PendingCatch, PendingCatchId, UserId};
use tokio::sync::Mutex;

use crate::error::GardenError;

/// Per-user store of pending catch offers.
pub trait PendingCatchLedger: Send + Sync {
    /// Record a new offer under a fresh temporary id.
    fn allocate(
        &self,
        user_id: UserId,
        creature_id: CreatureId,
        garden_originated: bool,
    ) -> impl Future<Output = Result<PendingCatch, GardenError>> + Send;

    /// Look up an offer without consuming it.
    fn resolve(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
    ) -> impl Future<Output = Result<Option<PendingCatch>, GardenError>> + Send;

    /// Remove and return an offer. Only the first caller for a given id
    /// receives it.
    fn take(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
    ) -> impl Future<Output = Result<Option<PendingCatch>, GardenError>> + Send;

    /// Drop the user's live garden-originated offer, if any, and return
    /// its id.
    fn retire_garden_offer(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<PendingCatchId>, GardenError>> + Send;
}

#[derive(Debug, Default)]
struct UserOffers {
    offers: BTreeMap<PendingCatchId, PendingCatch>,
    garden_offer: Option<PendingCatchId>,
}

/// Process-local ledger, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    users: Mutex<BTreeMap<UserId, UserOffers>>,
    ttl: Option<Duration>,
}

impl MemoryLedger {
    /// A ledger whose offers live until taken.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger whose offers expire `ttl` after being made.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            users: Mutex::default(),
            ttl: Some(ttl),
        }
    }

    /// Number of offers held, expired ones included until pruned.
    pub async fn stored_offers(&self) -> usize {
        self.users
            .lock()
            .await
            .values()
            .map(|user| user.offers.len())
            .sum()
    }

    fn is_live(&self, offer: &PendingCatch, now: DateTime<Utc>) -> bool {
        self.ttl.is_none_or(|ttl| {
            offer
                .offered_at
                .checked_add_signed(ttl)
                .is_none_or(|expires_at| expires_at > now)
        })
    }
}

impl PendingCatchLedger for MemoryLedger {
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
            offered_at: Utc::now(),
        };

        let mut users = self.users.lock().await;
        if self.ttl.is_some() {
            let now = offer.offered_at;
            users.retain(|_, user| {
                user.offers.retain(|_, offer| self.is_live(offer, now));
                if user
                    .garden_offer
                    .is_some_and(|id| !user.offers.contains_key(&id))
                {
                    user.garden_offer = None;
                }
                !user.offers.is_empty()
            });
        }

        let user = users.entry(user_id).or_default();
        if garden_originated {
            if let Some(previous) = user.garden_offer.replace(offer.temporary_id) {
                user.offers.remove(&previous);
            }
        }
        user.offers.insert(offer.temporary_id, offer.clone());
        Ok(offer)
    }

    async fn resolve(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
    ) -> Result<Option<PendingCatch>, GardenError> {
        let users = self.users.lock().await;
        Ok(users
            .get(&user_id)
            .and_then(|user| user.offers.get(&temporary_id))
            .filter(|offer| self.is_live(offer, Utc::now()))
            .cloned())
    }

    async fn take(
        &self,
        user_id: UserId,
        temporary_id: PendingCatchId,
    ) -> Result<Option<PendingCatch>, GardenError> {
        let mut users = self.users.lock().await;
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(None);
        };
        let offer = user.offers.remove(&temporary_id);
        if user.garden_offer == Some(temporary_id) {
            user.garden_offer = None;
        }
        if user.offers.is_empty() {
            users.remove(&user_id);
        }
        Ok(offer.filter(|offer| self.is_live(offer, Utc::now())))
    }

    async fn retire_garden_offer(
        &self,
        user_id: UserId,
    ) -> Result<Option<PendingCatchId>, GardenError> {
        let mut users = self.users.lock().await;
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(None);
        };
        let retired = user.garden_offer.take();
        if let Some(id) = retired {
            user.offers.remove(&id);
        }
        if user.offers.is_empty() {
            users.remove(&user_id);
        }
        Ok(retired)
    }
}
