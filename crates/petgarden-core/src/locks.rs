//! Per-user mutual exclusion for garden read-modify-write cycles.
//!
//! Every mutating garden operation loads the encoded garden, checks its
//! preconditions, then writes it back and possibly consumes a seed. Two
//! concurrent requests from the same player would otherwise interleave and
//! double-plant a plot or double-consume a seed. [`UserLocks`] hands out
//! one async mutex per user; operations for different users never contend.

use std::collections::BTreeMap;
use std::sync::Arc;

use petgarden_types::UserId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-user async locks.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<BTreeMap<UserId, Arc<Mutex<()>>>>,
}

/// Held for the duration of one user's read-modify-write.
pub type UserGuard = OwnedMutexGuard<()>;

impl UserLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`'s garden state.
    pub async fn lock(&self, user_id: UserId) -> UserGuard {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Entries nobody holds or waits on are dropped here.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(user_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of users with a live lock entry.
    pub async fn active_users(&self) -> usize {
        self.locks.lock().await.len()
    }
}
