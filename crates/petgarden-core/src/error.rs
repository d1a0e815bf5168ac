//! Error types for the garden service.
//!
//! [`GardenError`] is what every service operation returns. Per-entry
//! planting failures are [`ValidationError`] values reported inside a
//! [`PlantReport`](crate::service::PlantReport) rather than failing the batch.

use petgarden_garden::CatalogError;
use petgarden_types::{CreatureId, PendingCatchId, PlotPosition, SeedInstanceId, UserId};

/// Errors surfaced by garden operations.
#[derive(Debug, thiserror::Error)]
pub enum GardenError {
    /// The catalog or configuration needed to answer is unavailable.
    #[error("configuration error: {source}")]
    Configuration {
        /// The underlying catalog error.
        #[from]
        source: CatalogError,
    },

    /// The request itself is invalid.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// A persistence round trip failed. Not retried.
    #[error("storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },
}

impl GardenError {
    /// Build a [`GardenError::Storage`] from any displayable failure.
    pub fn storage(error: impl core::fmt::Display) -> Self {
        Self::Storage {
            message: error.to_string(),
        }
    }
}

/// Why a request, or one entry of a planting batch, was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The plot index is outside `0..3`.
    #[error("plot position {0} is out of range")]
    InvalidPosition(i64),

    /// The target plot already holds a seed.
    #[error("plot {0} is already planted")]
    PlotOccupied(PlotPosition),

    /// The seed instance is not in the player's inventory.
    #[error("seed instance {0} is not owned by the player")]
    SeedNotOwned(SeedInstanceId),

    /// The seed instance disappeared between lookup and consumption.
    #[error("seed instance {0} was already consumed")]
    SeedAlreadyConsumed(SeedInstanceId),

    /// The creature cannot be caught by planting seeds.
    #[error("creature {0} cannot be caught in the garden")]
    NotSeedCatchable(CreatureId),
}

/// The record a request referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    /// No user record.
    #[error("user {0}")]
    User(UserId),

    /// No live pending catch with this id for the user.
    #[error("pending catch {0}")]
    PendingCatch(PendingCatchId),

    /// No catalog entry for the creature.
    #[error("creature {0}")]
    Creature(CreatureId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_are_configuration_errors() {
        let error = GardenError::from(CatalogError::Unloaded);
        assert!(matches!(error, GardenError::Configuration { .. }));
        assert_eq!(error.to_string(), "configuration error: catch catalog is not loaded");
    }

    #[test]
    fn messages_name_the_offending_value() {
        let error = GardenError::from(ValidationError::InvalidPosition(7));
        assert_eq!(error.to_string(), "invalid request: plot position 7 is out of range");

        let error = GardenError::from(NotFoundError::User(UserId(42)));
        assert_eq!(error.to_string(), "not found: user 42");
    }
}
