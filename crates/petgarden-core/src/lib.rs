//! Garden service orchestration for Petgarden.
//!
//! This crate composes the pure garden rules from `petgarden-garden` with
//! the collaborators that hold player state, and exposes the operations the
//! request layer calls.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration and validated garden settings
//! - [`error`] -- [`GardenError`] and its validation / not-found details
//! - [`store`] -- Collaborator traits for records, inventory, and pins
//! - [`ledger`] -- Pending catch offers awaiting commit or discard
//! - [`locks`] -- Per-user mutual exclusion
//! - [`clock`] -- System and manual time sources
//! - [`memory`] -- In-memory collaborators
//! - [`service`] -- [`GardenService`]

pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod locks;
pub mod memory;
pub mod service;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GardenSettings, ServiceConfig};
pub use error::{GardenError, NotFoundError, ValidationError};
pub use ledger::{MemoryLedger, PendingCatchLedger};
pub use locks::UserLocks;
pub use memory::{MemorySession, MemoryStore};
pub use service::{GardenService, PlantReport, SkippedPlant};
pub use store::{CreatureCollection, SeedInventory, TargetPins, UserRecordStore};
