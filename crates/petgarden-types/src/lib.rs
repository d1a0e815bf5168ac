//! Shared type definitions for the Petgarden garden minigame.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Types rendered to players flow to `TypeScript` via `ts-rs`
//! for the browser client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers (integer game keys and UUID v7 handles)
//! - [`plot`] -- [`Plot`], [`Garden`] and their invariants
//! - [`catalog`] -- Static seed and capture-requirement entries
//! - [`catch`] -- Pending catch offers and owned seed instances
//! - [`views`] -- Rendered projections returned to the request layer

pub mod catalog;
pub mod catch;
pub mod ids;
pub mod plot;
pub mod views;

// Re-export all public types at crate root for convenience.
pub use catalog::{
    CaptureMethod, CreatureCaptureRequirement, REQUIRED_PLANTS, RequiredPlant, SeedCatalogEntry,
};
pub use catch::{CatchDecision, CatchResolution, OwnedSeedInstance, PendingCatch};
pub use ids::{
    CreatureId, CreatureInstanceId, PendingCatchId, SeedInstanceId, SeedTypeId, UserId,
};
pub use plot::{DEFAULT_COLOR, EMPTY_SEED, Garden, PLOT_COUNT, Plot, PlotColor, PlotPosition};
pub use views::{CatchOffer, GardenStatus, GardenView, PlantRequest, PlotView, TargetHint};
