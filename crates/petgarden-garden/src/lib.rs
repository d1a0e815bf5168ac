//! Garden minigame rules for Petgarden.
//!
//! Everything here is synchronous and storage-agnostic. The service layer in
//! `petgarden-core` loads a garden, applies these rules, and persists the
//! result.
//!
//! # Modules
//!
//! - [`codec`] -- The bit-exact `|`/`~` delimited persisted form of a garden
//! - [`growth`] -- Growth percentages computed from timestamps
//! - [`catalog`] -- Read-only seed and capture-requirement lookups
//! - [`resolver`] -- Matching a grown garden to a creature capture

pub mod catalog;
pub mod codec;
pub mod growth;
pub mod resolver;

pub use catalog::{CatalogError, CatchCatalog, StaticCatalog};
pub use codec::{DecodeReport, decode, decode_checked, encode};
pub use growth::{DEFAULT_GROWTH_SECONDS, FULLY_GROWN, GrowthDuration};
pub use resolver::{CatchResolver, ResolvedCatch, variant_path};
