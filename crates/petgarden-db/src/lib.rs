//! Data layer for the Petgarden garden service (`PostgreSQL` + `Dragonfly`).
//!
//! `PostgreSQL` holds durable player records; `Dragonfly` holds per-session
//! state that is allowed to expire.
//!
//! ```text
//! GardenService
//!     |
//!     +-- records --> PostgreSQL (GardenStore)
//!     |   |-- users.garden
//!     |   |-- seed_instances
//!     |   +-- owned_creatures
//!     |
//!     +-- session --> Dragonfly (SessionStore)
//!         |-- target pins
//!         +-- pending catch offers
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`garden_store`] -- Garden record, inventory, and collection queries
//! - [`dragonfly`] -- `Dragonfly` connection and session state
//! - [`error`] -- Shared error types

pub mod dragonfly;
pub mod error;
pub mod garden_store;
pub mod postgres;

pub use dragonfly::{DragonflyPool, SessionStore};
pub use error::DbError;
pub use garden_store::GardenStore;
pub use postgres::{PostgresConfig, PostgresPool};
