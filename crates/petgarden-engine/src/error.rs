//! Error types for the service binary.

/// Top-level error for the service binary.
///
/// Each variant wraps a startup subsystem error so `main` can propagate
/// with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: petgarden_core::ConfigError,
    },

    /// The catch catalog could not be loaded.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: petgarden_garden::CatalogError,
    },

    /// A store connection or migration failed.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying data-layer error.
        #[from]
        source: petgarden_db::DbError,
    },

    /// Waiting for the shutdown signal failed.
    #[error("signal error: {message}")]
    Signal {
        /// Description of the signal failure.
        message: String,
    },
}
