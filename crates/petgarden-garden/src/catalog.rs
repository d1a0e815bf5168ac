//! Read-only catalog of seeds and creature capture requirements.
//!
//! The catalog is loaded once at process start and never mutated. It is
//! consumed through the [`CatchCatalog`] trait so the resolver and service
//! do not care where the data came from. [`StaticCatalog`] is the YAML-backed
//! implementation:
//!
//! ```yaml
//! seeds:
//!   - id: 204
//!     name: Sunpetal Seed
//!     asset_path: seeds/sunpetal.png
//! creatures:
//!   - creature_id: 12
//!     name: Petalpup
//!     capture_method: planted_seeds
//!     rarity_rank: 3
//!     requirements:
//!       - { asset_path: seeds/sunpetal.png, color: red }
//!       - { asset_path: seeds/sunpetal.png }
//!       - { asset_path: seeds/mossbell.png }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use petgarden_types::{CreatureCaptureRequirement, CreatureId, SeedCatalogEntry, SeedTypeId};
use serde::Deserialize;

/// Errors raised by catalog loading and lookups.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog was never loaded; lookups cannot be answered.
    #[error("catch catalog is not loaded")]
    Unloaded,

    /// Failed to read the catalog file from disk.
    #[error("failed to read catalog file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse catalog YAML.
    #[error("failed to parse catalog YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Two seed entries share an id.
    #[error("duplicate seed id in catalog: {0}")]
    DuplicateSeed(SeedTypeId),

    /// Two creature entries share an id.
    #[error("duplicate creature id in catalog: {0}")]
    DuplicateCreature(CreatureId),
}

impl From<serde_yml::Error> for CatalogError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Lookup interface over the static catalog.
pub trait CatchCatalog: Send + Sync {
    /// Every creature obtainable by planting seeds with exactly three
    /// requirements, in creature id order.
    fn seed_catchable_creatures(&self) -> Result<Vec<&CreatureCaptureRequirement>, CatalogError>;

    /// Capture requirements for one creature, `None` if unknown.
    fn requirements_for(
        &self,
        creature_id: CreatureId,
    ) -> Result<Option<&CreatureCaptureRequirement>, CatalogError>;

    /// Seed metadata, `None` if unknown.
    fn seed(&self, seed_type_id: SeedTypeId) -> Result<Option<&SeedCatalogEntry>, CatalogError>;
}

/// On-disk catalog layout.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    seeds: Vec<SeedCatalogEntry>,
    #[serde(default)]
    creatures: Vec<CreatureCaptureRequirement>,
}

#[derive(Debug, Clone, Default)]
struct CatalogData {
    seeds: BTreeMap<SeedTypeId, SeedCatalogEntry>,
    creatures: BTreeMap<CreatureId, CreatureCaptureRequirement>,
}

/// In-memory catalog, immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    data: Option<CatalogData>,
}

impl StaticCatalog {
    /// A catalog that answers every lookup with [`CatalogError::Unloaded`].
    pub const fn unloaded() -> Self {
        Self { data: None }
    }

    /// Load a catalog from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::parse(&contents)?;
        tracing::info!(
            path = %path.display(),
            seeds = catalog.seed_count(),
            creatures = catalog.creature_count(),
            "Catch catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a catalog from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yml::from_str(yaml)?;
        Self::from_entries(file.seeds, file.creatures)
    }

    /// Build a catalog from entries, rejecting duplicate ids.
    pub fn from_entries(
        seeds: Vec<SeedCatalogEntry>,
        creatures: Vec<CreatureCaptureRequirement>,
    ) -> Result<Self, CatalogError> {
        let mut data = CatalogData::default();
        for seed in seeds {
            let id = seed.id;
            if data.seeds.insert(id, seed).is_some() {
                return Err(CatalogError::DuplicateSeed(id));
            }
        }
        for creature in creatures {
            let id = creature.creature_id;
            if data.creatures.insert(id, creature).is_some() {
                return Err(CatalogError::DuplicateCreature(id));
            }
        }
        Ok(Self { data: Some(data) })
    }

    /// Whether lookups can be answered.
    pub const fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Number of seed entries (`0` when unloaded).
    pub fn seed_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.seeds.len())
    }

    /// Number of creature entries (`0` when unloaded).
    pub fn creature_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.creatures.len())
    }

    fn data(&self) -> Result<&CatalogData, CatalogError> {
        self.data.as_ref().ok_or(CatalogError::Unloaded)
    }
}

impl CatchCatalog for StaticCatalog {
    fn seed_catchable_creatures(&self) -> Result<Vec<&CreatureCaptureRequirement>, CatalogError> {
        Ok(self
            .data()?
            .creatures
            .values()
            .filter(|c| c.is_seed_catchable())
            .collect())
    }

    fn requirements_for(
        &self,
        creature_id: CreatureId,
    ) -> Result<Option<&CreatureCaptureRequirement>, CatalogError> {
        Ok(self.data()?.creatures.get(&creature_id))
    }

    fn seed(&self, seed_type_id: SeedTypeId) -> Result<Option<&SeedCatalogEntry>, CatalogError> {
        Ok(self.data()?.seeds.get(&seed_type_id))
    }
}
