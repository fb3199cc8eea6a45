//! Error types for wsm-migrate
//!
//! Every variant is fatal to the run. Recovery is re-running the whole
//! migration: already-migrated entities are detected and skipped.

use crate::report::MigrationReport;
use std::path::PathBuf;
use thiserror::Error;

/// Why a legacy file couldn't be turned into entities
#[derive(Error, Debug)]
pub enum LegacyDataError {
    /// File exists but couldn't be read
    #[error("unreadable: {0}")]
    Unreadable(#[from] std::io::Error),

    /// File content is not the expected JSON shape
    #[error("malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Fatal migration errors
#[derive(Error, Debug)]
pub enum MigrationError {
    /// Legacy file unreadable or structurally invalid; nothing of the unit was touched
    #[error("Corrupt legacy data for '{unit}' entities in {}: {source}", path.display())]
    CorruptLegacyData {
        unit: &'static str,
        path: PathBuf,
        #[source]
        source: LegacyDataError,
    },

    /// Destination lookup failed for a reason other than "not found"
    #[error("Couldn't check if the {unit} entity '{entity}' is migrated: {source}")]
    IdempotencyCheck {
        unit: &'static str,
        entity: String,
        #[source]
        source: wsm_common::Error,
    },

    /// Destination write failed; the legacy file is left in place
    #[error("Error migrating the {unit} entity '{entity}': {source}")]
    Persist {
        unit: &'static str,
        entity: String,
        #[source]
        source: wsm_common::Error,
    },

    /// All entities of the unit are in the destination but the completion marker couldn't be written
    #[error("Couldn't move {} to {}: {source}", from.display(), to.display())]
    BackupRename {
        unit: &'static str,
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MigrationError {
    /// Name of the unit that failed
    pub fn unit(&self) -> &'static str {
        match self {
            MigrationError::CorruptLegacyData { unit, .. }
            | MigrationError::IdempotencyCheck { unit, .. }
            | MigrationError::Persist { unit, .. }
            | MigrationError::BackupRename { unit, .. } => unit,
        }
    }

    /// Identity of the entity that failed, for per-entity errors
    pub fn entity(&self) -> Option<&str> {
        match self {
            MigrationError::IdempotencyCheck { entity, .. }
            | MigrationError::Persist { entity, .. } => Some(entity),
            _ => None,
        }
    }
}

/// An aborted run: the error plus everything the run got done before it
///
/// `report` holds an entry for every unit reached, the failing one last with
/// its counts at the moment of failure.
#[derive(Error, Debug)]
#[error("Migration aborted in '{}' entities: {error}", .error.unit())]
pub struct MigrationFailure {
    pub report: MigrationReport,
    #[source]
    pub error: MigrationError,
}

/// Convenience Result type using the migration error
pub type Result<T> = std::result::Result<T, MigrationError>;
