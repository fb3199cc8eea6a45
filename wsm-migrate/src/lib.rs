//! # wsm-migrate
//!
//! One-shot migration of the legacy flat-file store (one JSON file per entity
//! kind) into the SQLite destination store. Safe to interrupt and re-run.

pub mod destination;
pub mod error;
pub mod legacy;
pub mod migrator;
pub mod report;
pub mod units;

pub use destination::{present, DestinationStore, SqliteDestination};
pub use error::{LegacyDataError, MigrationError, MigrationFailure, Result};
pub use migrator::Migrator;
pub use report::{MigrationReport, UnitReport, UnitStatus};
pub use units::{EntityKind, LegacyEntity, MigrationUnit, BACKUP_SUFFIX};
