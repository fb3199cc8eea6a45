//! Migration orchestrator
//!
//! Migrates every unit in table order, one entity at a time:
//! - A unit without a legacy file is skipped (migrated earlier, or never had data)
//! - Each entity is checked against the destination by identity; present
//!   entities are skipped, absent ones are persisted
//! - Once every entity of a unit is accounted for, the legacy file is renamed
//!   to `<name>.backup`, which marks the unit as done for all future runs
//!
//! The first failure aborts the whole run, returning the error together with
//! the report of every unit reached so far. Nothing is retried: re-running is
//! always safe because already-migrated entities are detected and skipped, so
//! an interrupted unit resumes at its first missing entity.

use crate::destination::DestinationStore;
use crate::error::{MigrationError, MigrationFailure, Result};
use crate::report::{MigrationReport, UnitReport, UnitStatus};
use crate::units::{LegacyEntity, MigrationUnit};
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};

/// Whether entities are written or only checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Migrate,
    DryRun,
}

/// Drives the ordered unit table against one destination store
pub struct Migrator<D> {
    destination: D,
    units: Vec<MigrationUnit>,
}

impl<D: DestinationStore> Migrator<D> {
    /// Migrator over the full unit table for a legacy storage directory
    pub fn new(destination: D, storage_dir: &Path) -> Self {
        Self::with_units(destination, MigrationUnit::all(storage_dir))
    }

    /// Migrator over an explicit unit table, processed in the given order
    pub fn with_units(destination: D, units: Vec<MigrationUnit>) -> Self {
        Self { destination, units }
    }

    pub fn units(&self) -> &[MigrationUnit] {
        &self.units
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    /// Migrate all units
    ///
    /// On failure the returned [`MigrationFailure`] still carries the report of
    /// every unit reached so far.
    pub async fn run(&self) -> std::result::Result<MigrationReport, MigrationFailure> {
        self.execute(Mode::Migrate).await
    }

    /// Dry run: check every entity but write nothing and rename nothing
    pub async fn plan(&self) -> std::result::Result<MigrationReport, MigrationFailure> {
        self.execute(Mode::DryRun).await
    }

    async fn execute(&self, mode: Mode) -> std::result::Result<MigrationReport, MigrationFailure> {
        let mut report = MigrationReport::default();
        let mut run_start: Option<Instant> = None;

        for unit in &self.units {
            let has_legacy_data = match unit.has_legacy_data() {
                Ok(present) => present,
                Err(error) => {
                    error!("{}", error);
                    report.units.push(UnitReport::in_progress(unit.entity_name()));
                    return Err(abort(report, run_start, error));
                }
            };

            // If there is no file, the unit is already done (or never had data)
            if !has_legacy_data {
                debug!(
                    "No legacy data for '{}' entities at {}, skipping",
                    unit.entity_name(),
                    unit.legacy_path().display()
                );
                report.units.push(UnitReport::no_legacy_data(unit.entity_name()));
                continue;
            }

            if run_start.is_none() {
                let started_at = Utc::now();
                run_start = Some(Instant::now());
                report.started_at = Some(started_at);
                info!("Components migration started at {}", started_at.to_rfc3339());
            }

            info!("Starting migration of '{}' entities", unit.entity_name());
            let unit_start = Instant::now();
            let mut unit_report = UnitReport::in_progress(unit.entity_name());
            let outcome = self.migrate_unit(unit, mode, &mut unit_report).await;
            unit_report.elapsed = unit_start.elapsed();
            report.units.push(unit_report);

            if let Err(error) = outcome {
                return Err(abort(report, run_start, error));
            }
        }

        match run_start {
            Some(start) => {
                report.total_elapsed = start.elapsed();
                info!(
                    "Components migration successfully finished. Total migration time: {}ms",
                    report.total_elapsed_millis()
                );
            }
            None => info!("No legacy data found, nothing to migrate"),
        }

        Ok(report)
    }

    /// Counts land in `progress` as they happen, so they survive an abort
    async fn migrate_unit(
        &self,
        unit: &MigrationUnit,
        mode: Mode,
        progress: &mut UnitReport,
    ) -> Result<()> {
        let name = unit.entity_name();
        let start = Instant::now();

        let entities = unit.load_entities().map_err(|e| {
            error!("{}", e);
            e
        })?;
        let total = entities.len();

        for (index, entity) in entities.iter().enumerate() {
            if self.is_migrated(name, entity).await? {
                debug!("{} {}/{}: '{}' already migrated", name, index + 1, total, entity.identity());
                progress.skipped += 1;
                continue;
            }

            if mode == Mode::Migrate {
                self.persist(name, entity).await?;
                debug!("{} {}/{}: migrated '{}'", name, index + 1, total, entity.identity());
            }
            progress.migrated += 1;
        }

        progress.status = match mode {
            Mode::Migrate => {
                mark_completed(unit)?;
                UnitStatus::Completed
            }
            Mode::DryRun => UnitStatus::Planned,
        };

        info!(
            "Migration of '{}' entities successfully finished. Migration time: {}ms, Migrated count: {}, Skipped count: {}",
            name,
            start.elapsed().as_millis(),
            progress.migrated,
            progress.skipped
        );

        Ok(())
    }

    /// A failed check is indeterminate and aborts the run; it never reads as "absent"
    async fn is_migrated(&self, unit: &'static str, entity: &LegacyEntity) -> Result<bool> {
        entity
            .is_migrated(&self.destination)
            .await
            .map_err(|source| {
                error!(
                    "Couldn't check if the {} entity '{}' is migrated due to occurred error",
                    unit,
                    entity.identity()
                );
                MigrationError::IdempotencyCheck {
                    unit,
                    entity: entity.identity(),
                    source,
                }
            })
    }

    async fn persist(&self, unit: &'static str, entity: &LegacyEntity) -> Result<()> {
        entity
            .migrate(&self.destination)
            .await
            .map_err(|source| {
                error!("Error migrating the {} entity '{}'", unit, entity.identity());
                MigrationError::Persist {
                    unit,
                    entity: entity.identity(),
                    source,
                }
            })
    }
}

/// Close the report of an aborted run
fn abort(
    mut report: MigrationReport,
    run_start: Option<Instant>,
    error: MigrationError,
) -> MigrationFailure {
    if let Some(start) = run_start {
        report.total_elapsed = start.elapsed();
    }
    MigrationFailure { report, error }
}

/// Backup the file and remove the original one to avoid future migrations,
/// e.g. `/storage/users.json` becomes `/storage/users.json.backup`
fn mark_completed(unit: &MigrationUnit) -> Result<()> {
    let from = unit.legacy_path();
    let to = unit.backup_path();

    std::fs::rename(from, &to).map_err(|source| {
        error!(
            "Couldn't move {} to {} due to an error. Error: {}",
            from.display(),
            to.display(),
            source
        );
        MigrationError::BackupRename {
            unit: unit.entity_name(),
            from: from.to_path_buf(),
            to,
            source,
        }
    })
}
