//! Migration run report
//!
//! Returned to the caller instead of being only logged, so a run can be
//! inspected without capturing log output.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// What happened to a unit during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    /// No legacy file: migrated by an earlier run, or never had data
    NoLegacyData,
    /// Every entity accounted for and the legacy file renamed to its backup
    Completed,
    /// Dry run: entities checked, nothing written, file left in place
    Planned,
    /// The run stopped in this unit; counts cover the entities handled before the error
    Aborted,
}

/// Per-unit result
#[derive(Debug, Clone, PartialEq)]
pub struct UnitReport {
    pub entity_name: &'static str,
    pub status: UnitStatus,
    /// Entities written (or, for a dry run, that would be written)
    pub migrated: usize,
    /// Entities already present in the destination
    pub skipped: usize,
    pub elapsed: Duration,
}

impl UnitReport {
    pub(crate) fn no_legacy_data(entity_name: &'static str) -> Self {
        Self::with_status(entity_name, UnitStatus::NoLegacyData)
    }

    /// Entry for a unit being processed; stays `Aborted` unless the unit finishes
    pub(crate) fn in_progress(entity_name: &'static str) -> Self {
        Self::with_status(entity_name, UnitStatus::Aborted)
    }

    fn with_status(entity_name: &'static str, status: UnitStatus) -> Self {
        Self {
            entity_name,
            status,
            migrated: 0,
            skipped: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Result of a whole run, one entry per unit in migration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    /// Wall-clock start, set when the first unit with legacy data begins
    pub started_at: Option<DateTime<Utc>>,
    pub units: Vec<UnitReport>,
    pub total_elapsed: Duration,
}

impl MigrationReport {
    /// Report entry for the named unit
    pub fn unit(&self, entity_name: &str) -> Option<&UnitReport> {
        self.units.iter().find(|u| u.entity_name == entity_name)
    }

    pub fn total_migrated(&self) -> usize {
        self.units.iter().map(|u| u.migrated).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.units.iter().map(|u| u.skipped).sum()
    }

    /// True when no unit had legacy data
    pub fn is_noop(&self) -> bool {
        self.units
            .iter()
            .all(|u| u.status == UnitStatus::NoLegacyData)
    }

    pub fn total_elapsed_millis(&self) -> u128 {
        self.total_elapsed.as_millis()
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for unit in &self.units {
            match unit.status {
                UnitStatus::NoLegacyData => {
                    writeln!(f, "{:<12} skipped (no legacy data)", unit.entity_name)?
                }
                UnitStatus::Completed | UnitStatus::Planned | UnitStatus::Aborted => {
                    let verb = match unit.status {
                        UnitStatus::Planned => "to migrate",
                        UnitStatus::Aborted => "aborted after migrating",
                        _ => "migrated",
                    };
                    writeln!(
                        f,
                        "{:<12} {} {}, already present {}, {}ms",
                        unit.entity_name,
                        verb,
                        unit.migrated,
                        unit.skipped,
                        unit.elapsed_millis()
                    )?
                }
            }
        }
        write!(f, "Total migration time: {}ms", self.total_elapsed_millis())
    }
}
