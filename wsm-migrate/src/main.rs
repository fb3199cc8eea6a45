//! wsm-migrate - Legacy storage migration tool
//!
//! Moves users, profiles, preferences, ssh keys, workspaces, snapshots,
//! recipes and stacks from the legacy JSON storage directory into the SQLite
//! destination database. Each fully migrated legacy file is renamed to
//! `<name>.backup`; re-running after a failure resumes where it stopped.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wsm_common::config::{
    default_database_path, default_storage_dir, resolve_path, ConfigFile, DATABASE_PATH_ENV,
    STORAGE_DIR_ENV,
};
use wsm_common::db::init_database;
use wsm_migrate::{Migrator, SqliteDestination};

/// Command-line arguments for wsm-migrate
#[derive(Parser, Debug)]
#[command(name = "wsm-migrate")]
#[command(about = "Migrate legacy flat-file storage into the SQLite store")]
#[command(version)]
struct Args {
    /// Legacy storage directory holding users.json, workspaces.json, ...
    #[arg(short, long)]
    storage_dir: Option<PathBuf>,

    /// Destination SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Config file (defaults to ~/.config/wsm/config.toml, then /etc/wsm/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Check what would be migrated without writing or renaming anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(log_filter()).init();

    info!(
        "Starting wsm-migrate v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config_file = match &args.config {
        Some(path) => Some(
            ConfigFile::load(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
        ),
        None => ConfigFile::load_default(),
    }
    .unwrap_or_default();

    let storage_dir = resolve_path(
        args.storage_dir,
        STORAGE_DIR_ENV,
        config_file.storage_dir,
        default_storage_dir,
    );
    let db_path = resolve_path(
        args.database,
        DATABASE_PATH_ENV,
        config_file.database_path,
        default_database_path,
    );

    info!("Legacy storage directory: {}", storage_dir.display());
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize destination database")?;

    let migrator = Migrator::new(SqliteDestination::new(pool), &storage_dir);

    let outcome = if args.dry_run {
        info!("Dry run: nothing will be written or renamed");
        migrator.plan().await
    } else {
        migrator.run().await
    };

    match outcome {
        Ok(report) => {
            println!("{}", report);
            Ok(())
        }
        Err(failure) => {
            println!("{}", failure.report);
            error!("Migration aborted: {}", failure.error);
            error!("Fix the cause and re-run; already migrated entities will be skipped");
            Err(failure.error).context("Migration failed")
        }
    }
}

/// `RUST_LOG` when set, INFO otherwise
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
