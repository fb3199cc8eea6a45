//! Configuration loading and storage path resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the legacy storage directory
pub const STORAGE_DIR_ENV: &str = "WSM_STORAGE_DIR";

/// Environment variable naming the destination database file
pub const DATABASE_PATH_ENV: &str = "WSM_DATABASE_PATH";

/// Contents of `config.toml`
///
/// Every key is optional; a missing key falls through to the compiled default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub storage_dir: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
}

impl ConfigFile {
    /// Load and parse an explicit config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load the platform config file if one exists
    ///
    /// A missing or unparsable default file is not an error; resolution simply
    /// falls through to the compiled defaults.
    pub fn load_default() -> Option<Self> {
        let path = default_config_file().ok()?;
        match Self::load(&path) {
            Ok(config) => {
                debug!("Loaded config file: {}", path.display());
                Some(config)
            }
            Err(e) => {
                debug!("Ignoring config file {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Path resolution following the priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_path(
    cli_arg: Option<PathBuf>,
    env_var_name: &str,
    config_value: Option<PathBuf>,
    default: impl FnOnce() -> PathBuf,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path;
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = config_value {
        return path;
    }

    // Priority 4: OS-dependent compiled default
    default()
}

/// Get default configuration file path for the platform
fn default_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/wsm/config.toml first, then /etc/wsm/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("wsm").join("config.toml"));
        let system_config = PathBuf::from("/etc/wsm/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let config_file = dirs::config_dir()
        .map(|d| d.join("wsm").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if config_file.exists() {
        Ok(config_file)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", config_file)))
    }
}

/// Get OS-dependent default data folder
fn default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/wsm (or /var/lib/wsm for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("wsm"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/wsm"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("wsm"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/wsm"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("wsm"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\wsm"))
    } else {
        PathBuf::from("./wsm_data")
    }
}

/// Default legacy storage directory (`<data>/storage`)
pub fn default_storage_dir() -> PathBuf {
    default_data_folder().join("storage")
}

/// Default destination database (`<data>/wsm.db`)
pub fn default_database_path() -> PathBuf {
    default_data_folder().join("wsm.db")
}
