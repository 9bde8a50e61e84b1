//! Path resolution for registry configuration and data files.
//!
//! ```text
//! ~/.config/campus-registry/       # Config directory
//! └── config.toml                  # RegistryConfig
//!
//! ~/.local/share/campus-registry/  # Data directory
//! └── registry.json                # Store snapshot (CLI default)
//! ```

use std::path::PathBuf;

use thiserror::Error;

use registry_core::RegistryError;

const APP_DIR: &str = "campus-registry";
const CONFIG_FILE: &str = "config.toml";
const SNAPSHOT_FILE: &str = "registry.json";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find the platform {0} directory")]
    DirNotFound(&'static str),
}

impl From<PathError> for RegistryError {
    fn from(err: PathError) -> Self {
        RegistryError::config(err.to_string())
    }
}

pub struct RegistryPaths;

impl RegistryPaths {
    /// Returns the registry configuration directory (e.g. `~/.config/campus-registry/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("config"))
    }

    /// Returns the registry data directory (e.g. `~/.local/share/campus-registry/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("data"))
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn default_snapshot_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join(SNAPSHOT_FILE))
    }
}
