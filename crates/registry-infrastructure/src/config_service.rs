//! Configuration service implementation.
//!
//! Loads [`RegistryConfig`] from `config.toml` (by default
//! `~/.config/campus-registry/config.toml`) and then applies environment
//! overrides.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use registry_core::config::RegistryConfig;
use registry_core::error::{RegistryError, Result};

use crate::paths::RegistryPaths;

pub const ENV_STUDENT_SECRET: &str = "DEFAULT_STUDENT_PASSWORD";
pub const ENV_FACULTY_SECRET: &str = "DEFAULT_FACULTY_PASSWORD";
pub const ENV_ADMIN_SECRET: &str = "DEFAULT_ADMIN_PASSWORD";
pub const ENV_HASH_ROUNDS: &str = "HASH_ROUNDS";
pub const ENV_SNAPSHOT_PATH: &str = "REGISTRY_SNAPSHOT_PATH";
pub const ENV_LOG_LEVEL: &str = "REGISTRY_LOG_LEVEL";

/// Loads and caches the registry configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<RegistryConfig>>>,
}

impl ConfigService {
    /// Uses the platform default config location.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(RegistryPaths::config_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading it on first access.
    pub async fn get_config(&self) -> Result<RegistryConfig> {
        {
            let cached = self.config.read().await;
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = Self::load_file(&self.path)?;
        let loaded = apply_overrides(loaded, |key| std::env::var(key).ok())?;

        *self.config.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub async fn invalidate_cache(&self) {
        *self.config.write().await = None;
    }

    /// Reads `path`; a missing or empty file yields the defaults.
    fn load_file(path: &Path) -> Result<RegistryConfig> {
        if !path.exists() {
            tracing::debug!("[ConfigService] No config at {:?}, using defaults", path);
            return Ok(RegistryConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(RegistryConfig::default());
        }

        let config: RegistryConfig = toml::from_str(&content)?;
        tracing::info!("[ConfigService] Loaded config from {:?}", path);
        Ok(config)
    }
}

/// Applies environment overrides on top of `config`.
///
/// `lookup` returns the value of a variable, or `None` when unset.
pub fn apply_overrides<F>(mut config: RegistryConfig, lookup: F) -> Result<RegistryConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secret) = lookup(ENV_STUDENT_SECRET) {
        config.credentials.default_student_secret = secret;
    }
    if let Some(secret) = lookup(ENV_FACULTY_SECRET) {
        config.credentials.default_faculty_secret = secret;
    }
    if let Some(secret) = lookup(ENV_ADMIN_SECRET) {
        config.credentials.default_admin_secret = secret;
    }
    if let Some(rounds) = lookup(ENV_HASH_ROUNDS) {
        config.hashing.rounds = rounds.trim().parse().map_err(|_| {
            RegistryError::config(format!("{} must be a positive integer, got '{}'", ENV_HASH_ROUNDS, rounds))
        })?;
    }
    if let Some(path) = lookup(ENV_SNAPSHOT_PATH) {
        config.store.snapshot_path = Some(PathBuf::from(path));
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }

    if config.hashing.rounds == 0 {
        return Err(RegistryError::config("hashing.rounds must be at least 1"));
    }
    if config.provisioning.identifier_attempts == 0 {
        return Err(RegistryError::config(
            "provisioning.identifier_attempts must be at least 1",
        ));
    }
    Ok(config)
}
