//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from the configuration file (~/.config/clipvault/config.toml).

use crate::paths::ClipvaultPaths;
use clipvault_core::config::RootConfig;
use clipvault_core::error::{ClipvaultError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the root configuration.
///
/// The file is read once and cached; a missing file is created with the
/// defaults. Unreadable or invalid files fall back to defaults.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: ClipvaultPaths,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a new ConfigService. Nothing is read until first access.
    pub fn new(paths: ClipvaultPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> RootConfig {
        // Check if already cached
        if let Ok(read_lock) = self.config.read()
            && let Some(ref cached) = *read_lock
        {
            return cached.clone();
        }

        let loaded = match self.config_path().and_then(|path| Self::load_or_create(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load config; using defaults");
                RootConfig::default()
            }
        };

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    pub fn paths(&self) -> &ClipvaultPaths {
        &self.paths
    }

    /// Reads and parses the config at `path`.
    pub fn load_from(path: &Path) -> Result<RootConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClipvaultError::io(format!("Failed to read {}: {}", path.display(), e)))?;
        if content.trim().is_empty() {
            return Ok(RootConfig::default());
        }
        Ok(toml::from_str(&content)?)
    }

    /// Loads the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<RootConfig> {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = RootConfig::default();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(&config)?)?;
        tracing::info!(path = %path.display(), "created default config");
        Ok(config)
    }

    fn config_path(&self) -> Result<PathBuf> {
        self.paths
            .config_file()
            .map_err(|e| ClipvaultError::config(e.to_string()))
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(ClipvaultPaths::default())
    }
}
