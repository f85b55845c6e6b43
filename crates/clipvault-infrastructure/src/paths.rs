//! Path management for clipvault configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/clipvault/         # Config directory (platform config dir)
//! ├── config.toml              # Client configuration
//! └── logs/                    # Client logs
//!     └── clipvault.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "clipvault";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves clipvault's files, optionally rooted at an explicit base directory.
#[derive(Debug, Clone, Default)]
pub struct ClipvaultPaths {
    base: Option<PathBuf>,
}

impl ClipvaultPaths {
    /// Creates a resolver. `base` replaces the platform config directory
    /// (used by `--config` and tests).
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Returns the clipvault configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: The base override, or `<config_dir>/clipvault`
    /// - `Err(PathError::ConfigDirNotFound)`: No override and no platform dir
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the logs directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_base_is_used_verbatim() {
        let paths = ClipvaultPaths::new(Some(PathBuf::from("/tmp/cv")));
        assert_eq!(paths.config_dir().unwrap(), PathBuf::from("/tmp/cv"));
        assert_eq!(paths.config_file().unwrap(), PathBuf::from("/tmp/cv/config.toml"));
        assert_eq!(paths.logs_dir().unwrap(), PathBuf::from("/tmp/cv/logs"));
    }

    #[test]
    fn test_default_dir_ends_with_app_name() {
        // Platforms without a config dir have nothing to check.
        if let Ok(dir) = ClipvaultPaths::default().config_dir() {
            assert!(dir.ends_with("clipvault"));
        }
    }
}
