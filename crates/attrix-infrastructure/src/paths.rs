//! Unified path management for Attrix storage.
//!
//! All persisted tracking data is resolved via AppPaths from the
//! version-migrate crate for consistency across platforms.
//!
//! The identity aggregate lives in the *shared* scope — one directory per
//! user, shared by every Attrix-embedding application on the device — so
//! all sites resolve the same visitor. Everything else is per-site.

use std::path::PathBuf;

use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for Attrix.
///
/// # Directory Structure
///
/// ```text
/// ~/.local/share/attrix/           # Shared data directory
/// ├── identity/
/// │   └── visitor.toml             # Cross-site visitor identity
/// └── sites/
///     └── <site>/                  # Per-site scope
///         ├── events/cache.toml
///         ├── metrics/metrics.toml
///         ├── segments/segments.toml
///         └── state/state.toml
///
/// ~/.config/attrix/
/// └── config.toml                  # Tracker configuration
/// ```
pub struct AttrixPaths;

impl AttrixPaths {
    /// Returns a configured AppPaths instance for Attrix.
    fn app_paths() -> AppPaths {
        AppPaths::new("attrix")
    }

    /// Returns the shared (cross-site) data directory.
    pub fn shared_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .data_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the per-site data directory for the given site id.
    pub fn site_dir(site: &str) -> Result<PathBuf, PathError> {
        Ok(Self::shared_dir()?.join("sites").join(site))
    }

    /// Returns the Attrix configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
