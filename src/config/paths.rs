//! Path management for Sitekeeper
//!
//! Resolves the working base directory and the directories for backups,
//! logs and reports that every component writes into.
//!
//! ## Path Resolution Order
//!
//! 1. `SITEKEEPER_BASE_DIR` environment variable (if set)
//! 2. The current working directory

use std::path::PathBuf;

use crate::error::{SiteError, SiteResult};

/// Manages all paths used by Sitekeeper
#[derive(Debug, Clone)]
pub struct SitePaths {
    /// Base directory that sites, backups, logs and reports live under
    base_dir: PathBuf,
}

impl SitePaths {
    /// Create a new SitePaths instance
    ///
    /// Path resolution:
    /// 1. `SITEKEEPER_BASE_DIR` env var (explicit override)
    /// 2. The current working directory
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new() -> SiteResult<Self> {
        let base_dir = if let Ok(custom) = std::env::var("SITEKEEPER_BASE_DIR") {
            PathBuf::from(custom)
        } else {
            std::env::current_dir()
                .map_err(|e| SiteError::Config(format!("Could not determine working directory: {}", e)))?
        };

        Ok(Self { base_dir })
    }

    /// Create SitePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the backup directory (`<base>/backups/`)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the log directory (`<base>/logs/`)
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the report directory (`<base>/reports/`)
    pub fn report_dir(&self) -> PathBuf {
        self.base_dir.join("reports")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("sitekeeper.json")
    }

    /// Get the path to the remote endpoint config written by `sync setup`
    pub fn remote_config_file(&self) -> PathBuf {
        self.base_dir.join("remote.json")
    }

    /// Get the path to the marker file recording the last successful sync
    pub fn sync_marker(&self) -> PathBuf {
        self.log_dir().join(".last_sync")
    }

    /// Ensure all required directories exist
    ///
    /// Creates the backup, log and report directories under the base.
    pub fn ensure_directories(&self) -> SiteResult<()> {
        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| SiteError::Io(format!("Failed to create backup directory: {}", e)))?;

        std::fs::create_dir_all(self.log_dir())
            .map_err(|e| SiteError::Io(format!("Failed to create log directory: {}", e)))?;

        std::fs::create_dir_all(self.report_dir())
            .map_err(|e| SiteError::Io(format!("Failed to create report directory: {}", e)))?;

        Ok(())
    }
}
