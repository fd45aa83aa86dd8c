//! User settings for Sitekeeper
//!
//! Manages the persisted configuration: registered sites, backup retention,
//! scan thresholds and the remote sync endpoint. The settings value is
//! constructed once at process start and passed into each component; there
//! are no ambient global lookups.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::SitePaths;
use crate::error::{SiteError, SiteResult};

/// Remote sync endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Whether remote sync is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Remote hostname
    #[serde(default)]
    pub host: String,
    /// Remote username
    #[serde(default)]
    pub user: String,
    /// Remote document root
    #[serde(default = "default_remote_path")]
    pub path: String,
    /// SSH port
    #[serde(default = "default_remote_port")]
    pub port: u16,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            user: String::new(),
            path: default_remote_path(),
            port: default_remote_port(),
        }
    }
}

/// User settings for Sitekeeper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Registered sites: name -> root directory (relative paths resolve
    /// against the base directory)
    #[serde(default = "default_sites")]
    pub sites: BTreeMap<String, PathBuf>,

    /// Number of backup archives to retain
    #[serde(default = "default_backup_retention")]
    pub backup_retention: u32,

    /// Estimated load time above this many milliseconds draws a warning
    #[serde(default = "default_load_time_warning_ms")]
    pub load_time_warning_ms: u64,

    /// DOM element estimates above this count draw a warning
    #[serde(default = "default_dom_count_warning")]
    pub dom_count_warning: u64,

    /// Combined image weight above this many MiB draws a warning
    #[serde(default = "default_image_size_warning_mib")]
    pub image_size_warning_mib: f64,

    /// Timeout for external link HEAD requests, in seconds
    #[serde(default = "default_link_timeout_secs")]
    pub link_timeout_secs: u64,

    /// Whether link scans should issue HEAD requests for external URLs
    #[serde(default)]
    pub include_external_links: bool,

    /// Remote sync endpoint
    #[serde(default)]
    pub remote: RemoteSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_sites() -> BTreeMap<String, PathBuf> {
    let mut sites = BTreeMap::new();
    sites.insert("main".to_string(), PathBuf::from("."));
    sites
}

fn default_backup_retention() -> u32 {
    10
}

fn default_load_time_warning_ms() -> u64 {
    3000
}

fn default_dom_count_warning() -> u64 {
    1500
}

fn default_image_size_warning_mib() -> f64 {
    10.0
}

fn default_link_timeout_secs() -> u64 {
    5
}

fn default_remote_path() -> String {
    "/var/www/html".to_string()
}

fn default_remote_port() -> u16 {
    22
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            sites: default_sites(),
            backup_retention: default_backup_retention(),
            load_time_warning_ms: default_load_time_warning_ms(),
            dom_count_warning: default_dom_count_warning(),
            image_size_warning_mib: default_image_size_warning_mib(),
            link_timeout_secs: default_link_timeout_secs(),
            include_external_links: false,
            remote: RemoteSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, creating the file with defaults if absent
    pub fn load_or_create(paths: &SitePaths) -> SiteResult<Self> {
        let settings_file = paths.settings_file();

        if settings_file.exists() {
            let contents = std::fs::read_to_string(&settings_file)
                .map_err(|e| SiteError::Io(format!("Failed to read settings: {}", e)))?;
            serde_json::from_str(&contents)
                .map_err(|e| SiteError::Json(format!("Failed to parse settings: {}", e)))
        } else {
            let settings = Self::default();
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Persist settings to disk
    pub fn save(&self, paths: &SitePaths) -> SiteResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SiteError::Json(format!("Failed to serialize settings: {}", e)))?;

        if let Some(parent) = paths.settings_file().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SiteError::Io(format!("Failed to create settings directory: {}", e)))?;
        }

        std::fs::write(paths.settings_file(), json)
            .map_err(|e| SiteError::Io(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.backup_retention, 10);
        assert_eq!(settings.load_time_warning_ms, 3000);
        assert_eq!(settings.dom_count_warning, 1500);
        assert!(!settings.include_external_links);
        assert_eq!(settings.sites.get("main"), Some(&PathBuf::from(".")));
    }

    #[test]
    fn test_load_or_create_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SitePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(!paths.settings_file().exists());
        let settings = Settings::load_or_create(&paths).unwrap();
        assert!(paths.settings_file().exists());
        assert_eq!(settings.backup_retention, 10);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SitePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.backup_retention = 3;
        settings.sites.insert("shop".into(), PathBuf::from("shop"));
        settings.save(&paths).unwrap();

        let reloaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(reloaded.backup_retention, 3);
        assert!(reloaded.sites.contains_key("shop"));
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SitePaths::with_base_dir(temp_dir.path().to_path_buf());

        std::fs::write(paths.settings_file(), r#"{"backup_retention": 5}"#).unwrap();

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.backup_retention, 5);
        assert_eq!(settings.load_time_warning_ms, 3000);
    }
}
