//! Remote sync placeholder
//!
//! No real transfer protocol is implemented. The module detects which files
//! changed since the last sync marker, records each sync request as a JSON
//! log in the logs directory and persists the remote endpoint settings.
//! A future SFTP/FTP backend would slot in behind `push`/`pull`.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;
use walkdir::WalkDir;

use crate::backup::ExclusionFilter;
use crate::config::paths::SitePaths;
use crate::config::registry::SiteRegistry;
use crate::config::settings::RemoteSettings;
use crate::error::{SiteError, SiteResult};

/// Direction of a sync request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    /// Local files to the remote server
    Push,
    /// Remote files to local
    Pull,
}

impl std::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Pull => write!(f, "pull"),
        }
    }
}

/// JSON record written to the logs directory for every sync request
#[derive(Debug, Serialize)]
struct SyncLog<'a> {
    timestamp: String,
    direction: SyncDirection,
    host: &'a str,
    user: &'a str,
    path: &'a str,
    files_synced: usize,
    files: &'a [String],
}

/// Result of a sync request
#[derive(Debug)]
pub struct SyncOutcome {
    /// Direction that was requested
    pub direction: SyncDirection,
    /// Remote host the request targeted
    pub host: String,
    /// Files detected as changed (push only)
    pub files: Vec<String>,
    /// The JSON log written for this request
    pub log_file: PathBuf,
}

impl SyncOutcome {
    /// Human-readable summary
    pub fn summary(&self) -> String {
        match self.direction {
            SyncDirection::Push => {
                format!("Recorded push of {} file(s) to {}", self.files.len(), self.host)
            }
            SyncDirection::Pull => format!("Recorded pull request from {}", self.host),
        }
    }
}

/// Handles sync change detection and logging
pub struct FileSync {
    paths: SitePaths,
    registry: SiteRegistry,
    remote: RemoteSettings,
}

impl FileSync {
    /// Create a new FileSync against a resolved remote endpoint
    pub fn new(paths: SitePaths, registry: SiteRegistry, remote: RemoteSettings) -> Self {
        Self {
            paths,
            registry,
            remote,
        }
    }

    /// Record a push: detect changes, log them, advance the sync marker
    pub fn push(&self) -> SiteResult<SyncOutcome> {
        self.require_host()?;

        let files = self.detect_changes()?;
        let log_file = self.write_log(SyncDirection::Push, &files)?;

        // Advance the marker only after the log is on disk
        fs::write(self.paths.sync_marker(), Local::now().to_rfc3339())
            .map_err(|e| SiteError::Io(format!("Failed to update sync marker: {}", e)))?;

        Ok(SyncOutcome {
            direction: SyncDirection::Push,
            host: self.remote.host.clone(),
            files,
            log_file,
        })
    }

    /// Record a pull request
    pub fn pull(&self) -> SiteResult<SyncOutcome> {
        self.require_host()?;

        let log_file = self.write_log(SyncDirection::Pull, &[])?;

        Ok(SyncOutcome {
            direction: SyncDirection::Pull,
            host: self.remote.host.clone(),
            files: Vec::new(),
            log_file,
        })
    }

    /// Persist the remote endpoint settings as a small JSON config
    pub fn save_remote_config(&self) -> SiteResult<PathBuf> {
        self.require_host()?;

        let json = serde_json::to_string_pretty(&self.remote)
            .map_err(|e| SiteError::Json(format!("Failed to serialize remote config: {}", e)))?;
        let path = self.paths.remote_config_file();
        fs::write(&path, json)
            .map_err(|e| SiteError::Io(format!("Failed to write remote config: {}", e)))?;
        Ok(path)
    }

    fn require_host(&self) -> SiteResult<()> {
        if self.remote.host.trim().is_empty() {
            return Err(SiteError::Config("Remote host not specified".into()));
        }
        Ok(())
    }

    /// Files modified since the last sync marker, as `site/relative` paths
    fn detect_changes(&self) -> SiteResult<Vec<String>> {
        let last_sync = fs::metadata(self.paths.sync_marker())
            .and_then(|m| m.modified())
            .ok();

        let filter = ExclusionFilter::default();
        let mut changed = Vec::new();

        for (name, root) in self.registry.iter() {
            if !root.is_dir() {
                continue;
            }

            let entries = WalkDir::new(root)
                .into_iter()
                .filter_entry(|e| !filter.is_excluded_name(e.file_name()))
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file());

            for entry in entries {
                let Some(modified) = entry.metadata().ok().and_then(|m| m.modified().ok()) else {
                    continue;
                };
                let is_new = match last_sync {
                    Some(marker) => modified > marker,
                    None => true,
                };
                if is_new {
                    let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
                    changed.push(format!("{}/{}", name, rel.to_string_lossy()));
                }
            }
        }

        changed.sort();
        Ok(changed)
    }

    fn write_log(&self, direction: SyncDirection, files: &[String]) -> SiteResult<PathBuf> {
        fs::create_dir_all(self.paths.log_dir())
            .map_err(|e| SiteError::Io(format!("Failed to create log directory: {}", e)))?;

        let log = SyncLog {
            timestamp: Local::now().to_rfc3339(),
            direction,
            host: &self.remote.host,
            user: &self.remote.user,
            path: &self.remote.path,
            files_synced: files.len(),
            files,
        };

        let filename = format!(
            "sync_{}.log",
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let log_file = self.paths.log_dir().join(filename);

        let json = serde_json::to_string_pretty(&log)
            .map_err(|e| SiteError::Json(format!("Failed to serialize sync log: {}", e)))?;
        fs::write(&log_file, json)
            .map_err(|e| SiteError::Io(format!("Failed to write sync log: {}", e)))?;

        Ok(log_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn make_sync(temp: &TempDir, host: &str) -> FileSync {
        let root = temp.path().join("site");
        write(&root.join("index.html"), "<html></html>");

        let paths = SitePaths::with_base_dir(temp.path().to_path_buf());
        paths.ensure_directories().unwrap();
        let registry = SiteRegistry::from_entries([("site".to_string(), root)]);
        let remote = RemoteSettings {
            enabled: true,
            host: host.to_string(),
            user: "deploy".to_string(),
            ..RemoteSettings::default()
        };
        FileSync::new(paths, registry, remote)
    }

    #[test]
    fn test_push_without_host_is_config_error() {
        let temp = TempDir::new().unwrap();
        let sync = make_sync(&temp, "");
        assert!(sync.push().unwrap_err().is_config());
    }

    #[test]
    fn test_first_push_sees_everything() {
        let temp = TempDir::new().unwrap();
        let sync = make_sync(&temp, "example.com");

        let outcome = sync.push().unwrap();
        assert_eq!(outcome.files, vec!["site/index.html"]);
        assert!(outcome.log_file.exists());

        let log: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&outcome.log_file).unwrap()).unwrap();
        assert_eq!(log["direction"], "push");
        assert_eq!(log["files_synced"], 1);
    }

    #[test]
    fn test_marker_suppresses_unchanged_files() {
        let temp = TempDir::new().unwrap();
        let sync = make_sync(&temp, "example.com");

        sync.push().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));

        let outcome = sync.push().unwrap();
        assert!(outcome.files.is_empty());
    }

    #[test]
    fn test_modified_file_detected_after_marker() {
        let temp = TempDir::new().unwrap();
        let sync = make_sync(&temp, "example.com");

        sync.push().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        write(&temp.path().join("site/new.html"), "fresh");

        let outcome = sync.push().unwrap();
        assert_eq!(outcome.files, vec!["site/new.html"]);
    }

    #[test]
    fn test_pull_writes_log_only() {
        let temp = TempDir::new().unwrap();
        let sync = make_sync(&temp, "example.com");

        let outcome = sync.pull().unwrap();
        assert!(outcome.files.is_empty());
        assert!(outcome.log_file.exists());
    }

    #[test]
    fn test_save_remote_config() {
        let temp = TempDir::new().unwrap();
        let sync = make_sync(&temp, "example.com");

        let path = sync.save_remote_config().unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["host"], "example.com");
        assert_eq!(value["port"], 22);
    }
}
