//! Backup manager for Sitekeeper
//!
//! Copies the registered site trees into a timestamped staging directory,
//! compresses the stage into a single `backup_<timestamp>.zip` archive and
//! prunes archives beyond the retention count.
//!
//! The archive only ever appears at its final path once compression has
//! succeeded: it is written to a `.part` file first and renamed into place.
//! The staging directory name carries the call's own timestamp, which avoids
//! same-call collisions; concurrent invocations from separate processes are
//! not coordinated (single-operator usage is assumed).

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{Local, NaiveDateTime};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::paths::SitePaths;
use crate::config::registry::SiteRegistry;
use crate::error::{SiteError, SiteResult};

use super::diagnostics::Diagnostics;
use super::filter::ExclusionFilter;
use super::tree::copy_tree;

/// Archive filename prefix; the on-disk contract shared with restore
pub const ARCHIVE_PREFIX: &str = "backup_";
const ARCHIVE_SUFFIX: &str = ".zip";

/// Timestamp format used in archive filenames: `YYYY-MM-DD_HH-MM-SS`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Format the current local time as an archive timestamp
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Parse an archive timestamp back into a datetime
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}

/// Build the archive filename for a timestamp
pub fn archive_filename(timestamp: &str) -> String {
    format!("{}{}{}", ARCHIVE_PREFIX, timestamp, ARCHIVE_SUFFIX)
}

/// Metadata about an existing archive, as returned by listing
#[derive(Debug, Clone)]
pub struct BackupInfo {
    /// Archive filename
    pub filename: String,
    /// Full path to the archive
    pub path: PathBuf,
    /// Timestamp parsed from the filename
    pub timestamp: NaiveDateTime,
    /// Size in bytes
    pub size_bytes: u64,
    /// Filesystem modification time
    pub modified: SystemTime,
}

impl BackupInfo {
    /// Archive size in MiB
    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Receipt describing a successfully created backup
#[derive(Debug, Clone)]
pub struct BackupReceipt {
    /// Timestamp identifying the archive (pass to restore)
    pub timestamp: String,
    /// Archive filename
    pub filename: String,
    /// Full path to the archive
    pub path: PathBuf,
    /// Size in bytes
    pub size_bytes: u64,
    /// Sites included in the archive
    pub sites: Vec<String>,
}

impl BackupReceipt {
    /// Archive size in MiB
    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Creates, lists and prunes site backups
pub struct BackupManager {
    backup_dir: PathBuf,
    registry: SiteRegistry,
    retention: usize,
    filter: ExclusionFilter,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(paths: &SitePaths, registry: SiteRegistry, retention: u32) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            registry,
            retention: retention as usize,
            filter: ExclusionFilter::default(),
        }
    }

    /// Path an archive with the given timestamp would live at
    pub fn archive_path(&self, timestamp: &str) -> PathBuf {
        self.backup_dir.join(archive_filename(timestamp))
    }

    /// Create a backup of the given sites (all registered sites if `None`)
    ///
    /// Every requested name is resolved against the registry before any
    /// copying starts; an unknown name aborts the whole operation and no
    /// archive file is created. After a successful archive, old archives
    /// beyond the retention count are pruned best-effort, with failures
    /// recorded on `diag`.
    pub fn create(
        &self,
        sites: Option<&[String]>,
        diag: &mut Diagnostics,
    ) -> SiteResult<BackupReceipt> {
        let names: Vec<String> = match sites {
            Some(list) => list.to_vec(),
            None => self.registry.names(),
        };

        let mut roots = Vec::with_capacity(names.len());
        for name in &names {
            roots.push((name.clone(), self.registry.resolve(name)?.to_path_buf()));
        }

        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| SiteError::Io(format!("Failed to create backup directory: {}", e)))?;

        let timestamp = current_timestamp();
        let staging = self.backup_dir.join(format!(".staging_{}", timestamp));

        let outcome = self.stage_and_compress(&roots, &timestamp, &staging);

        // Scoped cleanup: the stage goes away whatever compression did
        if staging.exists() {
            if let Err(e) = fs::remove_dir_all(&staging) {
                diag.record(format!(
                    "Failed to remove staging directory {}: {}",
                    staging.display(),
                    e
                ));
            }
        }

        let (path, size_bytes) = outcome?;
        let receipt = BackupReceipt {
            filename: archive_filename(&timestamp),
            timestamp,
            path,
            size_bytes,
            sites: names,
        };

        self.prune(diag);

        Ok(receipt)
    }

    /// Copy each site into the stage, compress, and rename into place
    fn stage_and_compress(
        &self,
        roots: &[(String, PathBuf)],
        timestamp: &str,
        staging: &Path,
    ) -> SiteResult<(PathBuf, u64)> {
        for (name, root) in roots {
            if !root.is_dir() {
                return Err(SiteError::Io(format!(
                    "Site root for '{}' does not exist: {}",
                    name,
                    root.display()
                )));
            }
            copy_tree(root, &staging.join(name), Some(&self.filter))?;
        }

        let final_path = self.archive_path(timestamp);
        let part_path = final_path.with_extension("zip.part");

        if let Err(e) = zip_directory(staging, &part_path) {
            // Never leave a partial archive behind
            let _ = fs::remove_file(&part_path);
            return Err(e);
        }

        fs::rename(&part_path, &final_path)
            .map_err(|e| SiteError::Io(format!("Failed to finalize archive: {}", e)))?;

        let size_bytes = fs::metadata(&final_path)
            .map_err(|e| SiteError::Io(format!("Failed to stat archive: {}", e)))?
            .len();

        Ok((final_path, size_bytes))
    }

    /// List all archives, newest first by their filename timestamp
    ///
    /// Files that fail to parse or stat are skipped and recorded on `diag`.
    pub fn list_archives(&self, diag: &mut Diagnostics) -> SiteResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut archives = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| SiteError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    diag.record(format!("Skipped unreadable directory entry: {}", e));
                    continue;
                }
            };

            let filename = entry.file_name().to_string_lossy().to_string();
            let Some(timestamp) = parse_archive_filename(&filename) else {
                if filename.starts_with(ARCHIVE_PREFIX) && filename.ends_with(ARCHIVE_SUFFIX) {
                    diag.record(format!("Skipped archive with bad timestamp: {}", filename));
                }
                continue;
            };

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    diag.record(format!("Skipped {}: stat failed: {}", filename, e));
                    continue;
                }
            };

            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

            archives.push(BackupInfo {
                filename,
                path: entry.path(),
                timestamp,
                size_bytes: metadata.len(),
                modified,
            });
        }

        // Newest first
        archives.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(archives)
    }

    /// Delete archives beyond the retention count, oldest first
    ///
    /// Ordering is by file modification time, newest retained. Deletion
    /// failures are recorded on `diag` so one locked archive cannot block
    /// pruning of the rest. Returns the paths actually deleted.
    pub fn prune(&self, diag: &mut Diagnostics) -> Vec<PathBuf> {
        let mut archives = match self.list_archives(diag) {
            Ok(archives) => archives,
            Err(e) => {
                diag.record(format!("Prune skipped: {}", e));
                return Vec::new();
            }
        };

        archives.sort_by(|a, b| b.modified.cmp(&a.modified));

        let mut deleted = Vec::new();
        for archive in archives.into_iter().skip(self.retention) {
            match fs::remove_file(&archive.path) {
                Ok(()) => deleted.push(archive.path),
                Err(e) => diag.record(format!(
                    "Failed to delete old backup {}: {}",
                    archive.filename, e
                )),
            }
        }

        deleted
    }
}

/// Parse `backup_<timestamp>.zip` into its timestamp, if well-formed
fn parse_archive_filename(filename: &str) -> Option<NaiveDateTime> {
    let stamp = filename
        .strip_prefix(ARCHIVE_PREFIX)?
        .strip_suffix(ARCHIVE_SUFFIX)?;
    parse_timestamp(stamp)
}

/// Compress a directory into a zip file, preserving relative structure
fn zip_directory(src: &Path, dest: &Path) -> SiteResult<()> {
    let file = File::create(dest)
        .map_err(|e| SiteError::Io(format!("Failed to create archive file: {}", e)))?;
    let mut zip = ZipWriter::new(file);

    let file_options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let dir_options = FileOptions::default().compression_method(CompressionMethod::Stored);

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| SiteError::Io(format!("Path outside staging root: {}", e)))?;
        let name = rel.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            zip.add_directory(name, dir_options)?;
        } else {
            zip.start_file(name, file_options)?;
            let mut f = File::open(entry.path())
                .map_err(|e| SiteError::Io(format!("Failed to read {}: {}", entry.path().display(), e)))?;
            io::copy(&mut f, &mut zip)
                .map_err(|e| SiteError::Io(format!("Failed to compress {}: {}", entry.path().display(), e)))?;
        }
    }

    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Lay out a small site with content plus directories the filter drops
    fn make_site(root: &Path) {
        write(&root.join("index.html"), "<html><body>home</body></html>");
        write(&root.join("css/style.css"), "body { margin: 0 }");
        write(&root.join(".git/HEAD"), "ref: refs/heads/main");
        write(&root.join("logs/old.log"), "stale");
    }

    fn make_manager(temp: &TempDir, retention: u32) -> BackupManager {
        let site_root = temp.path().join("sites/main");
        make_site(&site_root);

        let paths = SitePaths::with_base_dir(temp.path().to_path_buf());
        let registry = SiteRegistry::from_entries([("main".to_string(), site_root)]);
        BackupManager::new(&paths, registry, retention)
    }

    fn fabricate_archive(manager: &BackupManager, timestamp: &str) {
        fs::create_dir_all(&manager.backup_dir).unwrap();
        fs::write(manager.archive_path(timestamp), b"zip-bytes").unwrap();
    }

    #[test]
    fn test_create_produces_archive() {
        let temp = TempDir::new().unwrap();
        let manager = make_manager(&temp, 10);
        let mut diag = Diagnostics::new();

        let receipt = manager.create(None, &mut diag).unwrap();

        assert!(receipt.path.exists());
        assert!(receipt.filename.starts_with(ARCHIVE_PREFIX));
        assert!(receipt.filename.ends_with(ARCHIVE_SUFFIX));
        assert!(parse_timestamp(&receipt.timestamp).is_some());
        assert!(receipt.size_bytes > 0);
        assert_eq!(receipt.sites, vec!["main"]);
    }

    #[test]
    fn test_staging_directory_removed() {
        let temp = TempDir::new().unwrap();
        let manager = make_manager(&temp, 10);
        let mut diag = Diagnostics::new();

        manager.create(None, &mut diag).unwrap();

        let leftovers: Vec<_> = fs::read_dir(&manager.backup_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".staging_"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_unknown_site_creates_no_archive() {
        let temp = TempDir::new().unwrap();
        let manager = make_manager(&temp, 10);
        let mut diag = Diagnostics::new();

        let err = manager
            .create(Some(&["nonexistent".to_string()]), &mut diag)
            .unwrap_err();
        assert!(err.is_config());

        let archives = manager.list_archives(&mut diag).unwrap();
        assert!(archives.is_empty());
    }

    #[test]
    fn test_archive_excludes_vcs_and_logs() {
        let temp = TempDir::new().unwrap();
        let manager = make_manager(&temp, 10);
        let mut diag = Diagnostics::new();

        let receipt = manager.create(None, &mut diag).unwrap();

        let file = File::open(&receipt.path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let names: BTreeSet<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();

        assert!(names.contains("main/index.html"));
        assert!(names.contains("main/css/style.css"));
        assert!(!names.iter().any(|n| n.contains(".git")));
        assert!(!names.iter().any(|n| n.contains("logs")));
    }

    #[test]
    fn test_listing_order_newest_first() {
        let temp = TempDir::new().unwrap();
        let manager = make_manager(&temp, 10);
        let mut diag = Diagnostics::new();

        fabricate_archive(&manager, "2024-01-02_10-00-00");
        fabricate_archive(&manager, "2024-03-01_09-30-00");
        fabricate_archive(&manager, "2024-01-15_23-59-59");

        let archives = manager.list_archives(&mut diag).unwrap();
        let filenames: Vec<_> = archives.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(
            filenames,
            vec![
                "backup_2024-03-01_09-30-00.zip",
                "backup_2024-01-15_23-59-59.zip",
                "backup_2024-01-02_10-00-00.zip",
            ]
        );
    }

    #[test]
    fn test_listing_skips_bad_timestamp_and_records_it() {
        let temp = TempDir::new().unwrap();
        let manager = make_manager(&temp, 10);
        let mut diag = Diagnostics::new();

        fabricate_archive(&manager, "2024-01-02_10-00-00");
        fs::write(manager.backup_dir.join("backup_garbage.zip"), b"x").unwrap();
        fs::write(manager.backup_dir.join("unrelated.txt"), b"x").unwrap();

        let archives = manager.list_archives(&mut diag).unwrap();
        assert_eq!(archives.len(), 1);
        assert_eq!(diag.len(), 1);
        assert!(diag.entries()[0].contains("backup_garbage.zip"));
    }

    #[test]
    fn test_retention_invariant() {
        let temp = TempDir::new().unwrap();
        let manager = make_manager(&temp, 2);
        let mut diag = Diagnostics::new();

        for (i, stamp) in [
            "2024-01-01_00-00-00",
            "2024-01-02_00-00-00",
            "2024-01-03_00-00-00",
            "2024-01-04_00-00-00",
        ]
        .iter()
        .enumerate()
        {
            fabricate_archive(&manager, stamp);
            // Distinct mtimes, creation order
            std::thread::sleep(std::time::Duration::from_millis(10 + i as u64));
        }

        let deleted = manager.prune(&mut diag);
        assert_eq!(deleted.len(), 2);

        let remaining = manager.list_archives(&mut diag).unwrap();
        assert_eq!(remaining.len(), 2);
        // The two most recently written survive
        let filenames: Vec<_> = remaining.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(
            filenames,
            vec![
                "backup_2024-01-04_00-00-00.zip",
                "backup_2024-01-03_00-00-00.zip",
            ]
        );
    }

    #[test]
    fn test_create_prunes_old_archives() {
        let temp = TempDir::new().unwrap();
        let manager = make_manager(&temp, 1);
        let mut diag = Diagnostics::new();

        fabricate_archive(&manager, "2000-01-01_00-00-00");
        std::thread::sleep(std::time::Duration::from_millis(10));

        let receipt = manager.create(None, &mut diag).unwrap();

        let archives = manager.list_archives(&mut diag).unwrap();
        assert_eq!(archives.len(), 1);
        assert_eq!(archives[0].filename, receipt.filename);
    }

    #[test]
    fn test_parse_archive_filename() {
        assert!(parse_archive_filename("backup_2024-06-30_12-00-00.zip").is_some());
        assert!(parse_archive_filename("backup_not-a-date.zip").is_none());
        assert!(parse_archive_filename("other_2024-06-30_12-00-00.zip").is_none());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let stamp = current_timestamp();
        assert!(parse_timestamp(&stamp).is_some());
    }
}
