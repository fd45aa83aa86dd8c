//! Backup restoration for Sitekeeper
//!
//! Unpacks an archive into a temp directory and swaps each registered
//! site's live directory for the unpacked copy, keeping a timestamped
//! safety copy of the pre-restore content beside it.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::config::paths::SitePaths;
use crate::config::registry::SiteRegistry;
use crate::error::{SiteError, SiteResult};

use super::manager::current_timestamp;
use super::tree::{copy_tree, move_tree};

/// Restores sites from backup archives
pub struct RestoreManager {
    backup_dir: PathBuf,
    registry: SiteRegistry,
}

impl RestoreManager {
    /// Create a new RestoreManager
    pub fn new(paths: &SitePaths, registry: SiteRegistry) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            registry,
        }
    }

    /// Restore sites from the archive with the given timestamp
    ///
    /// Sites whose name has no matching top-level folder in the archive are
    /// skipped and reported in the outcome. Before a live directory is
    /// replaced it is copied aside to `<dir>_pre-restore_<now>` as a
    /// data-loss guard.
    ///
    /// There is no multi-site atomicity: a failure after site A was swapped
    /// but before site B leaves the set in a mixed state. The extraction
    /// temp directory is removed regardless of per-site outcome.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no archive exists for the timestamp;
    /// live directories are untouched in that case.
    pub fn restore(&self, timestamp: &str) -> SiteResult<RestoreOutcome> {
        let archive_path = self
            .backup_dir
            .join(super::manager::archive_filename(timestamp));

        if !archive_path.is_file() {
            return Err(SiteError::backup_not_found(timestamp));
        }

        let temp_dir = self.backup_dir.join(format!(".restore_{}", current_timestamp()));
        fs::create_dir_all(&temp_dir)
            .map_err(|e| SiteError::Io(format!("Failed to create temp directory: {}", e)))?;

        let outcome = self.unpack_and_swap(&archive_path, &temp_dir, timestamp);

        // Scoped cleanup, regardless of per-site outcome
        let _ = fs::remove_dir_all(&temp_dir);

        outcome
    }

    fn unpack_and_swap(
        &self,
        archive_path: &Path,
        temp_dir: &Path,
        timestamp: &str,
    ) -> SiteResult<RestoreOutcome> {
        extract_archive(archive_path, temp_dir)?;

        let mut outcome = RestoreOutcome {
            timestamp: timestamp.to_string(),
            restored: Vec::new(),
            skipped: Vec::new(),
            safety_copies: Vec::new(),
        };

        for (name, root) in self.registry.iter() {
            let unpacked = temp_dir.join(name);
            if !unpacked.is_dir() {
                outcome.skipped.push(name.to_string());
                continue;
            }

            if root.exists() {
                let safety = sibling_safety_path(root)?;
                copy_tree(root, &safety, None)?;
                fs::remove_dir_all(root).map_err(|e| {
                    SiteError::Io(format!("Failed to remove {}: {}", root.display(), e))
                })?;
                outcome.safety_copies.push(safety);
            } else if let Some(parent) = root.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    SiteError::Io(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }

            move_tree(&unpacked, root)?;
            outcome.restored.push(name.to_string());
        }

        Ok(outcome)
    }
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreOutcome {
    /// Timestamp of the restored archive
    pub timestamp: String,
    /// Sites whose live directories were replaced
    pub restored: Vec<String>,
    /// Registered sites with no matching folder in the archive
    pub skipped: Vec<String>,
    /// Safety copies of the pre-restore live directories
    pub safety_copies: Vec<PathBuf>,
}

impl RestoreOutcome {
    /// Human-readable summary of what happened
    pub fn summary(&self) -> String {
        if self.skipped.is_empty() {
            format!("Restored {} from backup {}", self.restored.join(", "), self.timestamp)
        } else {
            format!(
                "Restored {} from backup {} (not in archive: {})",
                self.restored.join(", "),
                self.timestamp,
                self.skipped.join(", ")
            )
        }
    }
}

/// Build the timestamped sibling path the live directory is copied aside to
///
/// A second restore within the same second gets a numeric suffix so an
/// existing safety copy is never merged into.
fn sibling_safety_path(root: &Path) -> SiteResult<PathBuf> {
    let dir_name = root
        .file_name()
        .ok_or_else(|| SiteError::Io(format!("Site root has no name: {}", root.display())))?
        .to_string_lossy();
    let base_name = format!("{}_pre-restore_{}", dir_name, current_timestamp());
    let in_parent = |name: &str| match root.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    };

    let mut candidate = in_parent(&base_name);
    let mut counter = 1;
    while candidate.exists() {
        candidate = in_parent(&format!("{}-{}", base_name, counter));
        counter += 1;
    }

    Ok(candidate)
}

/// Extract a zip archive into a directory
///
/// Entries whose names would escape the destination are skipped.
fn extract_archive(archive_path: &Path, dest: &Path) -> SiteResult<()> {
    let file = File::open(archive_path)
        .map_err(|e| SiteError::Io(format!("Failed to open archive: {}", e)))?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(rel) = entry.enclosed_name().map(Path::to_path_buf) else {
            continue;
        };
        let outpath = dest.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)
                .map_err(|e| SiteError::Io(format!("Failed to create {}: {}", outpath.display(), e)))?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| SiteError::Io(format!("Failed to create {}: {}", parent.display(), e)))?;
            }
            let mut outfile = File::create(&outpath)
                .map_err(|e| SiteError::Io(format!("Failed to create {}: {}", outpath.display(), e)))?;
            io::copy(&mut entry, &mut outfile)
                .map_err(|e| SiteError::Io(format!("Failed to extract {}: {}", outpath.display(), e)))?;
        }
    }

    Ok(())
}
