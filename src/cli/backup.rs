//! Backup and restore CLI commands

use crate::backup::{BackupManager, Diagnostics, RestoreManager};
use crate::config::paths::SitePaths;
use crate::config::registry::SiteRegistry;
use crate::config::settings::Settings;
use crate::error::SiteResult;
use crate::runlog::RunLog;

/// Handle `backup [--sites ...]` and `backup --list`
pub fn handle_backup(
    paths: &SitePaths,
    registry: &SiteRegistry,
    settings: &Settings,
    log: &RunLog,
    sites: Option<Vec<String>>,
    list: bool,
) -> SiteResult<()> {
    let manager = BackupManager::new(paths, registry.clone(), settings.backup_retention);
    let mut diag = Diagnostics::new();

    if list {
        let archives = manager.list_archives(&mut diag)?;
        report_diagnostics(log, &diag);

        if archives.is_empty() {
            log.info("No backups found");
            return Ok(());
        }

        for archive in &archives {
            log.info(&format!(
                "  {} ({}) - {}",
                archive.timestamp.format("%Y-%m-%d %H:%M:%S"),
                format_size(archive.size_bytes),
                archive.filename,
            ));
        }
        log.info(&format!("Total: {} backup(s)", archives.len()));
        return Ok(());
    }

    log.info("Creating backup");
    let receipt = manager.create(sites.as_deref(), &mut diag)?;
    report_diagnostics(log, &diag);

    log.info(&format!(
        "Backup created: {} ({}, sites: {})",
        receipt.filename,
        format_size(receipt.size_bytes),
        receipt.sites.join(", "),
    ));
    log.info(&format!("Location: {}", receipt.path.display()));

    Ok(())
}

/// Handle `restore <timestamp>`
pub fn handle_restore(
    paths: &SitePaths,
    registry: &SiteRegistry,
    log: &RunLog,
    timestamp: &str,
) -> SiteResult<()> {
    log.info(&format!("Restoring from backup: {}", timestamp));

    let manager = RestoreManager::new(paths, registry.clone());
    let outcome = manager.restore(timestamp)?;

    log.info(&outcome.summary());
    for safety in &outcome.safety_copies {
        log.info(&format!("Pre-restore copy kept at: {}", safety.display()));
    }

    Ok(())
}

/// Surface best-effort skips as warnings instead of dropping them
fn report_diagnostics(log: &RunLog, diag: &Diagnostics) {
    for entry in diag.entries() {
        log.warn(entry);
    }
}

/// Format a file size in human-readable form
pub(crate) fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
