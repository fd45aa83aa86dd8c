//! Backup system for Sitekeeper
//!
//! Creates, lists, prunes and restores timestamped zip backups of the
//! registered site trees.
//!
//! # Architecture
//!
//! - `BackupManager`: stages site trees, compresses them into one archive
//!   and enforces the retention count
//! - `RestoreManager`: unpacks an archive and swaps live site directories,
//!   keeping a safety copy of the pre-restore content
//! - `ExclusionFilter`: keeps VCS metadata, prior logs/backups/reports and
//!   caches out of archives
//! - `Diagnostics`: makes best-effort suppressed errors observable
//!
//! # Archive Format
//!
//! `backup_<YYYY-MM-DD_HH-MM-SS>.zip` in the backup directory; the archive
//! interior holds one top-level folder per site name containing that site's
//! files at backup time. The archive file only exists at its final path
//! once compression has succeeded.
//!
//! # Example
//!
//! ```rust,ignore
//! use sitekeeper::backup::{BackupManager, Diagnostics, RestoreManager};
//!
//! let mut diag = Diagnostics::new();
//! let manager = BackupManager::new(&paths, registry.clone(), 10);
//! let receipt = manager.create(None, &mut diag)?;
//!
//! // Later, roll the sites back
//! let restore = RestoreManager::new(&paths, registry);
//! let outcome = restore.restore(&receipt.timestamp)?;
//! println!("{}", outcome.summary());
//! ```

mod diagnostics;
mod filter;
mod manager;
mod restore;
mod tree;

pub use diagnostics::Diagnostics;
pub use filter::ExclusionFilter;
pub use manager::{
    archive_filename, current_timestamp, parse_timestamp, BackupInfo, BackupManager,
    BackupReceipt, ARCHIVE_PREFIX,
};
pub use restore::{RestoreManager, RestoreOutcome};
