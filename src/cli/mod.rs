//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the library components.

pub mod backup;
pub mod report;
pub mod scan;
pub mod sync;

pub use backup::{handle_backup, handle_restore};
pub use report::handle_report;
pub use scan::{handle_audit, handle_analyze_performance, handle_check_images, handle_check_links};
pub use sync::{handle_sync, RemoteOverrides};
