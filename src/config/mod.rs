//! Configuration module for Sitekeeper
//!
//! This module provides configuration management including:
//! - Base/backup/log/report path resolution
//! - Persisted user settings (sites, retention, scan thresholds)
//! - The read-only site registry used by every operation

pub mod paths;
pub mod registry;
pub mod settings;

pub use paths::SitePaths;
pub use registry::SiteRegistry;
pub use settings::{RemoteSettings, Settings};
