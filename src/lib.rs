//! Sitekeeper - Website maintenance automation suite
//!
//! This library provides the core functionality for the Sitekeeper CLI:
//! scanning static site trees for broken links and image problems,
//! estimating page performance from file inventories, and managing
//! timestamped zip backups with restore.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, persisted settings and the site registry
//! - `error`: Custom error types
//! - `backup`: Zip backup creation, retention and restore
//! - `scan`: Link, image and performance scanners plus the full audit
//! - `sync`: Remote sync placeholder (change detection and logging)
//! - `report`: HTML/JSON report generation
//! - `runlog`: Per-run log file
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use sitekeeper::config::{SitePaths, SiteRegistry, Settings};
//!
//! let paths = SitePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let registry = SiteRegistry::from_settings(&paths, &settings);
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod runlog;
pub mod scan;
pub mod sync;

pub use error::SiteError;
