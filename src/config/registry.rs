//! Site registry for Sitekeeper
//!
//! Maps site names to their root directories. Every name referenced by a
//! backup, restore or scan operation must exist here; an unknown name is a
//! configuration error reported to the caller, never silently skipped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::paths::SitePaths;
use crate::config::settings::Settings;
use crate::error::{SiteError, SiteResult};

/// Read-only mapping of site names to filesystem roots
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: BTreeMap<String, PathBuf>,
}

impl SiteRegistry {
    /// Build a registry from settings, resolving relative roots against
    /// the base directory
    pub fn from_settings(paths: &SitePaths, settings: &Settings) -> Self {
        let sites = settings
            .sites
            .iter()
            .map(|(name, root)| {
                let resolved = if root.is_absolute() {
                    root.clone()
                } else {
                    paths.base_dir().join(root)
                };
                (name.clone(), resolved)
            })
            .collect();

        Self { sites }
    }

    /// Build a registry directly from name/root pairs (useful for testing)
    pub fn from_entries(entries: impl IntoIterator<Item = (String, PathBuf)>) -> Self {
        Self {
            sites: entries.into_iter().collect(),
        }
    }

    /// Resolve a site name to its root directory
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the name is not registered.
    pub fn resolve(&self, name: &str) -> SiteResult<&Path> {
        self.sites
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| SiteError::unknown_site(name))
    }

    /// All registered site names, in sorted order
    pub fn names(&self) -> Vec<String> {
        self.sites.keys().cloned().collect()
    }

    /// Iterate over (name, root) pairs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.sites.iter().map(|(n, p)| (n.as_str(), p.as_path()))
    }

    /// Number of registered sites
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether the registry has no sites
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
