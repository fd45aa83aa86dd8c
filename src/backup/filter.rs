//! Exclusion filter applied while staging site trees
//!
//! Skips version-control metadata, prior logs, prior backups, reports and
//! cache directories so an archive never swallows the output of earlier
//! runs. Patterns match individual path component names.

use std::ffi::OsStr;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{SiteError, SiteResult};

/// Component names excluded from every backup
const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "logs",
    "backups",
    "reports",
    ".cache",
    "__pycache__",
    "node_modules",
    ".DS_Store",
    "*.pyc",
];

/// Matches path components that must not be copied into a backup
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    set: GlobSet,
}

impl ExclusionFilter {
    /// Build a filter from custom glob patterns
    pub fn with_patterns(patterns: &[&str]) -> SiteResult<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| SiteError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e)))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| SiteError::Config(format!("Failed to build exclude set: {}", e)))?;
        Ok(Self { set })
    }

    /// Whether a single file or directory name is excluded
    pub fn is_excluded_name(&self, name: &OsStr) -> bool {
        self.set.is_match(Path::new(name))
    }

    /// Whether any component of a relative path is excluded
    pub fn is_excluded_path(&self, path: &Path) -> bool {
        path.components()
            .any(|c| self.is_excluded_name(c.as_os_str()))
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        // The defaults are static and known-valid
        Self::with_patterns(DEFAULT_EXCLUDES).unwrap_or_else(|_| Self {
            set: GlobSet::empty(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_excludes_vcs_and_run_output() {
        let filter = ExclusionFilter::default();
        for name in [".git", ".svn", "logs", "backups", "reports", "__pycache__"] {
            assert!(filter.is_excluded_name(OsStr::new(name)), "{} should be excluded", name);
        }
    }

    #[test]
    fn test_site_content_not_excluded() {
        let filter = ExclusionFilter::default();
        for name in ["index.html", "style.css", "app.js", "images"] {
            assert!(!filter.is_excluded_name(OsStr::new(name)), "{} should be kept", name);
        }
    }

    #[test]
    fn test_path_components() {
        let filter = ExclusionFilter::default();
        assert!(filter.is_excluded_path(&PathBuf::from("assets/.git/config")));
        assert!(!filter.is_excluded_path(&PathBuf::from("assets/img/logo.png")));
    }

    #[test]
    fn test_glob_patterns() {
        let filter = ExclusionFilter::default();
        assert!(filter.is_excluded_name(OsStr::new("module.pyc")));
        assert!(!filter.is_excluded_name(OsStr::new("module.py")));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = ExclusionFilter::with_patterns(&["["]).unwrap_err();
        assert!(err.is_config());
    }
}
