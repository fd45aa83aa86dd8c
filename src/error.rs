//! Custom error types for Sitekeeper
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Public operations return `SiteResult`
//! rather than panicking; callers branch on the result.

use thiserror::Error;

/// The main error type for Sitekeeper operations
#[derive(Error, Debug)]
pub enum SiteError {
    /// Configuration-related errors (unknown site name, bad settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Zip archive read/write errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// HTTP errors while checking external links
    #[error("HTTP error: {0}")]
    Http(String),

    /// Entity not found errors (e.g. a backup timestamp with no archive)
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl SiteError {
    /// Create a "not found" error for backup archives
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Create a configuration error for an unregistered site name
    pub fn unknown_site(name: impl AsRef<str>) -> Self {
        Self::Config(format!("unknown site '{}'", name.as_ref()))
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SiteError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<zip::result::ZipError> for SiteError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

impl From<walkdir::Error> for SiteError {
    fn from(err: walkdir::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for Sitekeeper operations
pub type SiteResult<T> = Result<T, SiteError>;
