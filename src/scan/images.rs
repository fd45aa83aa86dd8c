//! Image validation
//!
//! Finds every `<img>` across a site's HTML and checks that local images
//! exist and carry alt text. External URLs and data URIs are noted but not
//! fetched.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::config::registry::SiteRegistry;
use crate::error::SiteResult;

use super::html::{html_files, HtmlScanner};

/// Validation status of one image reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    /// Local file exists and has alt text
    Valid,
    /// Local file is absent
    Missing,
    /// Local file exists but the alt attribute is empty
    NoAlt,
    /// `http(s)` image, not fetched
    External,
    /// Inline data URI
    DataUri,
}

/// One validated image reference
#[derive(Debug, Clone, Serialize)]
pub struct ImageRecord {
    /// The `src` attribute as written
    pub src: String,
    /// The `alt` attribute
    pub alt: String,
    /// HTML file the reference was found in, relative to the site root
    pub file: String,
    /// Validation result
    pub status: ImageStatus,
    /// File size in bytes for valid local images
    pub size_bytes: Option<u64>,
}

/// Validation results for one site
#[derive(Debug, Serialize)]
pub struct ImageReport {
    /// Site name
    pub site: String,
    /// Total image references found
    pub total: usize,
    /// Valid local images, plus external/data-URI references
    pub valid: Vec<ImageRecord>,
    /// References to absent local files
    pub missing: Vec<ImageRecord>,
    /// Local images without alt text
    pub no_alt: Vec<ImageRecord>,
}

/// Validates image references across site trees
pub struct ImageValidator {
    registry: SiteRegistry,
}

impl ImageValidator {
    /// Create a new ImageValidator
    pub fn new(registry: SiteRegistry) -> Self {
        Self { registry }
    }

    /// Validate all images referenced by one site
    pub fn validate(&self, site: &str) -> SiteResult<ImageReport> {
        let root = self.registry.resolve(site)?.to_path_buf();
        let scanner = HtmlScanner::new()?;

        let mut report = ImageReport {
            site: site.to_string(),
            total: 0,
            valid: Vec::new(),
            missing: Vec::new(),
            no_alt: Vec::new(),
        };

        for file in html_files(&root) {
            let Ok(html) = fs::read_to_string(&file) else {
                continue;
            };
            let rel_file = file
                .strip_prefix(&root)
                .unwrap_or(&file)
                .to_string_lossy()
                .to_string();

            for img in scanner.extract_images(&html) {
                report.total += 1;
                let record = validate_image(&root, &rel_file, img.src, img.alt);
                match record.status {
                    ImageStatus::Missing => report.missing.push(record),
                    ImageStatus::NoAlt => report.no_alt.push(record),
                    _ => report.valid.push(record),
                }
            }
        }

        Ok(report)
    }
}

fn validate_image(root: &Path, file: &str, src: String, alt: String) -> ImageRecord {
    if src.starts_with("http://") || src.starts_with("https://") {
        return ImageRecord {
            src,
            alt,
            file: file.to_string(),
            status: ImageStatus::External,
            size_bytes: None,
        };
    }

    if src.starts_with("data:") {
        return ImageRecord {
            src,
            alt,
            file: file.to_string(),
            status: ImageStatus::DataUri,
            size_bytes: None,
        };
    }

    let local = root.join(src.trim_start_matches('/'));
    if !local.exists() {
        return ImageRecord {
            src,
            alt,
            file: file.to_string(),
            status: ImageStatus::Missing,
            size_bytes: None,
        };
    }

    if alt.trim().is_empty() {
        return ImageRecord {
            src,
            alt,
            file: file.to_string(),
            status: ImageStatus::NoAlt,
            size_bytes: None,
        };
    }

    let size_bytes = fs::metadata(&local).map(|m| m.len()).ok();
    ImageRecord {
        src,
        alt,
        file: file.to_string(),
        status: ImageStatus::Valid,
        size_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn make_validator(temp: &TempDir) -> (ImageValidator, PathBuf) {
        let root = temp.path().join("site");
        let registry = SiteRegistry::from_entries([("site".to_string(), root.clone())]);
        (ImageValidator::new(registry), root)
    }

    #[test]
    fn test_validate_buckets() {
        let temp = TempDir::new().unwrap();
        let (validator, root) = make_validator(&temp);

        write(
            &root.join("index.html"),
            r#"<img src="img/logo.png" alt="Logo">
               <img src="img/gone.png" alt="Gone">
               <img src="img/banner.jpg" alt="">
               <img src="https://cdn.example.com/x.png" alt="cdn">
               <img src="data:image/png;base64,AAAA" alt="inline">"#,
        );
        write(&root.join("img/logo.png"), "png-bytes");
        write(&root.join("img/banner.jpg"), "jpg-bytes");

        let report = validator.validate("site").unwrap();

        assert_eq!(report.total, 5);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].src, "img/gone.png");
        assert_eq!(report.no_alt.len(), 1);
        assert_eq!(report.no_alt[0].src, "img/banner.jpg");
        // Valid local + external + data URI
        assert_eq!(report.valid.len(), 3);
    }

    #[test]
    fn test_valid_image_carries_size() {
        let temp = TempDir::new().unwrap();
        let (validator, root) = make_validator(&temp);

        write(&root.join("index.html"), r#"<img src="logo.png" alt="Logo">"#);
        write(&root.join("logo.png"), "12345678");

        let report = validator.validate("site").unwrap();
        assert_eq!(report.valid[0].size_bytes, Some(8));
    }

    #[test]
    fn test_record_tracks_source_file() {
        let temp = TempDir::new().unwrap();
        let (validator, root) = make_validator(&temp);

        write(&root.join("blog/post.html"), r#"<img src="/gone.png" alt="x">"#);

        let report = validator.validate("site").unwrap();
        assert_eq!(report.missing[0].file, "blog/post.html");
    }
}
