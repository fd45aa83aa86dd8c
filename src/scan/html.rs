//! Lightweight HTML extraction helpers
//!
//! The scanners only need link targets, image references and a rough
//! element count, so this uses attribute regexes rather than a full DOM.
//! Unreadable files are skipped by the callers.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::backup::ExclusionFilter;
use crate::error::{SiteError, SiteResult};

/// An `<img>` reference found in a page
#[derive(Debug, Clone)]
pub struct ImgTag {
    /// The `src` attribute
    pub src: String,
    /// The `alt` attribute, empty if absent
    pub alt: String,
}

/// Compiled extraction patterns, built once per scan
pub struct HtmlScanner {
    href_re: Regex,
    src_re: Regex,
    img_re: Regex,
    img_src_re: Regex,
    img_alt_re: Regex,
    tag_re: Regex,
}

impl HtmlScanner {
    /// Compile the extraction patterns
    pub fn new() -> SiteResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| SiteError::Config(format!("Bad scan pattern '{}': {}", pattern, e)))
        };

        Ok(Self {
            href_re: compile(r#"(?i)<(?:a|link)\b[^>]*?\bhref\s*=\s*["']([^"']+)["']"#)?,
            src_re: compile(r#"(?i)<(?:script|img)\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#)?,
            img_re: compile(r"(?i)<img\b[^>]*>")?,
            img_src_re: compile(r#"(?i)\bsrc\s*=\s*["']([^"']*)["']"#)?,
            img_alt_re: compile(r#"(?i)\balt\s*=\s*["']([^"']*)["']"#)?,
            tag_re: compile(r"(?i)<[a-z][a-z0-9-]*")?,
        })
    }

    /// Extract every link target (`a`/`link` href, `script`/`img` src),
    /// deduplicated
    pub fn extract_links(&self, html: &str) -> Vec<String> {
        let mut links = BTreeSet::new();

        for caps in self.href_re.captures_iter(html) {
            links.insert(caps[1].to_string());
        }
        for caps in self.src_re.captures_iter(html) {
            links.insert(caps[1].to_string());
        }

        links.into_iter().collect()
    }

    /// Extract every `<img>` tag with its src and alt attributes
    pub fn extract_images(&self, html: &str) -> Vec<ImgTag> {
        self.img_re
            .find_iter(html)
            .filter_map(|m| {
                let tag = m.as_str();
                let src = self.img_src_re.captures(tag)?[1].to_string();
                let alt = self
                    .img_alt_re
                    .captures(tag)
                    .map(|c| c[1].to_string())
                    .unwrap_or_default();
                Some(ImgTag { src, alt })
            })
            .collect()
    }

    /// Count opening tags as a DOM-size proxy
    pub fn count_elements(&self, html: &str) -> u64 {
        self.tag_re.find_iter(html).count() as u64
    }
}

/// Find all `*.html` files under a site root, skipping excluded directories
/// (VCS metadata, run output, caches)
pub fn html_files(root: &Path) -> Vec<PathBuf> {
    let filter = ExclusionFilter::default();

    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !filter.is_excluded_name(e.file_name()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("html"))
        })
        .map(|e| e.into_path())
        .collect()
}
