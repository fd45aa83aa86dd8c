//! Link integrity scanning
//!
//! Extracts every link target from a site's HTML and classifies it.
//! Internal targets are resolved against the site root and are broken when
//! the file is absent; external URLs get a HEAD request when external
//! checking is enabled, otherwise they are tallied unchecked.

use std::fs;
use std::time::Duration;

use serde::Serialize;

use crate::config::registry::SiteRegistry;
use crate::config::settings::Settings;
use crate::error::{SiteError, SiteResult};

use super::html::{html_files, HtmlScanner};

const USER_AGENT: &str = "Sitekeeper/1.0";

/// How a link was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Fragment anchor (`#...`), always fine
    Anchor,
    /// `javascript:` pseudo-link, not checked
    Javascript,
    /// Absolute `http(s)` URL
    External,
    /// Path resolved against the site root
    Internal,
}

/// One checked link
#[derive(Debug, Clone, Serialize)]
pub struct LinkRecord {
    /// The raw link target as written in the HTML
    pub url: String,
    /// Classification
    pub kind: LinkKind,
    /// HTTP status for checked external links
    pub status: Option<u16>,
    /// Whether the target resolved (file exists / status < 400);
    /// unchecked external links count as ok
    pub ok: bool,
}

/// Scan results for one site
#[derive(Debug, Serialize)]
pub struct LinkReport {
    /// Site name
    pub site: String,
    /// Total distinct link targets found
    pub total: usize,
    /// Internal links whose files exist, plus anchors and javascript links
    pub valid: Vec<LinkRecord>,
    /// Internal links whose files are missing, and failed external checks
    pub broken: Vec<LinkRecord>,
    /// External links (checked or not)
    pub external: Vec<LinkRecord>,
}

/// Scans site trees for broken links
pub struct LinkChecker {
    registry: SiteRegistry,
    include_external: bool,
    client: reqwest::blocking::Client,
}

impl LinkChecker {
    /// Create a new LinkChecker
    pub fn new(registry: SiteRegistry, settings: &Settings) -> SiteResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.link_timeout_secs))
            .build()
            .map_err(|e| SiteError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            registry,
            include_external: settings.include_external_links,
            client,
        })
    }

    /// Scan one site for broken links
    pub fn scan(&self, site: &str) -> SiteResult<LinkReport> {
        let root = self.registry.resolve(site)?.to_path_buf();
        let scanner = HtmlScanner::new()?;

        let mut targets = std::collections::BTreeSet::new();
        for file in html_files(&root) {
            // Unreadable files are skipped, matching the scan's best-effort nature
            let Ok(html) = fs::read_to_string(&file) else {
                continue;
            };
            targets.extend(scanner.extract_links(&html));
        }

        let mut report = LinkReport {
            site: site.to_string(),
            total: targets.len(),
            valid: Vec::new(),
            broken: Vec::new(),
            external: Vec::new(),
        };

        for url in targets {
            let record = self.check_target(&root, url);
            match record.kind {
                LinkKind::External => report.external.push(record),
                _ if record.ok => report.valid.push(record),
                _ => report.broken.push(record),
            }
        }

        Ok(report)
    }

    fn check_target(&self, root: &std::path::Path, url: String) -> LinkRecord {
        if url.starts_with('#') {
            return LinkRecord {
                url,
                kind: LinkKind::Anchor,
                status: None,
                ok: true,
            };
        }

        if url.starts_with("javascript:") {
            return LinkRecord {
                url,
                kind: LinkKind::Javascript,
                status: None,
                ok: true,
            };
        }

        if url.starts_with("http://") || url.starts_with("https://") {
            if !self.include_external {
                return LinkRecord {
                    url,
                    kind: LinkKind::External,
                    status: None,
                    ok: true,
                };
            }
            return match self.client.head(&url).send() {
                Ok(response) => {
                    let status = response.status().as_u16();
                    LinkRecord {
                        url,
                        kind: LinkKind::External,
                        status: Some(status),
                        ok: status < 400,
                    }
                }
                Err(_) => LinkRecord {
                    url,
                    kind: LinkKind::External,
                    status: None,
                    ok: false,
                },
            };
        }

        // Internal: strip query/fragment, resolve against the site root
        let path_part = url
            .split(['?', '#'])
            .next()
            .unwrap_or("")
            .trim_start_matches('/');
        // A bare "/" resolves to the site root itself
        let exists = if path_part.is_empty() {
            root.is_dir()
        } else {
            root.join(path_part).exists()
        };

        LinkRecord {
            url,
            kind: LinkKind::Internal,
            status: None,
            ok: exists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn make_checker(temp: &TempDir) -> (LinkChecker, PathBuf) {
        let root = temp.path().join("site");
        let registry = SiteRegistry::from_entries([("site".to_string(), root.clone())]);
        let checker = LinkChecker::new(registry, &Settings::default()).unwrap();
        (checker, root)
    }

    #[test]
    fn test_scan_classifies_links() {
        let temp = TempDir::new().unwrap();
        let (checker, root) = make_checker(&temp);

        write(
            &root.join("index.html"),
            r##"<a href="about.html">ok</a>
               <a href="/missing.html">broken</a>
               <a href="#top">anchor</a>
               <a href="https://example.com/">ext</a>
               <a href="javascript:void(0)">js</a>"##,
        );
        write(&root.join("about.html"), "<html></html>");

        let report = checker.scan("site").unwrap();

        assert_eq!(report.total, 5);
        assert_eq!(report.broken.len(), 1);
        assert_eq!(report.broken[0].url, "/missing.html");
        assert_eq!(report.external.len(), 1);
        // about.html itself, the anchor and the javascript link
        assert_eq!(report.valid.len(), 3);
    }

    #[test]
    fn test_external_links_unchecked_by_default() {
        let temp = TempDir::new().unwrap();
        let (checker, root) = make_checker(&temp);

        write(
            &root.join("index.html"),
            r#"<a href="https://definitely-not-reachable.invalid/">x</a>"#,
        );

        let report = checker.scan("site").unwrap();
        assert_eq!(report.external.len(), 1);
        assert_eq!(report.external[0].status, None);
        assert!(report.external[0].ok);
    }

    #[test]
    fn test_root_relative_links() {
        let temp = TempDir::new().unwrap();
        let (checker, root) = make_checker(&temp);

        write(&root.join("index.html"), r#"<a href="/blog/post.html">p</a>"#);
        write(&root.join("blog/post.html"), "<html></html>");

        let report = checker.scan("site").unwrap();
        assert!(report.broken.is_empty());
        assert_eq!(report.valid.len(), 1);
    }

    #[test]
    fn test_bare_root_link_is_valid() {
        let temp = TempDir::new().unwrap();
        let (checker, root) = make_checker(&temp);

        write(&root.join("index.html"), r#"<a href="/">home</a>"#);

        let report = checker.scan("site").unwrap();
        assert!(report.broken.is_empty());
        assert_eq!(report.valid.len(), 1);
        assert_eq!(report.valid[0].url, "/");
    }

    #[test]
    fn test_query_strings_ignored_when_resolving() {
        let temp = TempDir::new().unwrap();
        let (checker, root) = make_checker(&temp);

        write(&root.join("index.html"), r#"<a href="about.html?ref=nav">a</a>"#);
        write(&root.join("about.html"), "<html></html>");

        let report = checker.scan("site").unwrap();
        assert!(report.broken.is_empty());
    }

    #[test]
    fn test_unknown_site_is_config_error() {
        let temp = TempDir::new().unwrap();
        let (checker, _root) = make_checker(&temp);
        assert!(checker.scan("other").unwrap_err().is_config());
    }
}
