//! Performance heuristics from file inventories
//!
//! Nothing here loads a browser: load time is estimated from total asset
//! weight and request count, DOM size from a tag count. The thresholds that
//! trigger recommendations come from settings.

use std::fs;
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use crate::backup::ExclusionFilter;
use crate::config::registry::SiteRegistry;
use crate::config::settings::Settings;
use crate::error::SiteResult;

use super::html::{html_files, HtmlScanner};

const MIB: f64 = 1024.0 * 1024.0;

/// Estimated transfer cost: ~500ms per MiB (a 2 Mbps connection)
const MS_PER_MIB: f64 = 500.0;
/// Per-request overhead in milliseconds
const MS_PER_REQUEST: u64 = 50;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// Severity of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
}

/// A single performance recommendation
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    /// How urgent the finding is
    pub severity: Severity,
    /// Human-readable advice
    pub message: String,
}

/// Performance metrics for one site
#[derive(Debug, Serialize)]
pub struct PerformanceMetrics {
    /// Site name
    pub site: String,
    pub html_count: u64,
    pub css_count: u64,
    pub js_count: u64,
    pub image_count: u64,
    pub html_mib: f64,
    pub css_mib: f64,
    pub js_mib: f64,
    pub image_mib: f64,
    /// Combined asset weight in MiB
    pub total_mib: f64,
    /// Estimated DOM element count across all pages
    pub dom_count: u64,
    /// Estimated load time in milliseconds
    pub load_time_ms: u64,
    /// Findings derived from the thresholds
    pub recommendations: Vec<Recommendation>,
}

/// Analyzes site file inventories for performance estimates
pub struct PerformanceMonitor {
    registry: SiteRegistry,
    load_time_warning_ms: u64,
    dom_count_warning: u64,
    image_size_warning_mib: f64,
}

impl PerformanceMonitor {
    /// Create a new PerformanceMonitor with thresholds from settings
    pub fn new(registry: SiteRegistry, settings: &Settings) -> Self {
        Self {
            registry,
            load_time_warning_ms: settings.load_time_warning_ms,
            dom_count_warning: settings.dom_count_warning,
            image_size_warning_mib: settings.image_size_warning_mib,
        }
    }

    /// Analyze one site
    pub fn analyze(&self, site: &str) -> SiteResult<PerformanceMetrics> {
        let root = self.registry.resolve(site)?.to_path_buf();

        let mut metrics = PerformanceMetrics {
            site: site.to_string(),
            html_count: 0,
            css_count: 0,
            js_count: 0,
            image_count: 0,
            html_mib: 0.0,
            css_mib: 0.0,
            js_mib: 0.0,
            image_mib: 0.0,
            total_mib: 0.0,
            dom_count: 0,
            load_time_ms: 0,
            recommendations: Vec::new(),
        };

        self.inventory(&root, &mut metrics);

        metrics.total_mib =
            metrics.html_mib + metrics.css_mib + metrics.js_mib + metrics.image_mib;
        metrics.dom_count = count_dom_elements(&root)?;
        metrics.load_time_ms = estimate_load_time(&metrics);
        metrics.recommendations = self.recommendations(&metrics);

        Ok(metrics)
    }

    /// Count and weigh files by type, skipping excluded directories
    fn inventory(&self, root: &Path, metrics: &mut PerformanceMetrics) {
        let filter = ExclusionFilter::default();

        let entries = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| !filter.is_excluded_name(e.file_name()))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file());

        for entry in entries {
            let Some(ext) = entry.path().extension().map(|e| e.to_ascii_lowercase()) else {
                continue;
            };
            let size_mib = fs::metadata(entry.path()).map(|m| m.len()).unwrap_or(0) as f64 / MIB;

            if ext == "html" {
                metrics.html_count += 1;
                metrics.html_mib += size_mib;
            } else if ext == "css" {
                metrics.css_count += 1;
                metrics.css_mib += size_mib;
            } else if ext == "js" {
                metrics.js_count += 1;
                metrics.js_mib += size_mib;
            } else if IMAGE_EXTENSIONS.iter().any(|i| ext == *i) {
                metrics.image_count += 1;
                metrics.image_mib += size_mib;
            }
        }
    }

    fn recommendations(&self, metrics: &PerformanceMetrics) -> Vec<Recommendation> {
        let mut recs = Vec::new();

        if metrics.load_time_ms > self.load_time_warning_ms {
            recs.push(Recommendation {
                severity: Severity::Warning,
                message: format!(
                    "Slow load time ({}ms). Consider optimizing images and minifying CSS/JS.",
                    metrics.load_time_ms
                ),
            });
        }

        if metrics.image_mib > self.image_size_warning_mib {
            recs.push(Recommendation {
                severity: Severity::Warning,
                message: format!(
                    "Large images ({:.2}MiB). Use WebP or compress images.",
                    metrics.image_mib
                ),
            });
        }

        if metrics.dom_count > self.dom_count_warning {
            recs.push(Recommendation {
                severity: Severity::Warning,
                message: format!(
                    "High DOM complexity ({} elements). Simplify HTML structure.",
                    metrics.dom_count
                ),
            });
        }

        if metrics.css_count > 5 {
            recs.push(Recommendation {
                severity: Severity::Info,
                message: format!(
                    "Multiple CSS files ({}). Consider consolidating.",
                    metrics.css_count
                ),
            });
        }

        if metrics.js_count > 5 {
            recs.push(Recommendation {
                severity: Severity::Info,
                message: format!(
                    "Multiple JS files ({}). Consider bundling.",
                    metrics.js_count
                ),
            });
        }

        if recs.is_empty() {
            recs.push(Recommendation {
                severity: Severity::Success,
                message: "Performance looks good!".to_string(),
            });
        }

        recs
    }
}

/// Estimated load time from asset weight and request count
fn estimate_load_time(metrics: &PerformanceMetrics) -> u64 {
    let transfer = (metrics.total_mib * MS_PER_MIB) as u64;
    let requests =
        metrics.html_count + metrics.css_count + metrics.js_count + metrics.image_count;
    transfer + requests * MS_PER_REQUEST
}

/// Tag-count estimate of DOM elements across all pages
fn count_dom_elements(root: &Path) -> SiteResult<u64> {
    let scanner = HtmlScanner::new()?;
    let mut total = 0;

    for file in html_files(root) {
        if let Ok(html) = fs::read_to_string(&file) {
            total += scanner.count_elements(&html);
        }
    }

    Ok(total)
}
