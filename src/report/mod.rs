//! HTML and JSON report generation
//!
//! Renders an audit into a standalone HTML page (inline CSS, one section
//! per site) plus a JSON dump for machine consumption, both written into
//! the reports directory with a shared timestamp.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use chrono::Local;

use crate::config::paths::SitePaths;
use crate::error::{SiteError, SiteResult};
use crate::scan::audit::{AuditReport, SiteAudit};

/// Files produced by one report run
#[derive(Debug)]
pub struct ReportPaths {
    /// The rendered HTML page
    pub html: PathBuf,
    /// The raw audit as JSON
    pub json: PathBuf,
}

/// Writes audit reports into the reports directory
pub struct ReportGenerator {
    report_dir: PathBuf,
}

impl ReportGenerator {
    /// Create a new ReportGenerator
    pub fn new(paths: &SitePaths) -> Self {
        Self {
            report_dir: paths.report_dir(),
        }
    }

    /// Render the audit to HTML and JSON
    pub fn generate(&self, audit: &AuditReport) -> SiteResult<ReportPaths> {
        fs::create_dir_all(&self.report_dir)
            .map_err(|e| SiteError::Io(format!("Failed to create report directory: {}", e)))?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let html_path = self.report_dir.join(format!("report_{}.html", stamp));
        let json_path = self.report_dir.join(format!("report_{}.json", stamp));

        let json = serde_json::to_string_pretty(audit)
            .map_err(|e| SiteError::Json(format!("Failed to serialize audit: {}", e)))?;
        fs::write(&json_path, json)
            .map_err(|e| SiteError::Io(format!("Failed to write JSON report: {}", e)))?;

        fs::write(&html_path, render_html(audit))
            .map_err(|e| SiteError::Io(format!("Failed to write HTML report: {}", e)))?;

        Ok(ReportPaths {
            html: html_path,
            json: json_path,
        })
    }
}

fn render_html(audit: &AuditReport) -> String {
    let mut body = String::new();

    for (name, site) in &audit.sites {
        // String formatting into a String cannot fail
        let _ = write!(body, "{}", render_site(name, site));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Sitekeeper Audit Report</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; background: #f5f5f5; }}
        .header {{ background: #2c3e50; color: white; padding: 20px; border-radius: 5px; }}
        .site {{ background: white; margin: 20px 0; padding: 20px; border-radius: 5px; border-left: 4px solid #3498db; }}
        .metrics {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; }}
        .metric {{ background: #ecf0f1; padding: 15px; border-radius: 5px; }}
        .metric-value {{ font-size: 24px; font-weight: bold; color: #2c3e50; }}
        .metric-label {{ color: #7f8c8d; font-size: 12px; }}
        .warning {{ color: #e74c3c; }}
        .success {{ color: #27ae60; }}
        ul.issues {{ color: #e74c3c; }}
    </style>
</head>
<body>
    <div class="header">
        <h1>Sitekeeper Audit Report</h1>
        <p>Generated: {generated}</p>
    </div>
{body}
    <footer style="text-align: center; color: #7f8c8d; margin-top: 40px;">
        <p>Sitekeeper Automation Suite</p>
    </footer>
</body>
</html>
"#,
        generated = escape(&audit.timestamp),
        body = body,
    )
}

fn render_site(name: &str, site: &SiteAudit) -> String {
    let mut section = format!(
        r#"    <div class="site">
        <h2>{name}</h2>
        <div class="metrics">
            <div class="metric"><div class="metric-value">{links}</div><div class="metric-label">Links checked</div></div>
            <div class="metric"><div class="metric-value">{broken}</div><div class="metric-label">Broken links</div></div>
            <div class="metric"><div class="metric-value">{images}</div><div class="metric-label">Images checked</div></div>
            <div class="metric"><div class="metric-value">{missing}</div><div class="metric-label">Missing images</div></div>
            <div class="metric"><div class="metric-value">{load}ms</div><div class="metric-label">Estimated load time</div></div>
            <div class="metric"><div class="metric-value">{size:.2}MiB</div><div class="metric-label">Total size</div></div>
        </div>
"#,
        name = escape(name),
        links = site.links.total,
        broken = site.links.broken.len(),
        images = site.images.total,
        missing = site.images.missing.len(),
        load = site.performance.load_time_ms,
        size = site.performance.total_mib,
    );

    if !site.links.broken.is_empty() {
        section.push_str("        <h3>Broken links</h3>\n        <ul class=\"issues\">\n");
        for link in &site.links.broken {
            let _ = writeln!(section, "            <li>{}</li>", escape(&link.url));
        }
        section.push_str("        </ul>\n");
    }

    if !site.images.missing.is_empty() {
        section.push_str("        <h3>Missing images</h3>\n        <ul class=\"issues\">\n");
        for img in &site.images.missing {
            let _ = writeln!(
                section,
                "            <li>{} (in {})</li>",
                escape(&img.src),
                escape(&img.file)
            );
        }
        section.push_str("        </ul>\n");
    }

    section.push_str("        <h3>Recommendations</h3>\n        <ul>\n");
    for rec in &site.performance.recommendations {
        let _ = writeln!(section, "            <li>{}</li>", escape(&rec.message));
    }
    section.push_str("        </ul>\n    </div>\n");

    section
}

/// Minimal HTML escaping for text nodes
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
