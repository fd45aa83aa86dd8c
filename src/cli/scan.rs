//! Scan CLI commands: links, images, performance and the full audit

use crate::config::registry::SiteRegistry;
use crate::config::settings::Settings;
use crate::error::SiteResult;
use crate::runlog::RunLog;
use crate::scan::audit::{run_audit, AuditReport};
use crate::scan::images::ImageValidator;
use crate::scan::links::LinkChecker;
use crate::scan::performance::{PerformanceMonitor, Severity};

fn site_list(registry: &SiteRegistry, sites: Option<Vec<String>>) -> Vec<String> {
    sites.unwrap_or_else(|| registry.names())
}

/// Handle `check-links [--sites ...] [--include-external]`
pub fn handle_check_links(
    registry: &SiteRegistry,
    settings: &Settings,
    log: &RunLog,
    sites: Option<Vec<String>>,
    include_external: bool,
) -> SiteResult<()> {
    log.info("Starting link integrity scan");

    let mut effective = settings.clone();
    effective.include_external_links = effective.include_external_links || include_external;
    let checker = LinkChecker::new(registry.clone(), &effective)?;

    for site in site_list(registry, sites) {
        log.info(&format!("Scanning {} for broken links...", site));
        let report = checker.scan(&site)?;

        if report.broken.is_empty() {
            log.info(&format!("All links valid in {}", site));
        } else {
            log.warn(&format!(
                "Found {} broken links in {}",
                report.broken.len(),
                site
            ));
            for link in &report.broken {
                log.warn(&format!("   - {}", link.url));
            }
        }

        log.info(&format!(
            "  Valid: {}, Broken: {}, External: {}",
            report.valid.len(),
            report.broken.len(),
            report.external.len()
        ));
    }

    Ok(())
}

/// Handle `check-images [--sites ...]`
pub fn handle_check_images(
    registry: &SiteRegistry,
    log: &RunLog,
    sites: Option<Vec<String>>,
) -> SiteResult<()> {
    log.info("Starting image validation scan");
    let validator = ImageValidator::new(registry.clone());

    for site in site_list(registry, sites) {
        log.info(&format!("Validating images in {}...", site));
        let report = validator.validate(&site)?;

        if !report.missing.is_empty() {
            log.warn(&format!(
                "Found {} missing images in {}",
                report.missing.len(),
                site
            ));
            for img in &report.missing {
                log.warn(&format!("   - {} (in {})", img.src, img.file));
            }
        }
        if !report.no_alt.is_empty() {
            log.warn(&format!(
                "Found {} images without alt text in {}",
                report.no_alt.len(),
                site
            ));
        }

        log.info(&format!(
            "  Valid: {}, Missing: {}, No alt: {}",
            report.valid.len(),
            report.missing.len(),
            report.no_alt.len()
        ));
    }

    Ok(())
}

/// Handle `analyze-performance [--sites ...]`
pub fn handle_analyze_performance(
    registry: &SiteRegistry,
    settings: &Settings,
    log: &RunLog,
    sites: Option<Vec<String>>,
) -> SiteResult<()> {
    log.info("Starting performance analysis");
    let monitor = PerformanceMonitor::new(registry.clone(), settings);

    for site in site_list(registry, sites) {
        log.info(&format!("Analyzing performance for {}...", site));
        let metrics = monitor.analyze(&site)?;

        let status = if metrics.load_time_ms < 2000 {
            "GOOD"
        } else if metrics.load_time_ms < settings.load_time_warning_ms {
            "OK"
        } else {
            "SLOW"
        };

        log.info(&format!(
            "  [{}] Load time: {}ms",
            status, metrics.load_time_ms
        ));
        log.info(&format!(
            "  Files: HTML({}) CSS({}) JS({}) IMG({})",
            metrics.html_count, metrics.css_count, metrics.js_count, metrics.image_count
        ));
        log.info(&format!(
            "  Size: {:.2}MiB (HTML: {:.2}, CSS: {:.2}, JS: {:.2}, Images: {:.2})",
            metrics.total_mib,
            metrics.html_mib,
            metrics.css_mib,
            metrics.js_mib,
            metrics.image_mib
        ));

        for rec in &metrics.recommendations {
            match rec.severity {
                Severity::Warning => log.warn(&format!("  {}", rec.message)),
                _ => log.info(&format!("  {}", rec.message)),
            }
        }
    }

    Ok(())
}

/// Handle `audit [--sites ...]`, returning the report for reuse
pub fn handle_audit(
    registry: &SiteRegistry,
    settings: &Settings,
    log: &RunLog,
    sites: Option<Vec<String>>,
) -> SiteResult<AuditReport> {
    log.info("Starting full system audit");

    let report = run_audit(registry, settings, sites.as_deref())?;

    for (site, audit) in &report.sites {
        log.info(&format!("Audit of {}:", site));
        log.info(&format!(
            "  Links: {} checked, {} broken",
            audit.links.total,
            audit.links.broken.len()
        ));
        log.info(&format!(
            "  Images: {} checked, {} missing, {} without alt",
            audit.images.total,
            audit.images.missing.len(),
            audit.images.no_alt.len()
        ));
        log.info(&format!(
            "  Performance: {}ms estimated, {:.2}MiB total",
            audit.performance.load_time_ms, audit.performance.total_mib
        ));
    }

    log.info("Audit complete");
    Ok(report)
}
