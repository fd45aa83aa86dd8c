//! Report CLI command: audit then render

use crate::config::paths::SitePaths;
use crate::config::registry::SiteRegistry;
use crate::config::settings::Settings;
use crate::error::SiteResult;
use crate::report::ReportGenerator;
use crate::runlog::RunLog;

use super::scan::handle_audit;

/// Handle `report [--sites ...]`
pub fn handle_report(
    paths: &SitePaths,
    registry: &SiteRegistry,
    settings: &Settings,
    log: &RunLog,
    sites: Option<Vec<String>>,
) -> SiteResult<()> {
    let audit = handle_audit(registry, settings, log, sites)?;

    log.info("Generating report");
    let generator = ReportGenerator::new(paths);
    let report = generator.generate(&audit)?;

    log.info(&format!("Report generated: {}", report.html.display()));
    log.info(&format!("Raw data: {}", report.json.display()));

    Ok(())
}
