//! Full-site audit: links, images and performance in one pass

use std::collections::BTreeMap;

use chrono::Local;
use serde::Serialize;

use crate::config::registry::SiteRegistry;
use crate::config::settings::Settings;
use crate::error::SiteResult;

use super::images::{ImageReport, ImageValidator};
use super::links::{LinkChecker, LinkReport};
use super::performance::{PerformanceMetrics, PerformanceMonitor};

/// All scan results for one site
#[derive(Debug, Serialize)]
pub struct SiteAudit {
    pub links: LinkReport,
    pub images: ImageReport,
    pub performance: PerformanceMetrics,
}

/// Combined audit across sites
#[derive(Debug, Serialize)]
pub struct AuditReport {
    /// When the audit ran (RFC 3339, local time)
    pub timestamp: String,
    /// Per-site results, keyed by site name
    pub sites: BTreeMap<String, SiteAudit>,
}

/// Run the full audit over the given sites (all registered sites if `None`)
pub fn run_audit(
    registry: &SiteRegistry,
    settings: &Settings,
    sites: Option<&[String]>,
) -> SiteResult<AuditReport> {
    let names: Vec<String> = match sites {
        Some(list) => list.to_vec(),
        None => registry.names(),
    };

    let links = LinkChecker::new(registry.clone(), settings)?;
    let images = ImageValidator::new(registry.clone());
    let performance = PerformanceMonitor::new(registry.clone(), settings);

    let mut report = AuditReport {
        timestamp: Local::now().to_rfc3339(),
        sites: BTreeMap::new(),
    };

    for name in names {
        let audit = SiteAudit {
            links: links.scan(&name)?,
            images: images.validate(&name)?,
            performance: performance.analyze(&name)?,
        };
        report.sites.insert(name, audit);
    }

    Ok(report)
}
