//! Site scanners: link integrity, image validation and performance
//! heuristics, plus the combined audit.

pub mod audit;
pub mod html;
pub mod images;
pub mod links;
pub mod performance;

pub use audit::{run_audit, AuditReport, SiteAudit};
pub use images::{ImageReport, ImageValidator};
pub use links::{LinkChecker, LinkReport};
pub use performance::{PerformanceMetrics, PerformanceMonitor};
