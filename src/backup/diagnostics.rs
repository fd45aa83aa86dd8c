//! Diagnostics channel for best-effort operations
//!
//! Retention pruning and archive listing skip individual failures so one
//! corrupt or locked archive does not block the rest. Instead of discarding
//! those failures, they are recorded here so the CLI and tests can observe
//! what was skipped.

/// Collects non-fatal problems encountered during an operation
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<String>,
}

impl Diagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped item or suppressed error
    pub fn record(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
    }

    /// Number of recorded problems
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The recorded messages, in order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read() {
        let mut diag = Diagnostics::new();
        assert!(diag.is_empty());

        diag.record("skipped foo.zip: permission denied");
        assert_eq!(diag.len(), 1);
        assert!(diag.entries()[0].contains("foo.zip"));
    }
}
