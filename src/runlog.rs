//! Per-run log file
//!
//! Every CLI invocation appends what it printed to a timestamped log file
//! under the logs directory, so scan output survives the terminal session.
//! Logging is best-effort: a failed append never aborts the operation.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::paths::SitePaths;

/// Console-plus-file logger for one run
pub struct RunLog {
    log_path: PathBuf,
}

impl RunLog {
    /// Create a log for this run, named after the start time
    pub fn new(paths: &SitePaths) -> Self {
        let filename = format!("automation_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
        Self {
            log_path: paths.log_dir().join(filename),
        }
    }

    /// Create a log writing to an explicit path (useful for testing)
    pub fn with_path(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Log at INFO level
    pub fn info(&self, message: &str) {
        self.log("INFO", message);
    }

    /// Log at WARNING level
    pub fn warn(&self, message: &str) {
        self.log("WARNING", message);
    }

    /// Log at ERROR level
    pub fn error(&self, message: &str) {
        self.log("ERROR", message);
    }

    fn log(&self, level: &str, message: &str) {
        let line = format!(
            "[{}] [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level,
            message
        );
        println!("{}", line);

        // Best-effort append
        if let Some(parent) = self.log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
        {
            let _ = writeln!(file, "{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_appended_with_level() {
        let temp = TempDir::new().unwrap();
        let log = RunLog::with_path(temp.path().join("run.log"));

        log.info("scan started");
        log.warn("broken link found");
        log.error("backup failed");

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("[INFO] scan started"));
        assert!(lines[1].contains("[WARNING] broken link found"));
        assert!(lines[2].contains("[ERROR] backup failed"));
    }

    #[test]
    fn test_log_path_named_after_run() {
        let temp = TempDir::new().unwrap();
        let paths = SitePaths::with_base_dir(temp.path().to_path_buf());
        let log = RunLog::new(&paths);

        let name = log.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("automation_"));
        assert!(name.ends_with(".log"));
    }
}
