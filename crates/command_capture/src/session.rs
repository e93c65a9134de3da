use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::CaptureError;

/// Second-resolution stamp shared by both log files of a session.
pub const SESSION_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// File locations for one capture session.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SessionPaths {
    pub log_dir: PathBuf,
    pub timestamp: String,
    /// I/O transcript (`mcp-capture-<timestamp>.log`).
    pub transcript: PathBuf,
    /// Operational messages (`command-capture-<timestamp>.log`).
    pub diagnostics: PathBuf,
}

impl SessionPaths {
    pub fn new(log_dir: impl Into<PathBuf>, started_at: DateTime<Local>) -> Self {
        let log_dir = log_dir.into();
        let timestamp = started_at.format(SESSION_TIMESTAMP_FORMAT).to_string();
        Self {
            transcript: log_dir.join(format!("mcp-capture-{timestamp}.log")),
            diagnostics: log_dir.join(format!("command-capture-{timestamp}.log")),
            log_dir,
            timestamp,
        }
    }

    pub fn now(log_dir: impl Into<PathBuf>) -> Self {
        Self::new(log_dir, Local::now())
    }

    /// Creates the log directory if it does not exist yet.
    pub fn prepare(&self) -> Result<(), CaptureError> {
        create_log_dir(&self.log_dir)
    }
}

fn create_log_dir(path: &Path) -> Result<(), CaptureError> {
    std::fs::create_dir_all(path).map_err(|source| CaptureError::LogDirectory {
        path: path.to_path_buf(),
        source,
    })
}
