//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.
//! - OnError selects fail-fast or skip-and-continue for per-file failures.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::report::HeaderMode;

use super::{
    DETAIL_DIR_NAME, DETAILS_FILE_NAME, LOG_DIR_NAME, LOG_FILE_NAME, PERFORMANCE_DIR_NAME,
    PERFORMANCE_FILE_NAME, RESULT_DIR_DEFAULT, TARGET_DIR_NAME,
};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// Per-directory and per-file progress
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// What the walker does when a single file cannot be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Stop the run and return the error. Files already moved stay moved.
    #[default]
    Abort,
    /// Record the failure, report it, and continue with the next file.
    Skip,
}

/// Runtime configuration for a consolidation run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tree to flatten; required before a run can start
    pub source_root: Option<PathBuf>,
    /// Folder holding the target folder, both tables and the log
    pub result_dir: PathBuf,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Log file; `None` means `<result_dir>/Log Data/Log Data.log`
    pub log_file: Option<PathBuf>,
    pub header_mode: HeaderMode,
    pub on_error: OnError,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: None,
            result_dir: PathBuf::from(RESULT_DIR_DEFAULT),
            log_level: LogLevel::Normal,
            log_file: None,
            header_mode: HeaderMode::default(),
            on_error: OnError::default(),
        }
    }
}

impl Config {
    /// Construct a Config with explicit source root and result directory; other fields use defaults.
    pub fn new(source_root: impl Into<PathBuf>, result_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_root: Some(source_root.into()),
            result_dir: result_dir.into(),
            ..Default::default()
        }
    }

    /// Flat destination every file is moved into.
    pub fn target_dir(&self) -> PathBuf {
        self.result_dir.join(TARGET_DIR_NAME)
    }

    pub fn details_path(&self) -> PathBuf {
        self.result_dir.join(DETAIL_DIR_NAME).join(DETAILS_FILE_NAME)
    }

    pub fn performance_path(&self) -> PathBuf {
        self.result_dir
            .join(PERFORMANCE_DIR_NAME)
            .join(PERFORMANCE_FILE_NAME)
    }

    /// Effective log file: the configured one or the default under `result_dir`.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.result_dir.join(LOG_DIR_NAME).join(LOG_FILE_NAME))
    }

    /// All folders `prepare_output_dirs` creates.
    pub fn output_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![
            self.target_dir(),
            self.result_dir.join(DETAIL_DIR_NAME),
            self.result_dir.join(PERFORMANCE_DIR_NAME),
        ];
        if let Some(parent) = self.log_path().parent() {
            dirs.push(parent.to_path_buf());
        }
        dirs
    }
}
