//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --source-root takes precedence over the positional SOURCE_ROOT.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel, OnError};
use crate::report::HeaderMode;

/// Flatten a directory tree into one folder, renaming on collision.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move every file under a directory tree into one folder and record CSV reports"
)]
pub struct Args {
    /// Directory tree to consolidate.
    #[arg(value_name = "SOURCE_ROOT", value_hint = ValueHint::DirPath)]
    pub source_root_pos: Option<PathBuf>,

    /// Directory tree to consolidate; overrides the positional.
    #[arg(
        long = "source-root",
        short = 's',
        value_name = "PATH",
        value_hint = ValueHint::DirPath,
        help = "Source root (overrides positional)"
    )]
    pub source_root: Option<PathBuf>,

    /// Folder for the target folder, tables and log (default: ./Result).
    #[arg(long, value_hint = ValueHint::DirPath, help = "Override the result directory")]
    pub result_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Write logs to this file instead of <result_dir>/Log Data/Log Data.log.
    #[arg(long, value_hint = ValueHint::FilePath, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    /// Skip files that fail and keep going instead of stopping at the first error.
    #[arg(long, help = "Record per-file failures and continue")]
    pub keep_going: bool,

    /// When to write CSV header rows: always | if-empty.
    #[arg(long, value_name = "MODE", help = "Header rows: always | if-empty")]
    pub header_mode: Option<HeaderMode>,

    /// Print where the config file is looked up, then exit.
    #[arg(long, help = "Print the config file location and exit")]
    pub print_config: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Effective source root: `--source-root` if provided, else positional SOURCE_ROOT.
    pub fn resolved_root(&self) -> Option<PathBuf> {
        self.source_root
            .as_deref()
            .or(self.source_root_pos.as_deref())
            .map(|p| Self::sanitize_str(&p.to_string_lossy()))
    }

    fn sanitize_str(s: &str) -> PathBuf {
        // Trim surrounding quotes left over from PowerShell/CMD quoting.
        let trimmed = s.trim();
        let mut inner = trimmed.trim_matches(|c| c == '\'' || c == '"').to_string();

        // One trailing separator is dropped, but never the root itself.
        if (inner.ends_with('\\') || inner.ends_with('/')) && inner.len() > 1 {
            inner.pop();
        }
        PathBuf::from(inner)
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(root) = self.resolved_root() {
            cfg.source_root = Some(root);
        }
        if let Some(dir) = &self.result_dir {
            cfg.result_dir = dir.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(file) = &self.log_file {
            cfg.log_file = Some(file.clone());
        }
        if let Some(mode) = self.header_mode {
            cfg.header_mode = mode;
        }
        if self.keep_going {
            cfg.on_error = OnError::Skip;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
