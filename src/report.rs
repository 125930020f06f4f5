//! CSV report tables.
//!
//! - Details table: one row per processed file.
//! - Performance table: one row of cumulative phase timings per run.
//!
//! Both files are opened in append mode so earlier runs' rows survive.
//! Whether a header row is written on open is controlled by `HeaderMode`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{ConsolidateError, Result};

pub const DETAILS_HEADER: [&str; 5] = [
    "File Name",
    "File Format",
    "File Size",
    "Current Location",
    "New Location",
];

pub const PERFORMANCE_HEADER: [&str; 3] = ["Moving Files", "Extracting Details", "CSV Creating"];

/// When to write the header row on opening a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Every time the table is opened, even if it already holds rows.
    Always,
    /// Only when the file is new or empty.
    #[default]
    IfEmpty,
}

impl HeaderMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Some(HeaderMode::Always),
            "if-empty" | "if_empty" | "once" => Some(HeaderMode::IfEmpty),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeaderMode::Always => "always",
            HeaderMode::IfEmpty => "if-empty",
        })
    }
}

impl FromStr for HeaderMode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid header mode: '{s}' (expected always | if-empty)"))
    }
}

/// One row of the details table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(rename = "File Name")]
    pub name: String,
    #[serde(rename = "File Format")]
    pub format: String,
    #[serde(rename = "File Size")]
    pub size_kb: f64,
    #[serde(rename = "Current Location")]
    pub source_dir: String,
    #[serde(rename = "New Location")]
    pub dest_dir: String,
}

/// Size in KB rounded to two decimals, ties to even.
pub fn size_in_kb(bytes: u64) -> f64 {
    (bytes as f64 * 100.0 / 1024.0).round_ties_even() / 100.0
}

/// The single row of the performance table, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    #[serde(rename = "Moving Files")]
    pub moving_seconds: f64,
    #[serde(rename = "Extracting Details")]
    pub extraction_seconds: f64,
    #[serde(rename = "CSV Creating")]
    pub csv_write_seconds: f64,
}

impl PerformanceRecord {
    pub fn from_durations(moving: Duration, extraction: Duration, csv_write: Duration) -> Self {
        Self {
            moving_seconds: moving.as_secs_f64(),
            extraction_seconds: extraction.as_secs_f64(),
            csv_write_seconds: csv_write.as_secs_f64(),
        }
    }
}

/// Open `path` for appending and write `header` according to `mode`.
fn open_table(path: &Path, header: &[&str], mode: HeaderMode) -> Result<csv::Writer<File>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ConsolidateError::output(path)(e.into()))?;
    let had_rows = file
        .metadata()
        .map(|m| m.len() > 0)
        .map_err(|e| ConsolidateError::output(path)(e.into()))?;

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if mode == HeaderMode::Always || !had_rows {
        writer.write_record(header).map_err(ConsolidateError::output(path))?;
    }
    Ok(writer)
}

/// Details table held open for the duration of the walk.
///
/// Rows are buffered; `finish` flushes them. Dropping the table without
/// `finish` (e.g. on an error) still flushes on a best-effort basis.
pub struct DetailsTable {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows: usize,
}

impl DetailsTable {
    pub fn open(path: &Path, mode: HeaderMode) -> Result<Self> {
        let writer = open_table(path, &DETAILS_HEADER, mode)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        })
    }

    pub fn append(&mut self, record: &FileRecord) -> Result<()> {
        self.writer
            .serialize(record)
            .map_err(ConsolidateError::output(&self.path))?;
        self.rows += 1;
        Ok(())
    }

    /// Rows appended through this handle (excludes the header).
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| ConsolidateError::output(&self.path)(e.into()))
    }
}

/// Append the performance header (per `mode`) and `record` to `path`.
pub fn write_performance(path: &Path, record: &PerformanceRecord, mode: HeaderMode) -> Result<()> {
    let mut writer = open_table(path, &PERFORMANCE_HEADER, mode)?;
    writer.serialize(record).map_err(ConsolidateError::output(path))?;
    writer
        .flush()
        .map_err(|e| ConsolidateError::output(path)(e.into()))
}
