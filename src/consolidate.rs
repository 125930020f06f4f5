//! Walker/recorder: flatten a tree into the target folder.
//!
//! For every file under the root, in discovery order:
//!  1. extract name, format and size,
//!  2. append a row to the details table,
//!  3. move the file with `move_and_rename`.
//!
//! Time spent in each of the three steps is accumulated across the run and
//! appended to the performance table once the walk completes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::config::{Config, OnError};
use crate::errors::{ConsolidateError, Result};
use crate::fs_ops::{move_and_rename, split_name};
use crate::report::{
    DetailsTable, FileRecord, HeaderMode, PerformanceRecord, size_in_kb, write_performance,
};
use crate::reporter::{Reporter, TracingReporter};

/// Cumulative wall-clock time per phase.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhaseTimings {
    pub moving: Duration,
    pub extraction: Duration,
    pub csv_write: Duration,
}

impl PhaseTimings {
    pub fn performance(&self) -> PerformanceRecord {
        PerformanceRecord::from_durations(self.moving, self.extraction, self.csv_write)
    }
}

/// Run `f`, adding its elapsed time to `slot` whether it succeeds or not.
fn timed<T>(slot: &mut Duration, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    *slot += start.elapsed();
    out
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ConsolidateError,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files discovered (including failed ones)
    pub files_seen: usize,
    pub files_moved: usize,
    /// Rows appended to the details table this run
    pub rows_recorded: usize,
    /// Only populated under `OnError::Skip`
    pub failures: Vec<FileFailure>,
    pub timings: PhaseTimings,
}

/// Sequential walker that records and moves every file under a root.
pub struct Consolidator<R: Reporter = TracingReporter> {
    target_dir: PathBuf,
    details_path: PathBuf,
    performance_path: PathBuf,
    header_mode: HeaderMode,
    on_error: OnError,
    reporter: R,
}

impl Consolidator<TracingReporter> {
    /// Consolidator for `cfg`, reporting through `tracing`.
    pub fn from_config(cfg: &Config) -> Self {
        Self::with_reporter(cfg, TracingReporter)
    }
}

impl<R: Reporter> Consolidator<R> {
    pub fn with_reporter(cfg: &Config, reporter: R) -> Self {
        Self {
            target_dir: cfg.target_dir(),
            details_path: cfg.details_path(),
            performance_path: cfg.performance_path(),
            header_mode: cfg.header_mode,
            on_error: cfg.on_error,
            reporter,
        }
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Move every file under `root` into the target folder and write both tables.
    ///
    /// Under `OnError::Abort` the first error is returned as-is: files already
    /// moved stay moved, rows already written stay in the details table, and
    /// no performance row is written.
    pub fn consolidate(&mut self, root: &Path) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut timings = PhaseTimings::default();
        let mut table = DetailsTable::open(&self.details_path, self.header_mode)?;

        // Top-down: a directory's own files come before its subdirectories.
        let walker = WalkDir::new(root).sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        });
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    let err = ConsolidateError::fs("walk directory", &path)(io::Error::from(e));
                    self.handle_failure(&mut summary, path, err)?;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                self.reporter.directory_entered(entry.path());
                continue;
            }
            // Symlinks are not followed; one pointing at a directory is not a file to move.
            if entry.path_is_symlink() && entry.path().is_dir() {
                continue;
            }

            summary.files_seen += 1;
            match self.process(entry.path(), &mut table, &mut timings) {
                Ok(()) => summary.files_moved += 1,
                Err(e) => self.handle_failure(&mut summary, entry.into_path(), e)?,
            }
        }

        summary.rows_recorded = table.rows();
        table.finish()?;
        write_performance(&self.performance_path, &timings.performance(), self.header_mode)?;

        summary.timings = timings;
        self.reporter.run_finished(&summary);
        Ok(summary)
    }

    /// Record and move a single file.
    fn process(
        &mut self,
        path: &Path,
        table: &mut DetailsTable,
        timings: &mut PhaseTimings,
    ) -> Result<()> {
        let (Some(dir), Some(file_name)) = (path.parent(), path.file_name()) else {
            return Err(ConsolidateError::fs("split path", path)(io::Error::new(
                io::ErrorKind::InvalidInput,
                "path has no parent directory or file name",
            )));
        };

        let record = timed(&mut timings.extraction, || -> Result<FileRecord> {
            let (stem, format) = split_name(file_name);
            let bytes = fs::metadata(path)
                .map_err(ConsolidateError::fs("read file size", path))?
                .len();
            Ok(FileRecord {
                name: stem.to_string_lossy().into_owned(),
                format: format.to_string_lossy().into_owned(),
                size_kb: size_in_kb(bytes),
                source_dir: dir.display().to_string(),
                dest_dir: self.target_dir.display().to_string(),
            })
        })?;

        timed(&mut timings.csv_write, || table.append(&record))?;
        self.reporter.file_recorded(&record);

        timed(&mut timings.moving, || {
            move_and_rename(file_name, dir, &self.target_dir, &mut self.reporter)
        })?;
        Ok(())
    }

    /// Abort (return the error) or record it and carry on, per policy.
    /// Table write failures always abort.
    fn handle_failure(
        &mut self,
        summary: &mut RunSummary,
        path: PathBuf,
        error: ConsolidateError,
    ) -> Result<()> {
        let skippable = !matches!(error, ConsolidateError::OutputWrite { .. });
        if self.on_error == OnError::Skip && skippable {
            self.reporter.file_failed(&path, &error);
            summary.failures.push(FileFailure { path, error });
            Ok(())
        } else {
            Err(error)
        }
    }
}
