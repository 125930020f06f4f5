//! Progress reporting seam.
//!
//! The walker and the mover never log directly; they call a `Reporter` that
//! the caller passes in. The CLI uses `TracingReporter`, tests can pass their
//! own implementation and inspect exactly what happened.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::consolidate::RunSummary;
use crate::errors::ConsolidateError;
use crate::report::FileRecord;

/// Observer for a consolidation run. Every method defaults to a no-op.
pub trait Reporter {
    fn directory_entered(&mut self, _dir: &Path) {}

    fn file_recorded(&mut self, _record: &FileRecord) {}

    /// A name was already taken at the destination and `chosen` was picked instead.
    fn collision(&mut self, _requested: &Path, _chosen: &Path) {}

    fn file_moved(&mut self, _from: &Path, _to: &Path) {}

    /// Only called when the run continues past the failure.
    fn file_failed(&mut self, _path: &Path, _error: &ConsolidateError) {}

    fn run_finished(&mut self, _summary: &RunSummary) {}
}

/// Forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn directory_entered(&mut self, dir: &Path) {
        debug!(dir = %dir.display(), "Entered directory");
    }

    fn file_recorded(&mut self, record: &FileRecord) {
        debug!(
            name = %record.name,
            format = %record.format,
            size_kb = record.size_kb,
            "Recorded file details"
        );
    }

    fn collision(&mut self, requested: &Path, chosen: &Path) {
        info!(requested = %requested.display(), chosen = %chosen.display(), "Name taken at destination; renaming");
    }

    fn file_moved(&mut self, from: &Path, to: &Path) {
        debug!(src = %from.display(), dest = %to.display(), "Moved file");
    }

    fn file_failed(&mut self, path: &Path, error: &ConsolidateError) {
        warn!(code = error.code(), kind = error.kind(), path = %path.display(), %error, "Skipping file");
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        info!(
            files = summary.files_seen,
            moved = summary.files_moved,
            recorded = summary.rows_recorded,
            failed = summary.failures.len(),
            "Consolidation finished"
        );
        debug!(
            moving = summary.timings.moving.as_secs_f64(),
            extracting = summary.timings.extraction.as_secs_f64(),
            csv = summary.timings.csv_write.as_secs_f64(),
            "Phase timings (seconds)"
        );
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {}
