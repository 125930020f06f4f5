//! Core library for `file_consolidate`.
//!
//! Flattens a directory tree into a single target folder. Each file is
//! recorded in a details CSV, then moved; name collisions at the destination
//! get a ` (n)` suffix instead of overwriting. Cumulative phase timings go to
//! a performance CSV at the end of the run.
//!
//! Layout:
//! - `config`: settings, XML loading, validation, output folders
//! - `fs_ops`: collision naming and the collision-safe mover
//! - `consolidate`: the sequential walker/recorder
//! - `report`: CSV tables
//! - `reporter`: progress observer threaded through the walker and mover

pub mod cli;
pub mod config;
pub mod consolidate;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod report;
pub mod reporter;

pub use config::{Config, LogLevel, OnError, default_config_path, path_has_symlink_ancestor};
pub use consolidate::{Consolidator, FileFailure, PhaseTimings, RunSummary};
pub use errors::ConsolidateError;
pub use fs_ops::{disambiguated_name, move_and_rename};
pub use report::{FileRecord, HeaderMode, PerformanceRecord};
pub use reporter::{NullReporter, Reporter, TracingReporter};
