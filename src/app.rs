//! Application orchestrator.
//! Loads/merges config, validates the source root, initializes logging,
//! creates the output folders and runs the consolidation.
//!
//! Validation happens before the log file is opened so a rejected run
//! creates nothing on disk.

use anyhow::Result;
use tracing::{debug, error, info, warn};

use file_consolidate::cli::Args;
use file_consolidate::config::{
    CONFIG_ENV, load_config_from_xml, prepare_output_dirs, validate_and_normalize,
};
use file_consolidate::output as out;
use file_consolidate::{Config, ConsolidateError, Consolidator, default_config_path};

use crate::logging::{console_dispatch, init_tracing};

fn print_config_location() {
    if let Some(p) = std::env::var_os(CONFIG_ENV) {
        out::print_info(&format!(
            "Using {CONFIG_ENV} (explicit):\n  {}",
            std::path::Path::new(&p).display()
        ));
        return;
    }
    match default_config_path() {
        Ok(p) if p.exists() => out::print_info(&format!("Config file:\n  {}", p.display())),
        Ok(p) => out::print_info(&format!(
            "No config file yet; it would be read from:\n  {}",
            p.display()
        )),
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

/// Log a core error with its stable code before handing it to the caller.
fn log_failure(e: ConsolidateError) -> anyhow::Error {
    error!(code = e.code(), kind = e.kind(), error = %e, "File consolidation failed");
    e.into()
}

fn consolidate(cfg: &Config) -> Result<()> {
    prepare_output_dirs(cfg).map_err(log_failure)?;
    let root = cfg.source_root.clone().ok_or(ConsolidateError::MissingRoot)?;

    info!(root = %root.display(), target = %cfg.target_dir().display(), "File consolidation task started");
    let mut consolidator = Consolidator::from_config(cfg);
    let summary = consolidator.consolidate(&root).map_err(log_failure)?;
    info!("File consolidation task done");

    for failure in &summary.failures {
        warn!(path = %failure.path.display(), error = %failure.error, "File left in place");
    }
    out::print_success(&format!(
        "Moved {} of {} files into {}",
        summary.files_moved,
        summary.files_seen,
        cfg.target_dir().display()
    ));
    if !summary.failures.is_empty() {
        out::print_warn(&format!(
            "{} files could not be processed; see the log for details",
            summary.failures.len()
        ));
    }
    Ok(())
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    // Config file first, then CLI overrides (CLI wins).
    let mut cfg = load_config_from_xml()?.unwrap_or_default();
    args.apply_overrides(&mut cfg);

    let console = console_dispatch(&cfg.log_level, args.json);
    tracing::dispatcher::with_default(&console, || {
        debug!("Starting file_consolidate: {:?}", args);
        validate_and_normalize(&mut cfg).map_err(log_failure)
    })?;

    let log_path = cfg.log_path();
    let guard = init_tracing(&cfg.log_level, Some(&log_path), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    let result = consolidate(&cfg);

    // Flush buffered log lines before exit.
    drop(guard);
    result
}
