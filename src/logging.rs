//! Tracing initialization.
//! Builds a subscriber with one stdout layer and an optional file layer,
//! each compact or JSON, each filtered by the configured LogLevel.
//!
//! Implementation notes:
//! - File logging uses tracing_appender::non_blocking; the returned guard must
//!   be held until shutdown so buffered lines reach the file.
//! - File logging is refused if any ancestor of the file path is a symlink.
//! - `console_dispatch` gives a stdout-only subscriber for work done before
//!   the log file may be created (config validation).

use anyhow::Result;
use chrono::Local;
use file_consolidate::LogLevel;
use file_consolidate::output as out;
use file_consolidate::path_has_symlink_ancestor;
use file_consolidate::platform::open_log_file_append;
use std::fmt as stdfmt;
use std::path::Path;
use tracing::Dispatch;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry, registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

#[inline]
fn to_level_filter(lvl: &LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

#[inline]
fn env_filter_for(lvl: &LogLevel) -> EnvFilter {
    EnvFilter::default().add_directive(to_level_filter(lvl).into())
}

/// One formatted layer writing to `writer`.
fn fmt_layer<W>(lvl: &LogLevel, json: bool, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tsfmt::layer()
        .with_timer(LocalHumanTime)
        .with_level(true)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    if json {
        base.json().with_filter(env_filter_for(lvl)).boxed()
    } else {
        base.compact().with_filter(env_filter_for(lvl)).boxed()
    }
}

/// Open a non-blocking writer for `path`, or explain on stderr why not.
fn maybe_open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(true) => {
            eprintln!(
                "Refusing to enable file logging: ancestor of {} is a symlink; proceeding without file logging.",
                path.display()
            );
            return None;
        }
        Err(e) => {
            eprintln!(
                "Error checking log path {} for symlinks: {}; proceeding without file logging.",
                path.display(),
                e
            );
            return None;
        }
        Ok(false) => {}
    }

    match open_log_file_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
            None
        }
    }
}

/// Stdout-only dispatcher, for use with `tracing::dispatcher::with_default`.
pub fn console_dispatch(lvl: &LogLevel, json: bool) -> Dispatch {
    let layers: Vec<BoxedLayer> = vec![fmt_layer(lvl, json, std::io::stdout, true)];
    Dispatch::new(registry().with(layers))
}

/// Initialize tracing. Returns the file appender's guard when file logging is active.
pub fn init_tracing(
    lvl: &LogLevel,
    log_file: Option<&Path>,
    json: bool,
) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(lvl, json, std::io::stdout, true)];
    let mut guard = None;

    if let Some(path) = log_file {
        if let Some((writer, g)) = maybe_open_non_blocking_writer(path) {
            layers.push(fmt_layer(lvl, json, writer, false));
            guard = Some(g);
        } else {
            out::print_warn(&format!(
                "File logging to '{}' was not enabled. Check that the folder is writable and no ancestor is a symlink. Logs will continue to stdout.",
                path.display()
            ));
        }
    }

    registry().with(layers).try_init()?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_mapping_is_one_step_more_verbose() {
        assert_eq!(to_level_filter(&LogLevel::Quiet), LevelFilter::ERROR);
        assert_eq!(to_level_filter(&LogLevel::Normal), LevelFilter::INFO);
        assert_eq!(to_level_filter(&LogLevel::Info), LevelFilter::DEBUG);
        assert_eq!(to_level_filter(&LogLevel::Debug), LevelFilter::TRACE);
    }
}
