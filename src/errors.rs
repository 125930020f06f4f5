//! Typed error definitions for file_consolidate.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::describe_io_error;

#[derive(Debug, Error)]
pub enum ConsolidateError {
    #[error("No source root configured; pass SOURCE_ROOT or set <source_root> in the config file")]
    MissingRoot,

    #[error("Provided path is not valid: {0}")]
    InvalidRootPath(PathBuf),

    #[error("Result directory '{result}' overlaps source root '{root}'; they must be disjoint")]
    OverlappingPaths { root: PathBuf, result: PathBuf },

    #[error("{}", describe_io_error(.op, .path, .source))]
    FileSystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed writing table '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ConsolidateError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            ConsolidateError::MissingRoot => 10,
            ConsolidateError::InvalidRootPath(_) => 11,
            ConsolidateError::OverlappingPaths { .. } => 12,
            ConsolidateError::FileSystem { .. } => 20,
            ConsolidateError::OutputWrite { .. } => 30,
        }
    }

    /// Short machine-friendly label used as the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ConsolidateError::MissingRoot => "missing_root",
            ConsolidateError::InvalidRootPath(_) => "invalid_root",
            ConsolidateError::OverlappingPaths { .. } => "overlapping_paths",
            ConsolidateError::FileSystem { .. } => "filesystem",
            ConsolidateError::OutputWrite { .. } => "output_write",
        }
    }

    /// Adapter for `.map_err(...)` on io results.
    pub fn fs(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| ConsolidateError::FileSystem { op, path, source }
    }

    /// Adapter for `.map_err(...)` on csv results.
    pub fn output(path: impl Into<PathBuf>) -> impl FnOnce(csv::Error) -> Self {
        let path = path.into();
        move |source| ConsolidateError::OutputWrite { path, source }
    }
}

pub type Result<T, E = ConsolidateError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_error_message_names_op_and_path() {
        let err = ConsolidateError::fs("move file", "/no/such/file.txt")(io::Error::from(
            io::ErrorKind::NotFound,
        ));
        let msg = err.to_string();
        assert!(msg.contains("move file"), "msg was: {msg}");
        assert!(msg.contains("/no/such/file.txt"), "msg was: {msg}");
        assert!(msg.contains("path not found"), "msg was: {msg}");
        assert_eq!(err.code(), 20);
        assert_eq!(err.kind(), "filesystem");
    }

    #[test]
    fn invalid_root_reads_like_a_user_message() {
        let err = ConsolidateError::InvalidRootPath(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "Provided path is not valid: /missing");
    }
}
