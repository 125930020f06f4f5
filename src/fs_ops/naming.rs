//! Collision naming.
//!
//! Splits a file name into stem and extension the way the details table
//! reports them, and picks the first free `"<stem> (<n>)<ext>"` variant in a
//! destination directory.
//!
//! Examples:
//! - "movie.mkv" -> "movie (1).mkv", "movie (2).mkv", ...
//! - ".env" -> ".env (1)"
//! - "archive.tar.gz" -> "archive.tar (1).gz"

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;
use tracing::trace;

/// Split a final path component into `(stem, extension)`.
///
/// The extension keeps its leading dot and is empty when the name has none.
/// A trailing dot (`"notes."`) does not count as an extension.
pub fn split_name(file_name: &OsStr) -> (OsString, OsString) {
    let p = Path::new(file_name);
    match (p.file_stem(), p.extension()) {
        (Some(stem), Some(ext)) if !ext.is_empty() => {
            let mut dotted = OsString::from(".");
            dotted.push(ext);
            (stem.to_os_string(), dotted)
        }
        _ => (file_name.to_os_string(), OsString::new()),
    }
}

/// Something (file, directory or dangling symlink) already occupies `path`.
pub(crate) fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Build `"<stem> (<counter>)<ext>"`.
fn with_counter(stem: &OsStr, ext: &OsStr, counter: u64) -> OsString {
    let mut name = stem.to_os_string();
    name.push(format!(" ({counter})"));
    name.push(ext);
    name
}

/// First name, starting with `file_name` itself, that is free in `dest_dir`.
///
/// Probing happens against the directory contents at call time; nothing is
/// reserved.
pub fn disambiguated_name(dest_dir: &Path, file_name: &OsStr) -> OsString {
    if !is_taken(&dest_dir.join(file_name)) {
        return file_name.to_os_string();
    }

    let (stem, ext) = split_name(file_name);
    let mut counter: u64 = 1;
    loop {
        let candidate = with_counter(&stem, &ext, counter);
        if !is_taken(&dest_dir.join(&candidate)) {
            if counter > 1 {
                trace!(name = ?file_name, dir = %dest_dir.display(), counter, "collision: probed several suffixes");
            }
            return candidate;
        }
        counter += 1;
    }
}
