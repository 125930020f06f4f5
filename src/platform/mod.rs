//! Platform-specific helpers.
//! Hides the Unix/Windows difference in how the log file is opened.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Open the log file for appending, creating it (and its parent) if needed.
///
/// On Unix a newly created file gets mode 0600; an existing file keeps
/// whatever mode an administrator gave it.
#[cfg(unix)]
pub fn open_log_file_append(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create only
        .open(path)
}

#[cfg(not(unix))]
pub fn open_log_file_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
