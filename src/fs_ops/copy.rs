//! Cross-filesystem fallback: copy into a fresh destination, carry over
//! permissions and timestamps, then remove the source.
//!
//! The destination is opened with `create_new`, so an existing file there is
//! never overwritten. A partially written destination is removed on failure.

use filetime::FileTime;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::{ConsolidateError, Result};

use super::util::fsync_dir;

/// Copy `src` to `dest` (which must not exist) and delete `src`.
pub(super) fn copy_then_remove(src: &Path, dest: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(src).map_err(ConsolidateError::fs("read metadata", src))?;

    #[cfg(unix)]
    if meta.file_type().is_symlink() {
        let target = fs::read_link(src).map_err(ConsolidateError::fs("read symlink", src))?;
        std::os::unix::fs::symlink(&target, dest)
            .map_err(ConsolidateError::fs("recreate symlink", dest))?;
        fs::remove_file(src).map_err(ConsolidateError::fs("remove original", src))?;
        debug!(src = %src.display(), dest = %dest.display(), "Recreated symlink across filesystems");
        return Ok(());
    }

    copy_contents(src, dest)?;

    if let Err(e) = fs::set_permissions(dest, meta.permissions()) {
        warn!(dest = %dest.display(), error = %e, "Could not copy permissions");
    }
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    if let Err(e) = filetime::set_file_times(dest, atime, mtime) {
        warn!(dest = %dest.display(), error = %e, "Could not copy timestamps");
    }

    fs::remove_file(src).map_err(ConsolidateError::fs("remove original", src))?;
    if let Some(parent) = dest.parent() {
        let _ = fsync_dir(parent);
    }
    Ok(())
}

fn copy_contents(src: &Path, dest: &Path) -> Result<()> {
    let mut reader = fs::File::open(src).map_err(ConsolidateError::fs("open source", src))?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(ConsolidateError::fs("create destination", dest))?;
    // From here on `dest` is ours; drop it again if the copy does not complete.
    let copied = io::copy(&mut reader, &mut writer).and_then(|_| writer.sync_all());
    if let Err(e) = copied {
        drop(writer);
        if let Err(cleanup) = fs::remove_file(dest) {
            warn!(dest = %dest.display(), error = %cleanup, "Could not remove partial copy");
        }
        return Err(ConsolidateError::fs("copy", dest)(e));
    }
    Ok(())
}
