//! Collision-safe move of a single file into the consolidation folder.
//! Renames straight to the first free name in the destination; on
//! cross-filesystem errors falls back to copy + remove.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{ConsolidateError, Result};
use crate::reporter::Reporter;

use super::copy::copy_then_remove;
use super::naming::disambiguated_name;
use super::util::{fsync_dir, is_cross_device};

/// Move `source_dir/file_name` into `dest_dir` without overwriting anything there.
///
/// When `file_name` is already taken in `dest_dir` the file lands as
/// `"<stem> (n)<ext>"` with the smallest free `n >= 1`. Returns the final path.
///
/// If `source_dir` and `dest_dir` are the same directory the file is already
/// consolidated and is left where it is.
pub fn move_and_rename(
    file_name: &OsStr,
    source_dir: &Path,
    dest_dir: &Path,
    reporter: &mut dyn Reporter,
) -> Result<PathBuf> {
    let src = source_dir.join(file_name);
    fs::symlink_metadata(&src).map_err(ConsolidateError::fs("read metadata", &src))?;

    if same_directory(source_dir, dest_dir) {
        debug!(path = %src.display(), "Source already inside destination; leaving in place");
        return Ok(src);
    }

    let requested = dest_dir.join(file_name);
    let chosen = disambiguated_name(dest_dir, file_name);
    let dest = dest_dir.join(&chosen);
    if chosen != file_name {
        reporter.collision(&requested, &dest);
    }

    relocate(&src, &dest)?;
    reporter.file_moved(&src, &dest);
    Ok(dest)
}

fn relocate(src: &Path, dest: &Path) -> Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => {
            if let Some(parent) = dest.parent() {
                // Ignore fsync errors to avoid turning a successful rename into a failure.
                let _ = fsync_dir(parent);
            }
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            warn!(src = %src.display(), dest = %dest.display(), "Rename crosses filesystems; copying instead");
            copy_then_remove(src, dest)
        }
        Err(e) => Err(ConsolidateError::fs("move file", src)(e)),
    }
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;
    use assert_fs::prelude::*;

    #[test]
    fn moves_without_collision() {
        let temp = assert_fs::TempDir::new().unwrap();
        let src_dir = temp.child("src");
        let dest_dir = temp.child("dest");
        src_dir.create_dir_all().unwrap();
        dest_dir.create_dir_all().unwrap();
        src_dir.child("a.txt").write_str("hello").unwrap();

        let dest = move_and_rename(
            OsStr::new("a.txt"),
            src_dir.path(),
            dest_dir.path(),
            &mut NullReporter,
        )
        .unwrap();

        assert_eq!(dest, dest_dir.path().join("a.txt"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "hello");
        assert!(!src_dir.child("a.txt").path().exists());
    }

    #[test]
    fn same_directory_leaves_single_file_untouched() {
        let temp = assert_fs::TempDir::new().unwrap();
        let dir = temp.child("flat");
        dir.create_dir_all().unwrap();
        dir.child("only.txt").write_str("data").unwrap();

        let dest = move_and_rename(OsStr::new("only.txt"), dir.path(), dir.path(), &mut NullReporter)
            .unwrap();

        assert_eq!(dest, dir.path().join("only.txt"));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("only.txt")]);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "data");
    }

    #[test]
    fn missing_source_is_filesystem_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = move_and_rename(
            OsStr::new("ghost.txt"),
            temp.path(),
            &temp.path().join("dest"),
            &mut NullReporter,
        )
        .unwrap_err();
        assert!(matches!(err, ConsolidateError::FileSystem { op: "read metadata", .. }));
    }

    #[test]
    fn sibling_with_suffixed_name_in_source_is_not_clobbered() {
        let temp = assert_fs::TempDir::new().unwrap();
        let src_dir = temp.child("src");
        let dest_dir = temp.child("dest");
        src_dir.create_dir_all().unwrap();
        dest_dir.create_dir_all().unwrap();
        dest_dir.child("x.txt").write_str("dest").unwrap();
        src_dir.child("x.txt").write_str("moving").unwrap();
        src_dir.child("x (1).txt").write_str("sibling").unwrap();

        let dest = move_and_rename(
            OsStr::new("x.txt"),
            src_dir.path(),
            dest_dir.path(),
            &mut NullReporter,
        )
        .unwrap();

        assert_eq!(dest, dest_dir.path().join("x (1).txt"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "moving");
        assert_eq!(fs::read_to_string(src_dir.child("x (1).txt").path()).unwrap(), "sibling");
        assert_eq!(fs::read_to_string(dest_dir.child("x.txt").path()).unwrap(), "dest");
    }
}
