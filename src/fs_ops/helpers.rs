//! I/O error descriptions.
//!
//! Turns a bare io::Error into a one-line message naming the operation, the
//! path and, where the OS code is recognised, a short actionable hint.

use std::io;
use std::path::Path;

/// Platform hint keyed by raw OS error code.
#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
        libc::EXDEV => "cross-filesystem; atomic rename not possible",
        libc::EBUSY => "resource busy; another process may be using the file",
        libc::ENOENT => "path not found; it may have been moved or deleted during the run",
        libc::EEXIST => "already exists at the destination",
        libc::ENOSPC => "insufficient space on device",
        libc::EROFS => "read-only filesystem; cannot write here",
        libc::ELOOP => "too many symbolic link levels; possible symlink cycle",
        libc::ENAMETOOLONG => "filename or path too long",
        libc::EMFILE => "process file descriptor limit reached",
        libc::ENFILE => "system-wide file table overflow",
        _ => return None,
    };
    Some(hint)
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        5 => "access denied; check permissions",
        17 => "not same device; cross-filesystem move",
        32 => "sharing violation; file is in use",
        2 | 3 => "path not found; it may have been moved or deleted during the run",
        80 | 183 => "already exists at the destination",
        112 => "insufficient disk space",
        19 => "write protected / read-only media",
        206 => "filename or path too long",
        _ => return None,
    };
    Some(hint)
}

#[cfg(not(any(unix, windows)))]
fn os_hint(_code: i32) -> Option<&'static str> {
    None
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => {
            Some("permission denied; check ownership and write permissions")
        }
        io::ErrorKind::NotFound => {
            Some("path not found; it may have been moved or deleted during the run")
        }
        io::ErrorKind::AlreadyExists => Some("already exists at the destination"),
        _ => None,
    }
}

/// Describe a failed filesystem operation: `<op> '<path>': <error>[ (hint)][ [os code: N]]`.
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    let code = e.raw_os_error();
    let hint = code.and_then(os_hint).or_else(|| kind_hint(e.kind()));
    if let Some(hint) = hint {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    if let Some(code) = code {
        msg.push_str(&format!(" [os code: {code}]"));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notfound_kind_gets_hint() {
        let p = Path::new("/nonexistent/path/for/test");
        let msg = describe_io_error("read metadata", p, &io::Error::from(io::ErrorKind::NotFound));
        assert!(msg.starts_with("read metadata '/nonexistent/path/for/test'"));
        assert!(msg.contains("path not found"));
        assert!(!msg.contains("os code"));
    }

    #[cfg(unix)]
    #[test]
    fn raw_code_hint_and_code_present() {
        let p = Path::new("/tmp");
        let msg = describe_io_error("write", p, &io::Error::from_raw_os_error(libc::ENOSPC));
        assert!(msg.contains("insufficient space"), "msg was: {msg}");
        assert!(msg.contains("[os code:"), "msg was: {msg}");
    }

    #[test]
    fn unknown_kind_has_no_hint() {
        let p = Path::new("/tmp/x");
        let msg = describe_io_error("op", p, &io::Error::other("boom"));
        assert_eq!(msg, "op '/tmp/x': boom");
    }
}
