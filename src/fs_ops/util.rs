use std::io;
use std::path::Path;

pub(super) fn is_cross_device(e: &io::Error) -> bool {
    // std::io::ErrorKind has no stable CrossDeviceLink variant,
    // so detect EXDEV / ERROR_NOT_SAME_DEVICE via raw OS error codes.
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        #[cfg(windows)]
        Some(code) => code == 17,
        #[cfg(not(any(unix, windows)))]
        Some(_) => false,
        None => false,
    }
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
