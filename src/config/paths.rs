//! Default config path and symlink checks.

use anyhow::{Context, Result, anyhow};
use dirs::config_dir;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FILE_CONSOLIDATE_CONFIG";

/// Config file location.
///
/// - `$FILE_CONSOLIDATE_CONFIG` if set (relative values resolve against the working directory)
/// - otherwise `<config dir>/file_consolidate/config.xml`
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV) {
        let p = PathBuf::from(p);
        if p.is_absolute() {
            return Ok(p);
        }
        let cwd = env::current_dir().context("resolve working directory for relative config path")?;
        return Ok(cwd.join(p));
    }

    if let Some(base) = config_dir() {
        return Ok(base.join("file_consolidate").join("config.xml"));
    }
    env::var_os("HOME")
        .map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("file_consolidate")
                .join("config.xml")
        })
        .ok_or_else(|| anyhow!("cannot determine a config directory (no config dir and no HOME)"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
