//! Config validation and output-folder preparation.
//! Verifies the source root exists, anchors the result directory, and keeps
//! the two trees disjoint so the walk never sees files it already moved.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::errors::{ConsolidateError, Result};

use super::types::Config;

/// Canonicalize when possible, otherwise keep the (absolute) input.
fn real_path(p: &Path) -> PathBuf {
    dunce::canonicalize(p).unwrap_or_else(|_| p.to_path_buf())
}

/// Anchor a relative path at the working directory.
fn absolute(p: &Path) -> Result<PathBuf> {
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    let cwd = env::current_dir().map_err(ConsolidateError::fs("read working directory", "."))?;
    Ok(cwd.join(p))
}

/// Check the source root and normalize both bases to absolute paths.
///
/// Runs before any file is touched; a missing root aborts the run here.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<()> {
    let root = cfg.source_root.as_ref().ok_or(ConsolidateError::MissingRoot)?;
    if !root.is_dir() {
        error!(path = %root.display(), "Source root does not exist or is not a directory");
        return Err(ConsolidateError::InvalidRootPath(root.clone()));
    }
    fs::read_dir(root).map_err(ConsolidateError::fs("read source root", root))?;
    let root_real = real_path(root);
    debug!(path = %root_real.display(), "Source root readable");

    let result_real = real_path(&absolute(&cfg.result_dir)?);

    if result_real.starts_with(&root_real) || root_real.starts_with(&result_real) {
        error!(root = %root_real.display(), result = %result_real.display(), "Result directory overlaps source root");
        return Err(ConsolidateError::OverlappingPaths {
            root: root_real,
            result: result_real,
        });
    }

    // An explicit log file must not land inside the tree either.
    let log_real = match &cfg.log_file {
        Some(file) => {
            let log_real = real_path(&absolute(file)?);
            if log_real.starts_with(&root_real) {
                error!(root = %root_real.display(), log = %log_real.display(), "Log file is inside source root");
                return Err(ConsolidateError::OverlappingPaths {
                    root: root_real,
                    result: log_real,
                });
            }
            Some(log_real)
        }
        None => None,
    };

    info!(
        root = %root_real.display(),
        result = %result_real.display(),
        "Provided path is valid"
    );
    cfg.source_root = Some(root_real);
    cfg.result_dir = result_real;
    cfg.log_file = log_real;
    Ok(())
}

/// Create the target folder, the two table folders and the log folder.
/// Existing folders are left as they are.
pub fn prepare_output_dirs(cfg: &Config) -> Result<()> {
    info!("Creating output folders");
    for dir in cfg.output_dirs() {
        fs::create_dir_all(&dir).map_err(ConsolidateError::fs("create output folder", &dir))?;
        debug!(dir = %dir.display(), "Output folder ready");
    }
    info!("Output folders created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;

    #[test]
    fn missing_root_is_reported() {
        let mut cfg = Config::default();
        assert!(matches!(
            validate_and_normalize(&mut cfg),
            Err(ConsolidateError::MissingRoot)
        ));
    }

    #[test]
    fn nonexistent_root_is_invalid() {
        let td = TempDir::new().unwrap();
        let mut cfg = Config::new(td.path().join("nope"), td.path().join("Result"));
        let err = validate_and_normalize(&mut cfg).unwrap_err();
        assert!(matches!(err, ConsolidateError::InvalidRootPath(_)));
    }

    #[test]
    fn file_as_root_is_invalid() {
        let td = TempDir::new().unwrap();
        let file = td.path().join("file.txt");
        fs::write(&file, b"x").unwrap();
        let mut cfg = Config::new(&file, td.path().join("Result"));
        assert!(matches!(
            validate_and_normalize(&mut cfg),
            Err(ConsolidateError::InvalidRootPath(_))
        ));
    }

    #[test]
    fn result_inside_root_is_rejected() {
        let td = TempDir::new().unwrap();
        let root = td.path().join("tree");
        fs::create_dir_all(&root).unwrap();
        let mut cfg = Config::new(&root, root.join("Result"));
        assert!(matches!(
            validate_and_normalize(&mut cfg),
            Err(ConsolidateError::OverlappingPaths { .. })
        ));
    }

    #[test]
    fn log_file_inside_root_is_rejected() {
        let td = TempDir::new().unwrap();
        let base = dunce::canonicalize(td.path()).unwrap();
        let root = base.join("tree");
        fs::create_dir_all(&root).unwrap();
        let mut cfg = Config::new(&root, base.join("Result"));
        cfg.log_file = Some(root.join("logs").join("run.log"));
        assert!(matches!(
            validate_and_normalize(&mut cfg),
            Err(ConsolidateError::OverlappingPaths { .. })
        ));
    }

    #[test]
    fn root_inside_result_is_rejected() {
        let td = TempDir::new().unwrap();
        let result = td.path().join("Result");
        let root = result.join("Target Folder");
        fs::create_dir_all(&root).unwrap();
        let mut cfg = Config::new(&root, &result);
        assert!(matches!(
            validate_and_normalize(&mut cfg),
            Err(ConsolidateError::OverlappingPaths { .. })
        ));
    }

    #[test]
    fn valid_paths_are_canonicalized_and_dirs_prepared() {
        let td = TempDir::new().unwrap();
        let base = dunce::canonicalize(td.path()).unwrap();
        let root = base.join("tree");
        fs::create_dir_all(&root).unwrap();
        let mut cfg = Config::new(&root, base.join("Result"));
        validate_and_normalize(&mut cfg).unwrap();
        assert_eq!(cfg.source_root.as_deref(), Some(root.as_path()));
        assert_eq!(cfg.result_dir, base.join("Result"));

        prepare_output_dirs(&cfg).unwrap();
        // Second call must not fail on existing folders.
        prepare_output_dirs(&cfg).unwrap();
        for name in ["Target Folder", "Detail", "Performance", "Log Data"] {
            assert!(base.join("Result").join(name).is_dir(), "{name} missing");
        }
    }
}
