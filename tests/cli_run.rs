use assert_cmd::cargo;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

/// Run the binary with an isolated config file so a developer's own config is never read.
fn run_with_config(config_xml: &str, dir: &Path, args: &[&str]) -> Output {
    let cfg_path = dir.join("config.xml");
    fs::write(&cfg_path, config_xml).unwrap();
    let me = cargo::cargo_bin!("file_consolidate");
    Command::new(me)
        .env("FILE_CONSOLIDATE_CONFIG", &cfg_path)
        .current_dir(dir)
        .args(args)
        .output()
        .expect("spawn binary")
}

#[test]
fn flags_drive_a_full_run() {
    let td = tempdir().unwrap();
    let root = td.path().join("tree");
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("a").join("1.txt"), b"0123456789").unwrap();
    fs::write(root.join("b").join("1.txt"), b"01234567890123456789").unwrap();
    let result = td.path().join("out");

    let out = run_with_config(
        "<config></config>",
        td.path(),
        &[
            root.to_str().unwrap(),
            "--result-dir",
            result.to_str().unwrap(),
        ],
    );
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let target = result.join("Target Folder");
    assert_eq!(fs::read(target.join("1.txt")).unwrap().len(), 10);
    assert_eq!(fs::read(target.join("1 (1).txt")).unwrap().len(), 20);

    let details = fs::read_to_string(result.join("Detail").join("Details.csv")).unwrap();
    assert!(details.starts_with("File Name,File Format,File Size,Current Location,New Location"));
    assert_eq!(details.lines().count(), 3);

    let perf = fs::read_to_string(result.join("Performance").join("Performance.csv")).unwrap();
    assert!(perf.starts_with("Moving Files,Extracting Details,CSV Creating"));
    assert_eq!(perf.lines().count(), 2);

    assert!(result.join("Log Data").join("Log Data.log").exists());
}

#[test]
fn config_file_supplies_root_and_result_dir() {
    let td = tempdir().unwrap();
    let root = td.path().join("tree");
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::write(root.join("nested").join("song.mp3"), b"la").unwrap();
    let result = td.path().join("from_config");

    let xml = format!(
        "<config>\n  <source_root>{}</source_root>\n  <result_dir>{}</result_dir>\n  <header_mode>always</header_mode>\n</config>",
        root.display(),
        result.display()
    );
    let out = run_with_config(&xml, td.path(), &[]);
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(result.join("Target Folder").join("song.mp3").exists());
    assert!(!root.join("nested").join("song.mp3").exists());
}

#[test]
fn invalid_root_fails_and_reports_the_path() {
    let td = tempdir().unwrap();
    let missing = td.path().join("does_not_exist");
    let result = td.path().join("out");

    let out = run_with_config(
        "<config></config>",
        td.path(),
        &[
            missing.to_str().unwrap(),
            "--result-dir",
            result.to_str().unwrap(),
        ],
    );
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Provided path is not valid"),
        "stderr: {stderr}"
    );
    // The run never started, so no output folders or log were created.
    assert!(!result.exists());
}

#[test]
fn missing_root_everywhere_is_an_error() {
    let td = tempdir().unwrap();
    let out = run_with_config("<config></config>", td.path(), &[]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("No source root configured"), "stderr: {stderr}");
}

#[test]
fn result_dir_inside_root_is_rejected() {
    let td = tempdir().unwrap();
    let base = dunce::canonicalize(td.path()).unwrap();
    let root = base.join("tree");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("keep.txt"), b"k").unwrap();

    let out = run_with_config(
        "<config></config>",
        td.path(),
        &[
            root.to_str().unwrap(),
            "--result-dir",
            root.join("Result").to_str().unwrap(),
        ],
    );
    assert!(!out.status.success());
    assert!(root.join("keep.txt").exists());
    // Nothing, not even the log folder, is written into the tree.
    assert!(!root.join("Result").exists());
    let entries: Vec<_> = fs::read_dir(&root).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn log_file_inside_root_is_rejected() {
    let td = tempdir().unwrap();
    let base = dunce::canonicalize(td.path()).unwrap();
    let root = base.join("tree");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("keep.txt"), b"k").unwrap();
    let log = root.join("logs").join("run.log");

    let out = run_with_config(
        "<config></config>",
        td.path(),
        &[
            root.to_str().unwrap(),
            "--result-dir",
            base.join("out").to_str().unwrap(),
            "--log-file",
            log.to_str().unwrap(),
        ],
    );
    assert!(!out.status.success());
    assert!(!root.join("logs").exists());
    assert!(!base.join("out").exists());
    assert!(root.join("keep.txt").exists());
}

#[test]
fn malformed_config_fails_before_touching_files() {
    let td = tempdir().unwrap();
    let root = td.path().join("tree");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("keep.txt"), b"k").unwrap();

    let out = run_with_config(
        "<config><surprise>1</surprise></config>",
        td.path(),
        &[root.to_str().unwrap()],
    );
    assert!(!out.status.success());
    assert!(root.join("keep.txt").exists());
}

#[test]
fn print_config_succeeds() {
    let td = tempdir().unwrap();
    let out = run_with_config("<config></config>", td.path(), &["--print-config"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("FILE_CONSOLIDATE_CONFIG"), "stdout: {stdout}");
}
