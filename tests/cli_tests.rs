use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn drift(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("drift").unwrap();
    cmd.env("DRIFTWATCH_CONFIG_PATH", dir.path().join("config.toml"));
    cmd
}

#[test]
fn test_first_scan_exits_clean() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.txt"), "alpha").unwrap();

    drift(&dir)
        .arg("scan")
        .arg(&root)
        .arg("--snapshot")
        .arg(dir.path().join("snap.bin"))
        .arg("--embedded")
        .assert()
        .success();
}

#[test]
fn test_deletion_exits_with_code_one() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.txt"), "alpha").unwrap();
    let snapshot = dir.path().join("snap.bin");

    drift(&dir)
        .arg("scan")
        .arg(&root)
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("--embedded")
        .assert()
        .success();

    fs::remove_file(root.join("a.txt")).unwrap();

    drift(&dir)
        .arg("scan")
        .arg(&root)
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("--embedded")
        .assert()
        .code(1);
}

#[test]
fn test_clean_scan_reports_no_deletions() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.txt"), "alpha").unwrap();

    drift(&dir)
        .arg("scan")
        .arg(&root)
        .arg("--snapshot")
        .arg(dir.path().join("snap.bin"))
        .arg("--embedded")
        .assert()
        .success()
        .stderr(predicate::str::contains("No deletions found"));
}

#[test]
fn test_no_update_warns_snapshot_unchanged() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.txt"), "alpha").unwrap();

    drift(&dir)
        .arg("scan")
        .arg(&root)
        .arg("--snapshot")
        .arg(dir.path().join("snap.bin"))
        .arg("--no-update")
        .arg("--embedded")
        .assert()
        .success()
        .stderr(predicate::str::contains("Snapshot left unchanged"));
}

#[test]
fn test_missing_root_fails() {
    let dir = TempDir::new().unwrap();

    drift(&dir)
        .arg("scan")
        .arg(dir.path().join("does-not-exist"))
        .arg("--embedded")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_corrupt_snapshot_fails() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir_all(&root).unwrap();
    let snapshot = dir.path().join("snap.bin");
    fs::write(&snapshot, [0xFFu8; 128]).unwrap();

    drift(&dir)
        .arg("scan")
        .arg(&root)
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("--embedded")
        .assert()
        .code(2);
}

#[test]
fn test_show_reports_missing_snapshot() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("nothing.bin");

    drift(&dir)
        .arg("show")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("No snapshot"));
}

#[test]
fn test_show_lists_snapshot_entries() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.txt"), "alpha").unwrap();
    let snapshot = dir.path().join("snap.bin");

    drift(&dir)
        .arg("scan")
        .arg(&root)
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("--embedded")
        .assert()
        .success();

    drift(&dir)
        .arg("show")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"));
}
