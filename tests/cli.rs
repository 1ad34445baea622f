use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn winsweep() -> Command {
    let mut cmd = Command::cargo_bin("winsweep").unwrap();
    cmd.env("WINSWEEP_FAST_IO", "1");
    cmd
}

#[test]
fn sweep_without_confirm_is_a_dry_run() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("junk");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.tmp"), "aaaa").unwrap();
    fs::write(root.join("b.tmp"), "bb").unwrap();
    let log_dir = dir.path().join("logs");

    winsweep()
        .arg("sweep")
        .arg("--path")
        .arg(&root)
        .arg("--log-dir")
        .arg(&log_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("dry-run"))
        .stdout(predicate::str::contains("dry run"));

    // Nothing was deleted.
    assert!(root.join("a.tmp").exists());
    assert!(root.join("b.tmp").exists());
}

#[test]
fn sweep_with_confirm_deletes_and_consolidates_logs() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("junk");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.tmp"), "aaaa").unwrap();
    // A sync-engine root inside the swept tree must survive.
    let sync_root = root.join("Users").join("jane").join("OneDrive");
    fs::create_dir_all(&sync_root).unwrap();
    fs::write(sync_root.join("doc.txt"), "keep me").unwrap();
    let log_dir = dir.path().join("logs");

    winsweep()
        .arg("sweep")
        .arg("--path")
        .arg(&root)
        .arg("--log-dir")
        .arg(&log_dir)
        .arg("--confirm")
        .assert()
        .success();

    assert!(!root.join("a.tmp").exists());
    assert!(sync_root.join("doc.txt").exists());

    // Temp log merged away; main log rotated into the archive with a
    // fresh empty file left at the canonical path.
    assert!(!log_dir.join("winsweep-run.log").exists());
    assert!(log_dir.join("winsweep.log").exists());
    let archived = fs::read_dir(log_dir.join("archive"))
        .unwrap()
        .filter_map(|e| e.ok())
        .find(|e| e.file_name().to_string_lossy().starts_with("winsweep-"))
        .expect("archived run log");
    let content = fs::read_to_string(archived.path()).unwrap();
    assert!(content.contains("deleted 1"));
}

#[test]
fn sweep_declines_the_log_directory_itself() {
    let dir = tempdir().unwrap();
    let log_dir = dir.path().join("logs");

    // Sweeping the tree that contains the logs must leave them alone.
    fs::create_dir_all(&log_dir).unwrap();
    fs::write(dir.path().join("loose.tmp"), "x").unwrap();

    winsweep()
        .arg("sweep")
        .arg("--path")
        .arg(dir.path())
        .arg("--log-dir")
        .arg(&log_dir)
        .arg("--confirm")
        .assert()
        .success();

    assert!(!dir.path().join("loose.tmp").exists());
    assert!(log_dir.join("winsweep.log").exists());
}

#[test]
fn estimate_reports_without_touching_anything() {
    winsweep()
        .arg("estimate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated reclaimable space"))
        .stdout(predicate::str::contains("unpruned totals"));
}

#[test]
fn unknown_category_is_an_error() {
    winsweep()
        .arg("clean")
        .arg("--category")
        .arg("no-such-thing")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("unknown category"));
}

#[test]
fn clean_respects_category_selection_and_dry_run() {
    let dir = tempdir().unwrap();
    let log_dir = dir.path().join("logs");

    winsweep()
        .arg("clean")
        .arg("--category")
        .arg("windows-update")
        .arg("--log-dir")
        .arg(&log_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No --confirm flag provided"));

    // The run consolidated its log even though the root was absent.
    assert!(log_dir.join("winsweep.log").exists());
}
