use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn once_prints_countdown_for_default_time() {
    let dir = tempdir().expect("tempdir");
    let storage = dir.path().join("timetocook.json");

    let mut cmd = cargo_bin_cmd!("timetocook");
    cmd.arg("--once")
        .arg("--storage")
        .arg(&storage)
        .arg("--now")
        .arg("2026-01-15T05:00:00")
        .assert()
        .success()
        .stdout(predicate::str::contains("1小时"))
        .stdout(predicate::str::contains("01:00:00"))
        .stdout(predicate::str::contains("Time until breakfast at 上午 6:00"));
}

#[test]
fn exact_breakfast_time_counts_down_a_full_day() {
    let mut cmd = cargo_bin_cmd!("timetocook");
    cmd.args(["--once", "--ephemeral", "--now", "2026-01-15T06:00:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("24:00:00"))
        .stdout(predicate::str::contains("24小时"))
        .stdout(predicate::str::contains("Friday, January 16"));
}

#[test]
fn set_persists_time_for_later_runs() {
    let dir = tempdir().expect("tempdir");
    let storage = dir.path().join("timetocook.json");

    let mut set = cargo_bin_cmd!("timetocook");
    set.arg("--storage")
        .arg(&storage)
        .args(["--set", "07:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("上午 7:30"));

    let saved = fs::read_to_string(&storage).expect("storage written");
    assert!(saved.contains("breakfast-time"));

    let mut once = cargo_bin_cmd!("timetocook");
    once.arg("--storage")
        .arg(&storage)
        .args(["--once", "--now", "2026-01-15T07:00:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00:30:00"))
        .stdout(predicate::str::contains("30分钟"));
}

#[test]
fn corrupt_storage_falls_back_to_default() {
    let dir = tempdir().expect("tempdir");
    let storage = dir.path().join("timetocook.json");
    fs::write(&storage, "{ not-valid-json ").expect("write invalid json");

    let mut cmd = cargo_bin_cmd!("timetocook");
    cmd.arg("--storage")
        .arg(&storage)
        .args(["--once", "--now", "2026-01-15T05:45:10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00:14:50"))
        .stdout(predicate::str::contains("不到30分钟"));
}

#[test]
fn hour_override_is_not_saved() {
    let dir = tempdir().expect("tempdir");
    let storage = dir.path().join("timetocook.json");

    let mut cmd = cargo_bin_cmd!("timetocook");
    cmd.arg("--storage")
        .arg(&storage)
        .args(["--once", "--hour", "8", "--now", "2026-01-15T05:00:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("03:00:00"));

    assert!(!storage.exists());
}

#[test]
fn invalid_set_value_fails_with_clear_error() {
    let mut cmd = cargo_bin_cmd!("timetocook");
    cmd.args(["--ephemeral", "--set", "25:99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid time"));
}

#[test]
fn invalid_now_value_fails_with_clear_error() {
    let mut cmd = cargo_bin_cmd!("timetocook");
    cmd.args(["--ephemeral", "--once", "--now", "breakfast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --now value"));
}

#[test]
fn watch_prints_requested_number_of_snapshots() {
    let mut cmd = cargo_bin_cmd!("timetocook");
    let output = cmd
        .args([
            "--ephemeral",
            "--watch",
            "--ticks",
            "2",
            "--now",
            "2026-01-15T05:00:00",
        ])
        .output()
        .expect("run watch");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.matches("Time to Cook").count(), 2);
    assert!(stdout.contains("01:00:00"));
}
