//! Draft and routine workflows for the liftlog binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("liftlog"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_draft_survives_between_runs_and_submits() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["draft", "set", "--exercise", " Bench  Press ", "--date", "2024-06-01"])
        .arg("--set")
        .arg("5x100")
        .arg("--copy-last")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    assert!(data_dir.join("client").join("gym-tracker-draft-v1.json").exists());

    cli()
        .args(["draft", "show"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise: Bench Press"))
        .stdout(predicate::str::contains("Date:     2024-06-01"))
        .stdout(predicate::str::contains("1. 5 x 100"))
        .stdout(predicate::str::contains("2. 5 x 100"));

    cli()
        .args(["draft", "submit"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft logged"))
        .stdout(predicate::str::contains("Est. 1RM: 116.67 kg"));

    // Submitting clears the draft
    cli()
        .args(["draft", "show"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise: (none)"));
}

#[test]
fn test_invalid_draft_is_kept() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["draft", "set", "--exercise", "Squat", "--set", "0x100"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .args(["draft", "submit"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "set 1: reps must be an integer between 1 and 200",
        ));

    cli()
        .args(["draft", "show"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise: Squat"));

    cli()
        .args(["draft", "clear"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .args(["draft", "show"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise: (none)"));
}

#[test]
fn test_draft_rejects_bad_date() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["draft", "set", "--exercise", "Squat", "--date", "2024-06-01", "--set", "5x100"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .args(["draft", "set", "--date", "06/01/2024"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "workoutDate must be in YYYY-MM-DD format",
        ));

    cli()
        .args(["draft", "set", "--date", "2024-02-30"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("workoutDate is invalid"));

    // The saved draft keeps its valid date and submits under it
    cli()
        .args(["draft", "submit"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Squat on 2024-06-01"));
}

#[test]
fn test_malformed_draft_file_ignored() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let client_dir = data_dir.join("client");
    fs::create_dir_all(&client_dir).unwrap();
    fs::write(client_dir.join("gym-tracker-draft-v1.json"), "{ not json").unwrap();

    cli()
        .args(["draft", "show"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise: (none)"));
}

#[test]
fn test_routine_lifecycle() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["routine", "list"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No routines saved yet."));

    cli()
        .args(["routine", "add", "Push Day", "Bench Press", "  Overhead   Press "])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved routine Push Day"));

    cli()
        .args(["log", "--exercise", "bench press", "--date", "2024-06-01", "--set", "5x100"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .args(["routine", "show", "push day"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1. Bench Press  last 5 reps @ 100 kg on 2024-06-01",
        ))
        .stdout(predicate::str::contains("2. Overhead Press  not logged yet"));

    cli()
        .args(["routine", "list"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Push Day (Bench Press, Overhead Press)",
        ));

    cli()
        .args(["routine", "remove", "PUSH DAY"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .args(["routine", "show", "Push Day"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No routine named Push Day"));
}

#[test]
fn test_routine_requires_name() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["routine", "add", "   ", "Squat"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("routine name is required"));
}
