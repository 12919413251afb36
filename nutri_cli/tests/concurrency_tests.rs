//! Concurrency tests for the nutri binary.
//!
//! These tests verify that multiple processes can safely:
//! - Append to the history and diary files simultaneously (file locking)
//! - Update the profile without leaving it corrupt

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nutri").expect("Failed to find nutri binary");
    cmd.arg("--data-dir")
        .arg(data_dir)
        .arg("--config")
        .arg(data_dir.join("no-such-config.toml"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn assert_valid_jsonl(path: &PathBuf, expected: usize) {
    let content = std::fs::read_to_string(path).expect("Failed to read JSONL file");

    let mut valid_count = 0;
    for line in content.lines() {
        if line.is_empty() {
            continue;
        }
        let parsed: Result<serde_json::Value, _> = serde_json::from_str(line);
        assert!(parsed.is_ok(), "File contains invalid JSON line: {}", line);
        valid_count += 1;
    }

    assert_eq!(valid_count, expected, "Expected {} valid records", expected);
}

#[test]
fn test_no_history_corruption_under_load() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..10u64)
        .map(|i| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                // Small stagger to reduce thundering herd
                thread::sleep(Duration::from_millis(i * 5));
                let weight = (60 + i).to_string();
                cli(&data_dir)
                    .arg("macros")
                    .args(["--weight", weight.as_str(), "--height", "170", "--age", "40"])
                    .args(["--sex", "female", "--activity", "light", "--save"])
                    .timeout(Duration::from_secs(10))
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_valid_jsonl(&data_dir.join("history.jsonl"), 10);

    let profile = std::fs::read_to_string(data_dir.join("profile.json")).unwrap();
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(&profile);
    assert!(parsed.is_ok(), "Profile contains invalid JSON");
}

#[test]
fn test_concurrent_diary_logging() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..8u64)
        .map(|i| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(i * 3));
                cli(&data_dir)
                    .args(["log", "ingredient", "banana", "--grams", "100"])
                    .args(["--date", "2024-06-01"])
                    .timeout(Duration::from_secs(10))
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_valid_jsonl(&data_dir.join("diary.jsonl"), 8);

    // 8 x 89 kcal
    cli(&data_dir)
        .args(["today", "--date", "2024-06-01"])
        .assert()
        .success()
        .stdout(predicates::str::contains("712 kcal"));
}

#[test]
fn test_export_while_writing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    for _ in 0..3 {
        cli(&data_dir)
            .arg("macros")
            .args(["--weight", "80", "--height", "180", "--age", "25"])
            .args(["--sex", "male", "--activity", "active", "--save"])
            .assert()
            .success();
    }

    let data_dir_export = data_dir.clone();
    let export_handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        cli(&data_dir_export).arg("export").assert().success();
    });

    for _ in 0..2 {
        cli(&data_dir)
            .args(["macros", "--goal", "gain", "--save"])
            .assert()
            .success();
        thread::sleep(Duration::from_millis(5));
    }

    export_handle.join().expect("Export thread panicked");

    let csv = std::fs::read_to_string(data_dir.join("calculations.csv")).unwrap();
    assert!(csv.lines().count() >= 4, "expected header plus at least 3 rows");
    assert_valid_jsonl(&data_dir.join("history.jsonl"), 5);
}

#[test]
fn test_concurrent_save_recipe_keeps_all() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let recipes = [
        "chicken-rice-bowl",
        "salmon-sweet-potato",
        "overnight-oats",
        "veggie-omelette",
        "beef-pasta",
        "tofu-stir-fry",
    ];

    let handles: Vec<_> = recipes
        .iter()
        .map(|&id| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                cli(&data_dir)
                    .args(["save-recipe", id])
                    .timeout(Duration::from_secs(10))
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let profile = std::fs::read_to_string(data_dir.join("profile.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&profile).unwrap();
    let saved = parsed["saved_recipes"].as_array().unwrap();
    assert_eq!(saved.len(), recipes.len());
}
