use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::{tempdir, TempDir};

fn fixture_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures/data")
        .canonicalize()
        .expect("fixture datasets present")
}

/// Command wired to the fixture datasets and a throwaway config directory.
fn prepare_command() -> (Command, TempDir) {
    let config = tempdir().expect("create config dir");
    let mut cmd = cargo_bin_cmd!("encyclopedia");
    cmd.env("ENCYCLOPEDIA_CONFIG_DIR", config.path())
        .env_remove("ENCYCLOPEDIA_DATA_URL")
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "error")
        .arg("--data-dir")
        .arg(fixture_data_dir());
    (cmd, config)
}

#[test]
fn item_card_renders_ship_sections() {
    let (mut cmd, _config) = prepare_command();
    cmd.args(["item", "Rifter"]);

    cmd.assert()
        .success()
        .stdout(contains("Rifter (#587)"))
        .stdout(contains("A fast Minmatar frigate."))
        .stdout(contains("Built by"))
        .stdout(contains("Rifter Blueprint (#691)"))
        .stdout(contains("Minmatar Frigate bonus per level"))
        .stdout(contains("Small Projectile Turret Damage +5.00%"))
        .stdout(contains("Role bonus"))
        .stdout(contains("Maximum Velocity -50.00%"))
        .stdout(contains("EM 25.0%"));
}

#[test]
fn item_card_as_json() {
    let (mut cmd, _config) = prepare_command();
    cmd.args(["--format", "json", "item", "1001"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let card: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(card["id"], 1001);
    assert_eq!(card["weapon"]["dps"], 15.0);
    assert_eq!(card["classification"]["weapon"], true);
}

#[test]
fn unknown_item_suggests_names() {
    let (mut cmd, _config) = prepare_command();
    cmd.args(["item", "Riftr"]);

    cmd.assert()
        .failure()
        .stderr(contains("unknown item: Riftr"))
        .stderr(contains("Did you mean"));
}

#[test]
fn incomplete_blueprint_card_still_renders() {
    let (mut cmd, _config) = prepare_command();
    cmd.args(["item", "Prototype Blueprint"]);

    cmd.assert()
        .success()
        .stdout(contains("Prototype Blueprint (#1201)"))
        .stdout(contains("Manufacturing data for this blueprint is incomplete."));
}

#[test]
fn search_hides_test_groups_by_default() {
    let (mut cmd, _config) = prepare_command();
    cmd.args(["search", "autocannon"]);
    cmd.assert()
        .success()
        .stdout(contains("125mm Autocannon"))
        .stdout(contains("125mm Autocannon Blueprint"))
        .stdout(contains("Calibration Rig").not());

    let (mut cmd, _config) = prepare_command();
    cmd.args(["search", "autocannon", "--include-test"]);
    cmd.assert()
        .success()
        .stdout(contains("Autocannon Calibration Rig"));
}

#[test]
fn short_search_matches_nothing() {
    let (mut cmd, _config) = prepare_command();
    cmd.args(["search", "ri"]);
    cmd.assert().success().stdout(contains("No matching items."));
}

#[test]
fn export_writes_csv_to_stdout() {
    let (mut cmd, _config) = prepare_command();
    cmd.args(["export", "691", "1101", "691"]);

    cmd.assert().success().stdout(
        "Blueprint,ISK,Pyerite,Tritanium\n\
         Rifter Blueprint,1500,0,10\n\
         125mm Autocannon Blueprint,200,5,0\n",
    );
}

#[test]
fn export_writes_timestamped_file() {
    let (mut cmd, _config) = prepare_command();
    let out = tempdir().expect("output dir");
    cmd.args(["export", "1101", "--sheet-format", "tsv", "--output-dir"])
        .arg(out.path());

    cmd.assert().success().stdout(contains("blueprints-"));

    let files: Vec<_> = fs::read_dir(out.path())
        .expect("read output dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    assert_eq!(files.len(), 1);
    let contents = fs::read_to_string(&files[0]).expect("read sheet");
    assert_eq!(
        contents,
        "Blueprint\tISK\tPyerite\n125mm Autocannon Blueprint\t200\t5\n"
    );
}

#[test]
fn export_rejects_non_blueprints_and_missing_records() {
    let (mut cmd, _config) = prepare_command();
    cmd.args(["export", "587"]);
    cmd.assert().failure().stderr(contains("is not a blueprint"));

    let (mut cmd, _config) = prepare_command();
    cmd.args(["export", "691", "1201"]);
    cmd.assert()
        .failure()
        .stderr(contains("no manufacture data for blueprint 1201"));
}

#[test]
fn export_rejects_unknown_sheet_format() {
    let (mut cmd, _config) = prepare_command();
    cmd.args(["export", "691", "--sheet-format", "xlsx"]);
    cmd.assert().failure().stderr(contains("unsupported sheet format"));
}

#[test]
fn saved_training_rate_applies_to_cards() {
    let (mut cmd, config) = prepare_command();
    cmd.args(["settings", "set", "--training-rate", "60"]);
    cmd.assert().success().stdout(contains("60 SP/min"));
    assert!(config.path().join("settings.json").is_file());

    let mut cmd = cargo_bin_cmd!("encyclopedia");
    cmd.env("ENCYCLOPEDIA_CONFIG_DIR", config.path())
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "error")
        .arg("--data-dir")
        .arg(fixture_data_dir())
        .args(["item", "Gunnery"]);
    cmd.assert()
        .success()
        .stdout(contains("Training at 60 SP/min"))
        .stdout(contains("0:00:04:10"))
        .stdout(contains("Level 1: Small Projectile Turret Damage +2.00 %"));
}

#[test]
fn invalid_training_rate_is_not_saved() {
    let (mut cmd, config) = prepare_command();
    cmd.args(["settings", "set", "--training-rate", "0"]);
    cmd.assert()
        .failure()
        .stderr(contains("training rate must be a finite positive number"));
    assert!(!config.path().join("settings.json").exists());
}

#[test]
fn unknown_language_falls_back_to_keys() {
    let (mut cmd, _config) = prepare_command();
    cmd.args(["--lang", "xx", "item", "587"]);
    cmd.assert().success().stdout(contains("item_587_name (#587)"));
}

#[test]
fn missing_data_dir_is_reported() {
    let config = tempdir().expect("config dir");
    let empty = tempdir().expect("tempdir");
    let mut cmd = cargo_bin_cmd!("encyclopedia");
    cmd.env("ENCYCLOPEDIA_CONFIG_DIR", config.path())
        .env("RUST_LOG", "error")
        .arg("--data-dir")
        .arg(empty.path().join("missing"))
        .args(["item", "587"]);
    cmd.assert()
        .failure()
        .stderr(contains("failed to locate the item datasets"));
}
