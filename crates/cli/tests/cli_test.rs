//! # CLI Binary Tests
//!
//! Runs the `climate-qa` binary end to end for the commands that need no
//! generator backend.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_classify_command_off_domain() {
    // Arrange
    let temp_dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("climate-qa").unwrap();

    // Act & Assert
    cmd.current_dir(temp_dir.path())
        .env_remove("CONFIG_PATH")
        .env_remove("GENERATOR_PROVIDER")
        .arg("classify")
        .arg("How do I cook pasta?")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strategy:     off_domain_reject"))
        .stdout(predicate::str::contains("Off-domain:   Food (cook, pasta)"));
}

#[test]
fn test_classify_command_greeting() {
    // Arrange
    let temp_dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("climate-qa").unwrap();

    // Act & Assert
    cmd.current_dir(temp_dir.path())
        .env_remove("CONFIG_PATH")
        .env_remove("GENERATOR_PROVIDER")
        .args(["classify", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Strategy:     greeting"))
        .stdout(predicate::str::contains("Greeting:     yes"));
}

#[test]
fn test_classify_uses_configured_lexicon_and_bridge_setting() {
    // Arrange
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.yml");
    std::fs::write(
        &config_path,
        "science_bridge: false\ngenerator:\n  provider: \"local\"\n  api_url: \"http://localhost:1/v1/chat/completions\"\n",
    )
    .unwrap();
    let mut cmd = Command::cargo_bin("climate-qa").unwrap();

    // Act & Assert
    cmd.current_dir(temp_dir.path())
        .args(["classify", "Can you tell me about the water cycle?"])
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Strategy:     low_confidence_redirect"));
}

#[test]
fn test_missing_config_file_fails() {
    // Arrange
    let temp_dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("climate-qa").unwrap();

    // Act & Assert
    cmd.current_dir(temp_dir.path())
        .args(["ask", "What is global warming?", "--config", "missing.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ask failed"));
}

#[test]
fn test_ask_requires_question() {
    // Arrange
    let temp_dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("climate-qa").unwrap();

    // Act & Assert
    cmd.current_dir(temp_dir.path())
        .arg("ask")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<QUESTION>"));
}
