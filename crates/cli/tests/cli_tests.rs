//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "nutrition-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Pet Nutrition Predictor"),
        "Should show app name"
    );
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(
        stdout.contains("engine-info"),
        "Should show engine-info command"
    );
    assert!(stdout.contains("encode"), "Should show encode command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "nutrition-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("pnp"), "Should show binary name");
}

/// Test predict subcommand help
#[test]
fn test_predict_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "nutrition-cli", "--", "predict", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict help should succeed");
    assert!(stdout.contains("--input"), "Should show input option");
    assert!(stdout.contains("--pet-ref"), "Should show pet-ref option");
}

/// Test encode subcommand help
#[test]
fn test_encode_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "nutrition-cli", "--", "encode", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Encode help should succeed");
    assert!(stdout.contains("--input"), "Should show input option");
}

/// Test format option
#[test]
fn test_format_option() {
    let output = Command::new("cargo")
        .args(["run", "-p", "nutrition-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("table"), "Should show table format");
    assert!(stdout.contains("json"), "Should show json format");
}

/// Test a full prediction against a profile on disk
#[test]
fn test_predict_json_output() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let path = dir.path().join("profile.json");
    std::fs::write(
        &path,
        r#"{"species": "dog", "weight_kg": 29.0, "age_years": 6.0, "health_goal": "weight_loss"}"#,
    )
    .expect("write profile");

    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "nutrition-cli",
            "--",
            "--format",
            "json",
            "predict",
            "--input",
        ])
        .arg(&path)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict should succeed: {}", stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    assert_eq!(json["diet_style"], "weight_loss");
    assert!(json["calories_per_day"].as_u64().unwrap() > 0);
}

/// Test encode against a minimal profile
#[test]
fn test_encode_json_output() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let path = dir.path().join("profile.json");
    std::fs::write(&path, r#"{"species": "cat"}"#).expect("write profile");

    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "nutrition-cli",
            "--",
            "--format",
            "json",
            "encode",
            "--input",
        ])
        .arg(&path)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Encode should succeed: {}", stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    assert_eq!(json["encoder_version"], "enc-v1");
    assert!(!json["values"].as_array().unwrap().is_empty());
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = Command::new("cargo")
        .args(["run", "-p", "nutrition-cli", "--", "invalid-command"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}

/// Test missing required argument error handling
#[test]
fn test_missing_argument() {
    let output = Command::new("cargo")
        .args(["run", "-p", "nutrition-cli", "--", "predict"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Missing argument should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}
