#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the segmenter-server binary
//!
//! These run the built binary and check config validation, help output and
//! server startup.

use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

const SEGMENTER_ENV: [&str; 4] = [
    "SEGMENTER_CHUNK_SIZE",
    "SEGMENTER_DESTINATION_ADDRESS",
    "SEGMENTER_LISTEN_ADDRESS",
    "SEGMENTER_LOGGING__LEVEL",
];

fn server_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_segmenter-server"));
    for key in SEGMENTER_ENV {
        cmd.env_remove(key);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Helper to run the segmenter-server binary with given arguments
fn run_segmenter_server(args: &[&str]) -> std::process::Output {
    server_command()
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute segmenter-server")
}

fn write_config(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_str().unwrap().to_owned()
}

#[test]
fn test_cli_help_command() {
    let output = run_segmenter_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("segmenter-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let output = run_segmenter_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("segmenter-server"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_segmenter_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the error: {stderr}");
}

#[test]
fn test_cli_missing_config_file() {
    let output = run_segmenter_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail when config file doesn't exist");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Should indicate config file not found: {stderr}"
    );
}

#[test]
fn test_cli_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "invalid.yaml", "invalid: yaml: content: [unclosed");

    let output = run_segmenter_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("configuration") || stderr.contains("YAML"),
        "Should mention the config problem: {stderr}"
    );
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "valid.yaml",
        r"
listen_address: 127.0.0.1:0
chunk_size: 120
destination_address: localhost:8000/api/delivery/
logging:
  level: warn
",
    );

    let output = run_segmenter_server(&["--config", &config_path, "check"]);

    if !output.status.success() {
        eprintln!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(output.status.success(), "Should succeed with valid config");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains("chunk_size: 120"));
}

#[test]
fn test_cli_check_rejects_zero_chunk_size() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "zero.yaml",
        "chunk_size: 0\ndestination_address: localhost:8000\n",
    );

    let output = run_segmenter_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success(), "Zero chunk size must be fatal");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("chunk_size"), "Should name the bad key: {stderr}");
}

#[test]
fn test_cli_check_requires_destination() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "nodest.yaml", "chunk_size: 4\n");

    let output = run_segmenter_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("destination_address"), "{stderr}");
}

#[test]
fn test_cli_env_supplies_required_keys() {
    let output = server_command()
        .env("SEGMENTER_CHUNK_SIZE", "16")
        .env("SEGMENTER_DESTINATION_ADDRESS", "https://receiver.example.com/in")
        .args(["check"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute segmenter-server");

    assert!(
        output.status.success(),
        "STDERR: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("chunk_size: 16"));
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let output = run_segmenter_server(&["--port", "9191", "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Effective configuration:"));
    assert!(stdout.contains("0.0.0.0:9191"));
}

#[test]
fn test_cli_run_rejects_bad_listen_address() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "badaddr.yaml",
        "listen_address: nowhere\nchunk_size: 4\ndestination_address: localhost:8000\n",
    );

    let output = run_segmenter_server(&["--config", &config_path, "run"]);

    assert!(!output.status.success(), "Should fail with invalid listen address");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("listen_address"), "{stderr}");
}

#[tokio::test]
async fn test_cli_run_keeps_serving_until_stopped() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "run.yaml",
        "listen_address: 127.0.0.1:0\nchunk_size: 4\ndestination_address: localhost:8000\n",
    );

    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_segmenter-server"));
    for key in SEGMENTER_ENV {
        cmd.env_remove(key);
    }
    cmd.args(["--config", &config_path, "run"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().expect("Failed to spawn segmenter-server");

    // A healthy server never exits on its own
    let result = timeout(Duration::from_secs(2), child.wait_with_output()).await;
    assert!(result.is_err(), "server exited early: {result:?}");
}
