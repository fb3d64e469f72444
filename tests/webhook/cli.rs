//! Exit status of the `bridge-webhook-verify` binary.

use super::{fixture_bytes, fixture_path, fixture_text};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the verifier with an empty config file, so no platform config leaks in.
fn run_verify(dir: &TempDir, body: &Path, signature: &str, public_key: &Path, replay: bool) -> Output {
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    let mut command = Command::new(env!("CARGO_BIN_EXE_bridge-webhook-verify"));
    command
        .arg("--config")
        .arg(&config)
        .arg("--body")
        .arg(body)
        .arg("--signature")
        .arg(signature)
        .arg("--public-key")
        .arg(public_key)
        .env_remove("RUST_LOG")
        .env_remove("BRIDGE_WEBHOOK_MAX_AGE_MS")
        .env_remove("BRIDGE_WEBHOOK_MAX_FUTURE_SKEW_MS")
        .env_remove("BRIDGE_WEBHOOK_ALLOW_REPLAY");
    if replay {
        command.arg("--allow-replay");
    }
    command.output().expect("verifier binary should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Valid fixture exits 0 and prints the verdict.
#[test]
fn test_valid_delivery_exits_zero() {
    let dir = TempDir::new().unwrap();
    let output = run_verify(
        &dir,
        &fixture_path("customer_updated.json"),
        &fixture_text("customer_updated.signature"),
        &fixture_path("webhook_test_key.pub.pem"),
        true,
    );

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let stdout = stdout(&output);
    assert!(stdout.starts_with("valid:"), "{stdout}");
    assert!(stdout.contains("customer.updated"), "{stdout}");
}

/// Tampered body exits 1.
#[test]
fn test_tampered_body_exits_one() {
    let dir = TempDir::new().unwrap();
    let mut body = fixture_bytes("hello_world.json");
    body[2] ^= 0x20;
    let body_path = dir.path().join("tampered.json");
    std::fs::write(&body_path, body).unwrap();

    let output = run_verify(
        &dir,
        &body_path,
        &fixture_text("hello_world.signature"),
        &fixture_path("webhook_test_key.pub.pem"),
        true,
    );

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert_eq!(stdout(&output).trim(), "invalid: signature mismatch");
}

/// Replayed fixture without `--allow-replay` is stale and exits 1.
#[test]
fn test_stale_delivery_exits_one() {
    let dir = TempDir::new().unwrap();
    let output = run_verify(
        &dir,
        &fixture_path("hello_world.json"),
        &fixture_text("hello_world.signature"),
        &fixture_path("webhook_test_key.pub.pem"),
        false,
    );

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert!(stdout(&output).starts_with("invalid: stale signature"));
}

/// Signature that is not base64 exits 2.
#[test]
fn test_bad_signature_encoding_exits_two() {
    let dir = TempDir::new().unwrap();
    let output = run_verify(
        &dir,
        &fixture_path("hello_world.json"),
        "t=1705854411204,v0=%%%",
        &fixture_path("webhook_test_key.pub.pem"),
        true,
    );

    assert_eq!(output.status.code(), Some(2), "{output:?}");
    assert!(stdout(&output).starts_with("invalid: decoding error"));
}

/// Public key file that is not PEM exits 2, not 1.
#[test]
fn test_bad_key_file_exits_two() {
    let dir = TempDir::new().unwrap();
    let key_path = dir.path().join("bad.pem");
    std::fs::write(&key_path, "garbage").unwrap();

    let output = run_verify(
        &dir,
        &fixture_path("hello_world.json"),
        &fixture_text("hello_world.signature"),
        &key_path,
        true,
    );

    assert_eq!(output.status.code(), Some(2), "{output:?}");
    assert!(stdout(&output).starts_with("invalid: decoding error"));
}

/// Missing key file is a deployment problem too.
#[test]
fn test_missing_key_file_exits_two() {
    let dir = TempDir::new().unwrap();
    let output = run_verify(
        &dir,
        &fixture_path("hello_world.json"),
        &fixture_text("hello_world.signature"),
        &dir.path().join("absent.pem"),
        true,
    );

    assert_eq!(output.status.code(), Some(2), "{output:?}");
}
