#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn servicegen() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_servicegen"));
    command.env("SERVICEGEN_LOG_LEVEL", "error");
    command
}

#[test]
fn test_cli_generate_creates_package() {
    let dir = TempDir::new().unwrap();
    let output = servicegen()
        .arg("generate")
        .arg("--manifest")
        .arg(fixture("s3.yaml"))
        .arg("--output")
        .arg(dir.path())
        .arg("--setup")
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("s3: wrote 18 file(s)"));
    let package = dir.path().join("stubs_s3_package");
    assert!(package.join("setup.py").exists());
    assert!(package.join("stubs_s3").join("type_defs.pyi").exists());
}

#[test]
fn test_cli_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = servicegen()
        .arg("generate")
        .arg("--manifest")
        .arg(fixture("s3.yaml"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .arg("--dry-run")
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("s3: would write 16 file(s)"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_cli_failing_service_sets_exit_code() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.yaml");
    fs::write(&broken, "service: [not, a, mapping]\n").unwrap();

    let output = servicegen()
        .arg("generate")
        .arg("--manifest")
        .arg(fixture("s3.yaml"))
        .arg("--manifest")
        .arg(&broken)
        .arg("--output")
        .arg(dir.path().join("out"))
        .output()
        .expect("run cli");
    assert!(!output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("s3: wrote 16 file(s)"));
    assert!(stdout.contains("broken.yaml: failed: Failed to parse manifest"));
    assert!(dir.path().join("out/stubs_s3/client.pyi").exists());
}

#[test]
fn test_cli_explicit_config_is_applied() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "generate_setup = true\nthreads = 1\n").unwrap();

    let status = servicegen()
        .arg("generate")
        .arg("--manifest")
        .arg(fixture("s3.yaml"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .arg("--config")
        .arg(&config)
        .status()
        .expect("run cli");
    assert!(status.success());
    assert!(dir.path().join("out/stubs_s3_package/setup.py").exists());
}

#[test]
fn test_cli_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    let output = servicegen()
        .arg("generate")
        .arg("--manifest")
        .arg(fixture("s3.yaml"))
        .arg("--output")
        .arg(dir.path())
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Generator config not found"));
}

#[test]
fn test_cli_inspect() {
    let output = servicegen()
        .arg("inspect")
        .arg("--manifest")
        .arg(fixture("s3.yaml"))
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("s3 (S3) -> stubs_s3\ntype definitions: 4\n"));
    assert!(stdout.contains("  RuleTypeDef (forward reference)\n"));
    assert!(stdout.contains("paginator.pyi:\n"));
    assert!(stdout.contains("  from stubs_s3.type_defs import ListObjectsOutputTypeDef\n"));
}
