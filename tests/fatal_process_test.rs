// Integration tests that run the teelog binary, for behavior that ends the process

mod common;

use common::read_records;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn teelog() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_teelog"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_fatal_is_written_before_exit() {
    let temp_dir = TempDir::new().unwrap();

    let output = teelog()
        .arg("--log-dir")
        .arg(temp_dir.path())
        .args(["fatal", "-m", "unrecoverable", "-f", "code=7"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let warn = read_records(temp_dir.path(), "demo_error");
    assert_eq!(warn.len(), 1);
    assert_eq!(warn[0]["level"], "FATAL");
    assert_eq!(warn[0]["msg"], "unrecoverable");
    assert_eq!(warn[0]["code"], 7);
    assert!(read_records(temp_dir.path(), "demo").is_empty());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FATAL"));
    assert!(stdout.contains("unrecoverable"));
}

#[test]
fn test_startup_failure_exits_before_work() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, b"x").unwrap();

    let output = teelog()
        .arg("--log-dir")
        .arg(&blocker)
        .args(["emit", "-m", "never written"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("✗ Error:"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("never written"));
}

#[test]
fn test_emit_routes_by_level() {
    let temp_dir = TempDir::new().unwrap();

    let status = teelog()
        .arg("--log-dir")
        .arg(temp_dir.path())
        .args(["emit", "-l", "info", "-m", "server started", "-f", "port=8080"])
        .status()
        .unwrap();
    assert!(status.success());

    let status = teelog()
        .arg("--log-dir")
        .arg(temp_dir.path())
        .args(["emit", "-l", "error", "-m", "db connect failed", "-f", "attempt=3"])
        .status()
        .unwrap();
    assert!(status.success());

    let info = read_records(temp_dir.path(), "demo");
    let warn = read_records(temp_dir.path(), "demo_error");
    assert_eq!(info.len(), 1);
    assert_eq!(info[0]["port"], 8080);
    assert_eq!(warn.len(), 1);
    assert_eq!(warn[0]["attempt"], 3);
}

#[test]
fn test_demo_exercises_every_path() {
    let temp_dir = TempDir::new().unwrap();

    let output = teelog()
        .env("RUST_LOG", "info")
        .arg("--log-dir")
        .arg(temp_dir.path())
        .arg("demo")
        .output()
        .unwrap();
    assert!(output.status.success());

    let info = read_records(temp_dir.path(), "demo");
    let warn = read_records(temp_dir.path(), "demo_error");
    let info_msgs: Vec<_> = info.iter().map(|r| r["msg"].as_str().unwrap()).collect();
    let warn_levels: Vec<_> = warn.iter().map(|r| r["level"].as_str().unwrap()).collect();

    assert!(info_msgs.contains(&"server started"));
    assert!(info_msgs.contains(&"recovered from panic signal"));
    assert!(info_msgs.contains(&"demo finished"));
    assert_eq!(warn_levels, vec!["WARN", "ERROR", "DPANIC", "PANIC"]);
    assert!(warn.iter().all(|r| r["component"] == "demo"));
}
