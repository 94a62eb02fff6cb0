// Integration tests for daily rotation and retention of both file streams

mod common;

use chrono::{TimeZone, Utc};
use common::{read_records, ManualClock, MemoryWriter};
use std::fs;
use tempfile::TempDir;
use teelog::{field, LogConfig, Logger};

fn config_in(dir: &std::path::Path) -> LogConfig {
    LogConfig {
        log_dir: dir.to_path_buf(),
        console_color: false,
        ..LogConfig::default()
    }
}

#[test]
fn test_both_streams_rotate_at_midnight() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::at(Utc.with_ymd_and_hms(2026, 10, 18, 23, 59, 30).unwrap());
    // Long retention so the fixed clock never expires files written in real time
    let config = LogConfig {
        retention_secs: 3650 * 86_400,
        ..config_in(temp_dir.path())
    };
    let logger =
        Logger::from_config_with_clock(&config, MemoryWriter::new(), clock.clone()).unwrap();

    logger.info("late", &[field("day", 18)]);
    logger.error("late failure", &[]);
    clock.advance(chrono::Duration::minutes(1));
    logger.info("early", &[field("day", 19)]);
    logger.error("early failure", &[]);
    logger.sync();

    let dir = temp_dir.path();
    for name in [
        "demo.20261018.log",
        "demo.20261019.log",
        "demo_error.20261018.log",
        "demo_error.20261019.log",
    ] {
        let content = fs::read_to_string(dir.join(name)).unwrap();
        assert_eq!(content.lines().count(), 1, "{} should hold one record", name);
    }

    let info = read_records(dir, "demo");
    assert_eq!(info[0]["msg"], "late");
    assert_eq!(info[1]["msg"], "early");
    assert_eq!(info[1]["ts"], "2026-10-19T00:00:30.000000+00:00");
}

#[test]
fn test_no_latest_symlink() {
    let temp_dir = TempDir::new().unwrap();
    let logger = Logger::from_config_with_console(
        &config_in(temp_dir.path()),
        MemoryWriter::new(),
    )
    .unwrap();
    logger.info("x", &[]);

    let names: Vec<String> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| n.ends_with(".log")));
    assert!(!temp_dir.path().join("demo").exists());
}

#[test]
fn test_retention_removes_old_files_on_rotation() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    // Clock well past the real modification time of anything created here
    let clock = ManualClock::at(Utc::now() + chrono::Duration::days(30));
    let logger =
        Logger::from_config_with_clock(&config_in(dir), MemoryWriter::new(), clock.clone())
            .unwrap();
    logger.info("day one", &[]);
    let first_day: Vec<_> = fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect();

    // A rotation 8 days later is past the 7 day retention
    clock.advance(chrono::Duration::days(8));
    logger.info("day nine", &[]);
    logger.warn("day nine warning", &[]);

    for path in first_day {
        assert!(!path.exists(), "{} should have expired", path.display());
    }
    let info = read_records(dir, "demo");
    assert_eq!(info.len(), 1);
    assert_eq!(info[0]["msg"], "day nine");
}

#[test]
fn test_recent_files_survive_rotation() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    // Clock close to real time, so yesterday's file is younger than retention
    let clock = ManualClock::at(Utc::now());
    let logger =
        Logger::from_config_with_clock(&config_in(dir), MemoryWriter::new(), clock.clone())
            .unwrap();
    logger.info("today", &[]);
    clock.advance(chrono::Duration::days(1));
    logger.info("tomorrow", &[]);

    let info = read_records(dir, "demo");
    assert_eq!(info.len(), 2);
}
