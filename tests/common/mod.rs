// Shared helpers for integration tests

#![allow(dead_code, unused_imports)]

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use teelog::logs::{glob_matches, Clock};

pub use teelog::logs::MemoryWriter;

/// Destination whose writes always fail
pub struct UnwritableDestination;

impl Write for UnwritableDestination {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission revoked"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Clock that only moves when told to
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn at(ts: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(ts)))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Every JSON record in files named `<base>.*.log` under `dir`, file by file in name order
pub fn read_records(dir: &Path, base: &str) -> Vec<Value> {
    let glob = format!("{}.*.log", base);
    let mut paths: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| glob_matches(&glob, n))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    paths
        .iter()
        .flat_map(|p| {
            fs::read_to_string(p)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str::<Value>(l).unwrap())
                .collect::<Vec<_>>()
        })
        .collect()
}
