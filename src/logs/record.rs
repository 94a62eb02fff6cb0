use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;

use super::{Field, Level};

/// Timestamp layout shared by all encoders: UTC, microseconds, explicit offset
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// Source location of the code that emitted a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of whoever called the `#[track_caller]` chain this runs in
    #[track_caller]
    pub fn here() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }

    /// Last directory and file name, e.g. `logs/mod.rs:12`
    pub fn short(&self) -> String {
        let normalized = self.file.replace('\\', "/");
        let mut parts = normalized.rsplitn(3, '/');
        let file = parts.next().unwrap_or_default();
        let short = match parts.next() {
            Some(dir) => format!("{}/{}", dir, file),
            None => file.to_string(),
        };
        format!("{}:{}", short, self.line)
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

/// A single emitted log record
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub ts: DateTime<Utc>,
    pub level: Level,
    pub message: &'a str,
    pub caller: Caller,
    /// Context fields inherited from `Logger::with`
    pub context: &'a [Field],
    pub fields: &'a [Field],
}

impl Record<'_> {
    pub fn formatted_ts(&self) -> String {
        self.ts.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Context fields followed by call-site fields
    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.context.iter().chain(self.fields.iter())
    }
}
