use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use super::clock::{Clock, SystemClock};
use super::retention::{cleanup_expired, pattern_to_glob};
use crate::error::{LogError, Result};

/// Default strftime suffix appended to a file's base name
pub const DEFAULT_FILE_PATTERN: &str = ".%Y%m%d.log";

/// Default rotation interval (24 hours)
pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default retention window (7 days)
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// When a rotating file switches over and how long old files live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// strftime suffix appended to the base name
    pub pattern: String,
    pub rotation_interval: Duration,
    pub retention: Duration,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_FILE_PATTERN.to_string(),
            rotation_interval: DEFAULT_ROTATION_INTERVAL,
            retention: DEFAULT_RETENTION,
        }
    }
}

/// Check that a strftime pattern has at least one valid specifier and no bad ones
pub fn validate_pattern(pattern: &str) -> Result<()> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(LogError::ConfigValidationError(format!(
            "invalid strftime pattern: {}",
            pattern
        )));
    }
    if !items
        .iter()
        .any(|item| matches!(item, Item::Numeric(..) | Item::Fixed(_)))
    {
        return Err(LogError::ConfigValidationError(format!(
            "file pattern must contain a date specifier: {}",
            pattern
        )));
    }
    Ok(())
}

/// A file destination that switches to a new, date-named file every
/// rotation interval and deletes files older than the retention window.
///
/// Periods are aligned to multiples of the interval since the Unix epoch,
/// so a 24 hour interval rotates at UTC midnight.
pub struct RotatingFile {
    dir: PathBuf,
    base: String,
    policy: RotationPolicy,
    glob: String,
    clock: Arc<dyn Clock>,
    period_start: i64,
    current_path: PathBuf,
    file: File,
}

impl RotatingFile {
    /// Open the file for the current period under `dir`
    ///
    /// # Returns
    /// * `Ok(RotatingFile)` - The current file is open for appending
    /// * `Err(LogError)` - The directory or file could not be created
    pub fn open(dir: impl AsRef<Path>, base: &str, policy: RotationPolicy) -> Result<Self> {
        Self::open_with_clock(dir, base, policy, Arc::new(SystemClock))
    }

    pub fn open_with_clock(
        dir: impl AsRef<Path>,
        base: &str,
        policy: RotationPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if policy.rotation_interval.as_secs() == 0 {
            return Err(LogError::ConfigValidationError(
                "rotation interval must be at least one second".to_string(),
            ));
        }
        validate_pattern(&policy.pattern)?;

        fs::create_dir_all(&dir).map_err(|e| {
            LogError::LogFileError(format!(
                "Failed to create log directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let now = clock.now();
        let period_start = period_start(now, policy.rotation_interval);
        let current_path = file_path(&dir, base, &policy.pattern, period_start)?;
        let file = open_append(&current_path).map_err(|e| {
            LogError::LogFileError(format!("{}: {}", current_path.display(), e))
        })?;

        let glob = pattern_to_glob(&format!("{}{}", base, policy.pattern));
        let rotating = Self {
            dir,
            base: base.to_string(),
            policy,
            glob,
            clock,
            period_start,
            current_path,
            file,
        };
        let _ = rotating.remove_expired(now);
        Ok(rotating)
    }

    /// Path of the file currently being written
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Switch files if the clock has moved into a new period
    fn rotate_if_needed(&mut self) -> Result<()> {
        let now = self.clock.now();
        let start = period_start(now, self.policy.rotation_interval);
        if start == self.period_start {
            return Ok(());
        }

        let path = file_path(&self.dir, &self.base, &self.policy.pattern, start)?;
        let file = open_append(&path).map_err(|e| {
            LogError::LogRotationError(format!("{}: {}", path.display(), e))
        })?;

        self.file = file;
        self.current_path = path;
        self.period_start = start;
        let _ = self.remove_expired(now);
        Ok(())
    }

    fn remove_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let now: SystemTime = now.into();
        let cutoff = now
            .checked_sub(self.policy.retention)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        cleanup_expired(&self.dir, &self.glob, cutoff, &self.current_path)
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // The old handle stays in place if the next one can't be opened
        self.rotate_if_needed().map_err(io::Error::other)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("current_path", &self.current_path)
            .field("policy", &self.policy)
            .finish()
    }
}

fn period_start(now: DateTime<Utc>, interval: Duration) -> i64 {
    let secs = now.timestamp();
    let interval = i64::try_from(interval.as_secs().max(1)).unwrap_or(i64::MAX);
    secs - secs.rem_euclid(interval)
}

fn file_path(dir: &Path, base: &str, pattern: &str, period_start: i64) -> Result<PathBuf> {
    let start = DateTime::from_timestamp(period_start, 0).ok_or_else(|| {
        LogError::LogRotationError(format!("timestamp out of range: {}", period_start))
    })?;

    let mut name = String::from(base);
    write!(name, "{}", start.format(pattern))
        .map_err(|_| LogError::LogRotationError(format!("bad file pattern: {}", pattern)))?;
    Ok(dir.join(name))
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
