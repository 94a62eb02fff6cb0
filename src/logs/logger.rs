use chrono::{DateTime, Utc};
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicI64, AtomicI8, Ordering};
use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::rotation::RotatingFile;
use super::{Caller, ConsoleEncoder, Field, JsonEncoder, Level, LevelFilter, Record, Sink, Tee};
use crate::config::LogConfig;
use crate::error::Result;

/// Returned by `Logger::panic` once the record has been written.
///
/// Callers either propagate it as an error or call `unwind` to panic with
/// it as the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a panic-level record was logged; propagate or unwind this signal"]
pub struct PanicSignal {
    level: Level,
    message: String,
}

impl PanicSignal {
    fn new(level: Level, message: &str) -> Self {
        Self {
            level,
            message: message.to_string(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Unwind the current thread with this signal as the panic payload
    pub fn unwind(self) -> ! {
        std::panic::panic_any(self)
    }
}

impl fmt::Display for PanicSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

impl std::error::Error for PanicSignal {}

struct Shared {
    tee: Tee,
    min_level: AtomicI8,
    development: bool,
    clock: Arc<dyn Clock>,
    last_micros: AtomicI64,
}

/// Handle to a configured set of sinks.
///
/// Cloning is cheap; clones share sinks, level and clock. Every logging
/// method is `#[track_caller]`, so records carry the location of the code
/// that called the logger.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    context: Arc<[Field]>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Compose the standard tee: info file below Warn, warn file at Warn and
    /// above, console on stdout for everything.
    ///
    /// # Returns
    /// * `Ok(Logger)` - All destinations are open
    /// * `Err(LogError)` - Invalid config or a file destination could not be opened
    pub fn from_config(config: &LogConfig) -> Result<Self> {
        Self::from_config_with_console(config, io::stdout())
    }

    /// Same as `from_config` with a caller supplied console destination
    pub fn from_config_with_console<W>(config: &LogConfig, console: W) -> Result<Self>
    where
        W: Write + Send + 'static,
    {
        Self::from_config_with_clock(config, console, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock<W>(
        config: &LogConfig,
        console: W,
        clock: Arc<dyn Clock>,
    ) -> Result<Self>
    where
        W: Write + Send + 'static,
    {
        config.validate()?;

        let policy = config.rotation_policy();
        let info = RotatingFile::open_with_clock(
            &config.log_dir,
            &config.info_file,
            policy.clone(),
            clock.clone(),
        )?;
        let warn =
            RotatingFile::open_with_clock(&config.log_dir, &config.warn_file, policy, clock.clone())?;

        let mut builder = Logger::builder()
            .level(config.level)
            .development(config.development)
            .clock(clock)
            .sink(Sink::new("info", LevelFilter::Below(Level::Warn), JsonEncoder, info))
            .sink(Sink::new("warn", LevelFilter::AtLeast(Level::Warn), JsonEncoder, warn));

        if config.console {
            builder = builder.sink(Sink::new(
                "console",
                LevelFilter::AtLeast(Level::Debug),
                ConsoleEncoder::new(config.console_color),
                console,
            ));
        }

        Ok(builder.build())
    }

    /// Child logger that prepends `fields` to every record
    pub fn with(&self, fields: &[Field]) -> Logger {
        let mut context = self.context.to_vec();
        context.extend_from_slice(fields);
        Logger {
            shared: Arc::clone(&self.shared),
            context: context.into(),
        }
    }

    /// Current minimum level; records below it are discarded before any sink
    pub fn level(&self) -> Level {
        Level::from_i8(self.shared.min_level.load(Ordering::Relaxed)).unwrap_or(Level::Debug)
    }

    pub fn set_level(&self, level: Level) {
        self.shared.min_level.store(level.as_i8(), Ordering::Relaxed);
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    pub fn is_development(&self) -> bool {
        self.shared.development
    }

    pub fn sinks(&self) -> &[Sink] {
        self.shared.tee.sinks()
    }

    /// Flush every destination
    pub fn sync(&self) {
        self.shared.tee.flush();
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.log_at(Level::Debug, message, fields, Caller::here());
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.log_at(Level::Info, message, fields, Caller::here());
    }

    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.log_at(Level::Warn, message, fields, Caller::here());
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.log_at(Level::Error, message, fields, Caller::here());
    }

    /// Logs at DPanic. Returns a signal only in development mode.
    #[track_caller]
    pub fn dpanic(&self, message: &str, fields: &[Field]) -> Option<PanicSignal> {
        self.log_at(Level::DPanic, message, fields, Caller::here());
        self.shared
            .development
            .then(|| PanicSignal::new(Level::DPanic, message))
    }

    /// Logs at Panic and hands back the signal for the caller to act on
    #[track_caller]
    pub fn panic(&self, message: &str, fields: &[Field]) -> PanicSignal {
        self.log_at(Level::Panic, message, fields, Caller::here());
        PanicSignal::new(Level::Panic, message)
    }

    /// Logs at Fatal, flushes every sink, then exits the process with status 1
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) -> ! {
        self.log_at(Level::Fatal, message, fields, Caller::here());
        self.sync();
        std::process::exit(1)
    }

    /// Emit at any level without the Panic/Fatal control flow
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field]) {
        self.log_at(level, message, fields, Caller::here());
    }

    /// Emit with an explicit caller, for adapters that know the origin
    pub fn log_at(&self, level: Level, message: &str, fields: &[Field], caller: Caller) {
        if !self.enabled(level) {
            return;
        }
        let record = Record {
            ts: self.timestamp(),
            level,
            message,
            caller,
            context: &self.context,
            fields,
        };
        self.shared.tee.offer(&record);
    }

    /// Clock reading clamped so successive records never go backwards
    fn timestamp(&self) -> DateTime<Utc> {
        let now = self.shared.clock.now();
        let micros = now.timestamp_micros();
        let prev = self.shared.last_micros.fetch_max(micros, Ordering::SeqCst);
        if prev <= micros {
            return now;
        }
        let secs = prev.div_euclid(1_000_000);
        let nanos = (prev.rem_euclid(1_000_000) * 1_000) as u32;
        DateTime::from_timestamp(secs, nanos).unwrap_or(now)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("sinks", &self.shared.tee.sinks())
            .field("context", &self.context)
            .finish()
    }
}

/// Assembles a `Logger` from arbitrary sinks
pub struct LoggerBuilder {
    sinks: Vec<Sink>,
    level: Level,
    development: bool,
    clock: Arc<dyn Clock>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            level: Level::Debug,
            development: false,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn sink(mut self, sink: Sink) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            shared: Arc::new(Shared {
                tee: Tee::new(self.sinks),
                min_level: AtomicI8::new(self.level.as_i8()),
                development: self.development,
                clock: self.clock,
                last_micros: AtomicI64::new(i64::MIN),
            }),
            context: Arc::from(Vec::new()),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
