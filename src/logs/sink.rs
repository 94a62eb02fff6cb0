use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{Encoder, Level, Record};

/// Severity predicate deciding which records a sink admits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    /// Admit `level` and everything more severe
    AtLeast(Level),
    /// Admit only records strictly less severe than `level`
    Below(Level),
}

impl LevelFilter {
    pub fn admits(&self, level: Level) -> bool {
        match self {
            LevelFilter::AtLeast(min) => level >= *min,
            LevelFilter::Below(max) => level < *max,
        }
    }
}

/// A (filter, encoder, destination) triple
pub struct Sink {
    name: String,
    filter: LevelFilter,
    encoder: Box<dyn Encoder>,
    writer: Mutex<Box<dyn Write + Send>>,
    dropped: AtomicU64,
}

impl Sink {
    pub fn new(
        name: impl Into<String>,
        filter: LevelFilter,
        encoder: impl Encoder + 'static,
        writer: impl Write + Send + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            filter,
            encoder: Box::new(encoder),
            writer: Mutex::new(Box::new(writer)),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filter(&self) -> LevelFilter {
        self.filter
    }

    /// Number of admitted records that failed to reach the destination
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Encode and write the record if the filter admits it.
    ///
    /// The whole line goes out in one `write_all` under the sink lock so
    /// concurrent callers never interleave within a line. Failures are
    /// counted and otherwise swallowed.
    pub fn offer(&self, record: &Record<'_>) {
        if !self.filter.admits(record.level) {
            return;
        }

        let mut line = Vec::with_capacity(256);
        if self.encoder.encode(record, &mut line).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        // A writer that panicked earlier leaves the lock poisoned; keep using it
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if writer.write_all(&line).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn flush(&self) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("name", &self.name)
            .field("filter", &self.filter)
            .field("dropped", &self.dropped())
            .finish()
    }
}

/// Fan-out of one record stream to independent sinks
#[derive(Debug, Default)]
pub struct Tee {
    sinks: Vec<Sink>,
}

impl Tee {
    pub fn new(sinks: Vec<Sink>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Sink) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    pub fn offer(&self, record: &Record<'_>) {
        for sink in &self.sinks {
            sink.offer(record);
        }
    }

    pub fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }
}

/// In-memory destination. Clones share one buffer, so a test or an
/// embedding application can hand one clone to a sink and read the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter(Arc<Mutex<Vec<u8>>>);

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
