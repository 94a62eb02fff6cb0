use colored::*;
use serde_json::{Map, Value};
use std::io::{self, Write};

use super::{Level, Record};

pub const MESSAGE_KEY: &str = "msg";
pub const LEVEL_KEY: &str = "level";
pub const TIME_KEY: &str = "ts";
pub const CALLER_KEY: &str = "caller";

const RESERVED_KEYS: [&str; 4] = [LEVEL_KEY, TIME_KEY, CALLER_KEY, MESSAGE_KEY];

/// Turns a record into one line of output
pub trait Encoder: Send + Sync {
    fn encode(&self, record: &Record<'_>, buf: &mut Vec<u8>) -> io::Result<()>;
}

/// Field key as written to output. User keys that collide with a record
/// key move under `fields.` so the record's own values stay authoritative.
fn output_key(key: &str) -> String {
    if RESERVED_KEYS.contains(&key) {
        format!("fields.{}", key)
    } else {
        key.to_string()
    }
}

fn fields_object(record: &Record<'_>) -> Map<String, Value> {
    let mut map = Map::new();
    for field in record.all_fields() {
        map.insert(output_key(&field.key), field.value.to_json());
    }
    map
}

/// Machine-readable encoder: one JSON object per line
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn encode(&self, record: &Record<'_>, buf: &mut Vec<u8>) -> io::Result<()> {
        let mut map = Map::new();
        map.insert(LEVEL_KEY.into(), Value::from(record.level.as_str()));
        map.insert(TIME_KEY.into(), Value::from(record.formatted_ts()));
        map.insert(CALLER_KEY.into(), Value::from(record.caller.short()));
        map.insert(MESSAGE_KEY.into(), Value::from(record.message));
        map.extend(fields_object(record));

        serde_json::to_writer(&mut *buf, &map)?;
        buf.push(b'\n');
        Ok(())
    }
}

/// Human-readable encoder: tab separated, colorized level
#[derive(Debug, Clone, Copy)]
pub struct ConsoleEncoder {
    color: bool,
}

impl ConsoleEncoder {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn level_text(&self, level: Level) -> String {
        if !self.color {
            return level.as_str().to_string();
        }
        let text = level.as_str();
        match level {
            Level::Debug => text.magenta().to_string(),
            Level::Info => text.blue().to_string(),
            Level::Warn => text.yellow().to_string(),
            Level::Error | Level::DPanic | Level::Panic | Level::Fatal => text.red().to_string(),
        }
    }
}

impl Default for ConsoleEncoder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, record: &Record<'_>, buf: &mut Vec<u8>) -> io::Result<()> {
        write!(
            buf,
            "{}\t{}\t{}\t{}",
            record.formatted_ts(),
            self.level_text(record.level),
            record.caller,
            record.message
        )?;

        let fields = fields_object(record);
        if !fields.is_empty() {
            buf.push(b'\t');
            serde_json::to_writer(&mut *buf, &fields)?;
        }
        buf.push(b'\n');
        Ok(())
    }
}
