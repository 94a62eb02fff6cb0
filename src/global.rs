//! Process-wide logger for code that can't have one passed in.
//!
//! Installation happens at most once. Until then the free functions
//! discard records, except `fatal`, which still exits.

use std::sync::OnceLock;

use crate::config::LogConfig;
use crate::error::{LogError, Result};
use crate::logs::{Caller, Field, Level, Logger, PanicSignal};

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the process-wide logger.
///
/// Returns `LogError::AlreadyInitialized` if one is already installed; the
/// first logger stays in place so sinks are never duplicated.
pub fn install(logger: Logger) -> Result<()> {
    GLOBAL.set(logger).map_err(|_| LogError::AlreadyInitialized)
}

/// Build the standard logger from `config` and install it
pub fn init(config: &LogConfig) -> Result<()> {
    if GLOBAL.get().is_some() {
        return Err(LogError::AlreadyInitialized);
    }
    install(Logger::from_config(config)?)
}

/// The installed logger, if any
pub fn logger() -> Option<&'static Logger> {
    GLOBAL.get()
}

pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

fn emit(level: Level, message: &str, fields: &[Field], caller: Caller) {
    if let Some(logger) = GLOBAL.get() {
        logger.log_at(level, message, fields, caller);
    }
}

#[track_caller]
pub fn debug(message: &str, fields: &[Field]) {
    emit(Level::Debug, message, fields, Caller::here());
}

#[track_caller]
pub fn info(message: &str, fields: &[Field]) {
    emit(Level::Info, message, fields, Caller::here());
}

#[track_caller]
pub fn warn(message: &str, fields: &[Field]) {
    emit(Level::Warn, message, fields, Caller::here());
}

#[track_caller]
pub fn error(message: &str, fields: &[Field]) {
    emit(Level::Error, message, fields, Caller::here());
}

#[track_caller]
pub fn dpanic(message: &str, fields: &[Field]) -> Option<PanicSignal> {
    match GLOBAL.get() {
        Some(logger) => logger.dpanic(message, fields),
        None => None,
    }
}

#[track_caller]
pub fn panic(message: &str, fields: &[Field]) -> PanicSignal {
    match GLOBAL.get() {
        Some(logger) => logger.panic(message, fields),
        None => Logger::builder().build().panic(message, fields),
    }
}

#[track_caller]
pub fn fatal(message: &str, fields: &[Field]) -> ! {
    match GLOBAL.get() {
        Some(logger) => logger.fatal(message, fields),
        None => std::process::exit(1),
    }
}
