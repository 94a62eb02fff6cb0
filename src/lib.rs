// Library exports for teelog, a leveled logging facade

pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod global;
pub mod logs;

pub use config::LogConfig;
pub use error::{LogError, Result};
pub use logs::{field, Field, FieldValue, Level, Logger, PanicSignal};
