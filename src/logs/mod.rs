// Logs module - record model, encoders, sinks and file rotation

mod clock;
mod encoder;
mod field;
mod level;
mod logger;
mod record;
mod retention;
mod rotation;
mod sink;

pub use clock::{Clock, SystemClock};
pub use encoder::{ConsoleEncoder, Encoder, JsonEncoder};
pub use field::{field, Field, FieldValue};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder, PanicSignal};
pub use record::{Caller, Record, TIMESTAMP_FORMAT};
pub use retention::{cleanup_expired, glob_matches, pattern_to_glob};
pub use rotation::{
    validate_pattern, RotatingFile, RotationPolicy, DEFAULT_FILE_PATTERN, DEFAULT_RETENTION,
    DEFAULT_ROTATION_INTERVAL,
};
pub use sink::{LevelFilter, MemoryWriter, Sink, Tee};
