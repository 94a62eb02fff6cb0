use thiserror::Error;

/// Main error type for the teelog facade
#[derive(Debug, Error)]
pub enum LogError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    // Destination errors
    #[error("Failed to open log file: {0}")]
    LogFileError(String),

    #[error("Log rotation failed: {0}")]
    LogRotationError(String),

    // Facade lifecycle
    #[error("Logger already initialized")]
    AlreadyInitialized,

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for teelog operations
pub type Result<T> = std::result::Result<T, LogError>;
