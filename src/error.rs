use thiserror::Error;

/// Main error type for runlog
#[derive(Debug, Error)]
pub enum RunlogError {
    // Lifecycle errors
    #[error("Failed to initialize logging: {0}")]
    Initialization(String),

    #[error("Logging is already initialized")]
    AlreadyInitialized,

    #[error("Logging is not initialized")]
    NotInitialized,

    // Logger errors
    #[error("Logger already exists: {0}")]
    DuplicateLogger(String),

    #[error("Invalid logger name: {0:?}")]
    InvalidLoggerName(String),

    #[error("Failed to write log line: {0}")]
    WriteError(String),

    #[error("Failed to read logs: {0}")]
    LogReadError(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    #[error("Missing required configuration field: {0}")]
    MissingConfigField(String),

    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for runlog operations
pub type Result<T> = std::result::Result<T, RunlogError>;
