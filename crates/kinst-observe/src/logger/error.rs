use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log format: {0} (expected: text|json|journald)")]
    InvalidFormat(String),
    #[error("journald output is not available (non-linux target or `journald` feature off)")]
    JournaldNotSupported,
    #[error("a global logger is already installed")]
    AlreadyInitialized,
    #[error("failed to install logger: {0}")]
    InitializationFailed(String),
    #[error("invalid log level directive: {0}")]
    InvalidLogLevel(String),
}
