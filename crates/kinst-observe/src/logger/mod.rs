mod config;
mod error;
mod format;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;

/// Install the process-wide `tracing` subscriber; may be called once.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    log::init(cfg)
}
