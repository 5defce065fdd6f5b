use std::sync::atomic::{AtomicBool, Ordering};

use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install the global subscriber described by `cfg`.
pub(crate) fn init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = level_filter(&cfg.level)?;
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Err(LoggerError::AlreadyInitialized);
    }

    let res = match cfg.format {
        LoggerFormat::Text => install(tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .with_ansi(cfg.use_color)
                .with_target(cfg.with_targets)
                .with_timer(local_timer()),
        )),
        LoggerFormat::Json => install(tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(cfg.with_targets)
                .with_timer(local_timer()),
        )),
        LoggerFormat::Journald => journald(filter),
    };
    if res.is_err() {
        INSTALLED.store(false, Ordering::SeqCst);
    }
    res
}

pub(crate) fn level_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|_| LoggerError::InvalidLogLevel(level.to_string()))
}

fn local_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn install<S>(subscriber: S) -> Result<(), LoggerError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|e| LoggerError::InitializationFailed(e.to_string()))
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald(filter: EnvFilter) -> Result<(), LoggerError> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))?;
    install(tracing_subscriber::registry().with(filter).with(layer))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald(_filter: EnvFilter) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}
