//! Structured log sink for resolver tracing.
//!
//! The resolver narrates permissive-fallback hits and phase progress. By
//! default those entries go through the [`log`] facade, so whatever backend
//! the host application installed receives them; a caller that wants the
//! stream somewhere else entirely passes its own [`LogSink`] to
//! [`Loader::with_logger`](crate::loader::Loader::with_logger).
use std::sync::Arc;

/// Log levels understood by a [`LogSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// A structured log sink.
///
/// Implementations must be cheap to call; the resolver logs on hot paths
/// (one entry per fallback hit).
pub trait LogSink: Send + Sync {
    /// Receives one log entry.
    fn log(&self, level: LogLevel, message: &str);
}

/// Routes an entry to the custom sink when one is installed, otherwise to
/// the [`log`] facade.
pub(crate) fn dispatch(sink: Option<&Arc<dyn LogSink>>, level: LogLevel, message: &str) {
    match sink {
        Some(sink) => sink.log(level, message),
        None => match level {
            LogLevel::Trace => log::trace!("{message}"),
            LogLevel::Debug => log::debug!("{message}"),
            LogLevel::Info => log::info!("{message}"),
            LogLevel::Warn => log::warn!("{message}"),
            LogLevel::Error => log::error!("{message}"),
        },
    }
}
