use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while building a logger provider.
///
/// All of them are fatal to process start: they are reported once by the
/// constructor and never retried.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A log destination could not be opened or created.
    #[error("unable to open log sink {path:?}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The background thread owning a sink could not be spawned.
    #[error("unable to start log thread: {0}")]
    Thread(#[source] io::Error),

    #[error("invalid log level {0:?}, expected one of debug, info, warning, error, critical")]
    InvalidLevel(String),

    #[error("invalid log format {0:?}, expected text or json")]
    InvalidFormat(String),

    /// `PORTAL_LOG_*` variables could not be read.
    #[error("invalid logging environment: {0}")]
    Environment(String),

    /// Another `log` implementation was registered first.
    #[error("a global `log` logger is already installed")]
    LoggerAlreadySet,
}
