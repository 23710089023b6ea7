use std::ops::Deref;

use once_cell::sync::OnceCell;
use portal_log_core::ConfigurationError;

use crate::{
    handle::LoggerHandle,
    provider::{LoggerProvider, ProviderBuilder},
};

/// Name of the process-wide logger handle.
pub const GLOBAL_LOGGER_NAME: &str = "document_portal";

struct GlobalLogging {
    provider: LoggerProvider,
    handle: LoggerHandle,
}

static GLOBAL_LOGGING: OnceCell<GlobalLogging> = OnceCell::new();

/// Guard that flushes the process-wide sinks when dropped.
/// Hold this guard in `main` for the lifetime of your logging session:
/// statics are never dropped, so records still queued at exit are lost without it.
#[derive(Debug)]
pub struct LoggerGuard {
    handle: &'static LoggerHandle,
}

impl LoggerGuard {
    /// The published `document_portal` handle, usable past the guard's lifetime.
    pub fn logger(&self) -> &'static LoggerHandle {
        self.handle
    }
}

impl Deref for LoggerGuard {
    type Target = LoggerHandle;
    fn deref(&self) -> &Self::Target {
        self.handle
    }
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        self.handle.flush();
    }
}

/// Builds the process-wide provider from `PORTAL_LOG_*` variables and
/// publishes the `document_portal` handle.
///
/// Call once from the startup sequence. Later calls return a guard over the
/// handle published by the first successful call without opening any sink.
/// If construction fails nothing is published.
#[must_use = "LoggerGuard must be kept alive to flush logs at exit"]
pub fn initialize_logging() -> Result<LoggerGuard, ConfigurationError> {
    initialize(ProviderBuilder::from_env)
}

/// Same as [`initialize_logging`] with an explicit configuration.
#[must_use = "LoggerGuard must be kept alive to flush logs at exit"]
pub fn initialize_logging_with(
    builder: ProviderBuilder,
) -> Result<LoggerGuard, ConfigurationError> {
    initialize(move || Ok(builder))
}

fn initialize(
    builder: impl FnOnce() -> Result<ProviderBuilder, ConfigurationError>,
) -> Result<LoggerGuard, ConfigurationError> {
    let global = GLOBAL_LOGGING.get_or_try_init(|| {
        let provider = builder()?.build()?;
        match provider.install_log_bridge() {
            // The application may route `log` elsewhere already.
            Ok(()) | Err(ConfigurationError::LoggerAlreadySet) => {}
            Err(err) => return Err(err),
        }
        let handle = provider.get_logger(GLOBAL_LOGGER_NAME);
        Ok::<_, ConfigurationError>(GlobalLogging { provider, handle })
    })?;
    Ok(LoggerGuard {
        handle: &global.handle,
    })
}

/// The `document_portal` handle, once logging is initialized.
pub fn global_logger() -> Option<&'static LoggerHandle> {
    GLOBAL_LOGGING.get().map(|global| &global.handle)
}

pub fn global_provider() -> Option<&'static LoggerProvider> {
    GLOBAL_LOGGING.get().map(|global| &global.provider)
}

/// Named handle from the process-wide provider, once logging is initialized.
pub fn get_logger(name: &str) -> Option<LoggerHandle> {
    global_provider().map(|provider| provider.get_logger(name))
}
