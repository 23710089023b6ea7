//! # portal-log
//! Process-wide logger provider handing out named logger handles.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! portal-log = "0.1.0"
//! ```
//!
//! Initialize once from the startup sequence, then log through the published
//! `document_portal` handle or through handles named after each component.
//!
//! ```rust
//! use portal_log::{initialize_logging_with, provider_config};
//!
//! // Keep the guard alive in `main`: dropping it flushes pending records.
//! let logger = initialize_logging_with(provider_config())
//!     .expect("Unable to initialize logging");
//! assert_eq!(logger.name(), "document_portal");
//! logger.info("Hello, world!");
//!
//! let worker = portal_log::get_logger("worker-1").unwrap();
//! worker.info("started");
//! // `log` macros go through the same sinks
//! log::warn!("Hello from the log crate");
//! ```
//!
//! ## Logging to files
//! The log file is created if it does not exist and appended to if it does.
//! Construction fails with a [`ConfigurationError`] when a destination cannot be opened.
//!
//! ```rust
//! use portal_log::provider_config;
//!
//! let provider = provider_config()
//!     .with_log_file("/tmp/portal_log_doc.log")
//!     .no_stdout() // disable stdout logging if needed
//!     .build()
//!     .expect("Unable to create log file");
//!
//! provider.get_logger("app").info("Hello, world!");
//! provider.flush(); // wait until the record is on disk
//! let content = std::fs::read_to_string("/tmp/portal_log_doc.log").unwrap();
//! assert!(content.ends_with("Hello, world!\n"));
//! ```
//!
//! ## Environment
//! [`initialize_logging`] reads its configuration from `PORTAL_LOG_LEVEL`,
//! `PORTAL_LOG_FORMAT`, `PORTAL_LOG_DIR`, `PORTAL_LOG_NO_FILE`, `PORTAL_LOG_NO_STDOUT`
//! and `PORTAL_LOG_FLUSH_INTERVAL_MS`.

mod bridge;
mod global;
mod handle;
mod provider;

pub use global::{
    GLOBAL_LOGGER_NAME, LoggerGuard, get_logger, global_logger, global_provider,
    initialize_logging, initialize_logging_with,
};
pub use handle::LoggerHandle;
pub use portal_log_core::{
    ConfigurationError, LogEnvConfig, LogFormat, LogMemory, LogWriter, Severity,
    SizeRotationConfig, TimeRotationConfig,
};
pub use provider::{LoggerProvider, ProviderBuilder, provider_config};
