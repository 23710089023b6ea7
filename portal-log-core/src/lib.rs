//! # portal-log-core
//! Core utilities for portal-log - sinks, record formatting and the background log thread.

mod config;
mod error;
mod log_rotation;
mod log_writer;
mod record;
mod utils;

pub use config::LogEnvConfig;
pub use error::ConfigurationError;
pub use log_rotation::{
    FileLogger, LogFileSizeRotation, LogFileTimeRotation, SizeRotationConfig, TimeRotationConfig,
};
pub use log_writer::{LogFile, LogMemory, LogStdout, LogWriter};
pub use record::{Fields, LogFormat, LogRecord, Severity};
pub use utils::{LogMessage, LogSender, spawn_log_thread};
