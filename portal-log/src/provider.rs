use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use chrono::Local;
use portal_log_core::{
    ConfigurationError, FileLogger, LogEnvConfig, LogFile, LogFileSizeRotation,
    LogFileTimeRotation, LogFormat, LogRecord, LogSender, LogStdout, LogWriter, Severity,
    SizeRotationConfig, TimeRotationConfig, spawn_log_thread,
};
use uuid::Uuid;

use crate::{GLOBAL_LOGGER_NAME, bridge::LogBridge, handle::LoggerHandle};

/// State shared by a provider and every handle derived from it.
/// Immutable once built.
pub(crate) struct Shared {
    pub(crate) id: Uuid,
    pub(crate) level: Severity,
    pub(crate) format: LogFormat,
    sinks: Vec<LogSender>,
}

impl Shared {
    pub(crate) fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    pub(crate) fn dispatch(&self, record: LogRecord) {
        let record = Arc::new(record);
        for sink in &self.sinks {
            sink.send_record(Arc::clone(&record));
        }
    }

    pub(crate) fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }
}

/// Factory of named logger handles sharing one set of sinks.
///
/// Cloning is cheap and yields the same provider. The background log threads
/// stop once the provider and all of its handles are dropped.
#[derive(Clone)]
pub struct LoggerProvider {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for LoggerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerProvider")
            .field("id", &self.shared.id)
            .field("level", &self.shared.level)
            .field("format", &self.shared.format)
            .field("sinks", &self.shared.sinks.len())
            .finish()
    }
}

impl LoggerProvider {
    /// Builds a provider from `PORTAL_LOG_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        ProviderBuilder::from_env()?.build()
    }

    /// Returns a handle whose records are tagged with `name`.
    ///
    /// An empty name falls back to the global logger name.
    pub fn get_logger(&self, name: &str) -> LoggerHandle {
        let name = if name.is_empty() { GLOBAL_LOGGER_NAME } else { name };
        LoggerHandle::new(name.into(), Arc::clone(&self.shared))
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn level(&self) -> Severity {
        self.shared.level
    }

    pub fn format(&self) -> LogFormat {
        self.shared.format
    }

    /// Waits until every record emitted so far is written and flushed.
    pub fn flush(&self) {
        self.shared.flush();
    }

    /// Routes the `log` crate macros to this provider, using each record's
    /// target as logger name.
    pub fn install_log_bridge(&self) -> Result<(), ConfigurationError> {
        log::set_boxed_logger(Box::new(LogBridge::new(Arc::clone(&self.shared))))
            .map_err(|_| ConfigurationError::LoggerAlreadySet)?;
        log::set_max_level(self.shared.level.into());
        Ok(())
    }
}

/// File destinations, opened only by [`ProviderBuilder::build`].
enum FileSink {
    Single(PathBuf),
    Directory(PathBuf),
    TimeRotation(TimeRotationConfig),
    SizeRotation(SizeRotationConfig),
}

impl FileSink {
    fn open(self) -> Result<FileLogger, ConfigurationError> {
        match self {
            FileSink::Single(path) => LogFile::new(&path)
                .map(FileLogger::Single)
                .map_err(|source| ConfigurationError::Sink { path, source }),
            FileSink::Directory(dir) => {
                fs::create_dir_all(&dir).map_err(|source| ConfigurationError::Sink {
                    path: dir.clone(),
                    source,
                })?;
                let path = timestamped_log_path(&dir);
                LogFile::new(&path)
                    .map(FileLogger::Single)
                    .map_err(|source| ConfigurationError::Sink { path, source })
            }
            FileSink::TimeRotation(config) => {
                let path = config.folder.clone();
                LogFileTimeRotation::new(config)
                    .map(FileLogger::TimeRotation)
                    .map_err(|source| ConfigurationError::Sink { path, source })
            }
            FileSink::SizeRotation(config) => {
                let path = config.folder.clone();
                LogFileSizeRotation::new(config)
                    .map(FileLogger::SizeRotation)
                    .map_err(|source| ConfigurationError::Sink { path, source })
            }
        }
    }
}

/// `<dir>/<month>_<day>_<year>_<hour>_<minute>_<second>.log`, local time.
fn timestamped_log_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.log", Local::now().format("%m_%d_%Y_%H_%M_%S")))
}

/// Builder for configuring and constructing a [`LoggerProvider`].
pub struct ProviderBuilder {
    level: Severity,
    format: LogFormat,
    stdout: bool,
    files: Vec<FileSink>,
    writers: Vec<Box<dyn LogWriter + Send>>,
    flush_interval: Duration,
}

impl Default for ProviderBuilder {
    fn default() -> Self {
        Self {
            level: Severity::Info,
            format: LogFormat::Text,
            stdout: true,
            files: Vec::new(),
            writers: Vec::new(),
            flush_interval: Duration::from_millis(100),
        }
    }
}

impl ProviderBuilder {
    /// Reads `PORTAL_LOG_*` variables. See [`LogEnvConfig`].
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_env_config(&LogEnvConfig::load()?)
    }

    pub fn from_env_config(config: &LogEnvConfig) -> Result<Self, ConfigurationError> {
        let builder = Self::default()
            .with_level(config.level()?)
            .with_format(config.format()?)
            .with_stdout(!config.NO_STDOUT)
            .with_flush_interval(config.flush_interval());
        if config.NO_FILE {
            Ok(builder)
        } else {
            Ok(builder.with_log_dir(&config.DIR))
        }
    }

    /// Opens every sink and starts one log thread per sink.
    pub fn build(self) -> Result<LoggerProvider, ConfigurationError> {
        let Self {
            level,
            format,
            stdout,
            files,
            writers,
            flush_interval,
        } = self;
        // Open everything first so a failing sink starts no thread.
        let mut opened: Vec<Box<dyn LogWriter + Send>> = Vec::new();
        if stdout {
            opened.push(Box::new(LogStdout::default()));
        }
        for file in files {
            opened.push(Box::new(file.open()?));
        }
        opened.extend(writers);

        let sinks = opened
            .into_iter()
            .map(|writer| spawn_log_thread(writer, format, flush_interval))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ConfigurationError::Thread)?;
        Ok(LoggerProvider {
            shared: Arc::new(Shared {
                id: Uuid::new_v4(),
                level,
                format,
                sinks,
            }),
        })
    }

    /// Sets the minimum severity
    pub fn with_level(self, level: Severity) -> Self {
        Self { level, ..self }
    }
    pub fn with_format(self, format: LogFormat) -> Self {
        Self { format, ..self }
    }
    /// Appends to a log file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files.push(FileSink::Single(path.as_ref().to_path_buf()));
        self
    }
    /// Logs to a new timestamped file inside `dir`, created if needed.
    pub fn with_log_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.files.push(FileSink::Directory(dir.as_ref().to_path_buf()));
        self
    }
    /// Sets a log file with time-based rotation.
    pub fn with_time_rotation(mut self, config: TimeRotationConfig) -> Self {
        self.files.push(FileSink::TimeRotation(config));
        self
    }
    /// Sets a log file with size-based rotation.
    pub fn with_size_rotation(mut self, config: SizeRotationConfig) -> Self {
        self.files.push(FileSink::SizeRotation(config));
        self
    }
    /// Adds a custom sink.
    pub fn with_writer<W: LogWriter + Send + 'static>(mut self, writer: W) -> Self {
        self.writers.push(Box::new(writer));
        self
    }
    /// Ignore stdout logging
    pub fn no_stdout(self) -> Self {
        Self {
            stdout: false,
            ..self
        }
    }
    /// Dynamically set the stdout flag.
    pub fn with_stdout(self, yes: bool) -> Self {
        Self {
            stdout: yes,
            ..self
        }
    }
    pub fn with_flush_interval(self, flush_interval: Duration) -> Self {
        Self {
            flush_interval,
            ..self
        }
    }
}

/// Returns a default ProviderBuilder: info level, text format, stdout only.
pub fn provider_config() -> ProviderBuilder {
    ProviderBuilder::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_log_core::LogMemory;

    fn test_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from(format!("/tmp/portal_log_test_{name}"));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn memory_provider(level: Severity) -> (LoggerProvider, LogMemory) {
        let memory = LogMemory::new();
        let provider = provider_config()
            .no_stdout()
            .with_level(level)
            .with_writer(memory.clone())
            .build()
            .unwrap();
        (provider, memory)
    }

    #[test]
    fn test_single_line_per_record() {
        let (provider, memory) = memory_provider(Severity::Info);
        provider.get_logger("worker-1").info("started");
        provider.flush();
        let lines = memory.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("worker-1"));
        assert!(lines[0].contains("started"));
    }

    #[test]
    fn test_same_name_shares_destinations() {
        let (provider, memory) = memory_provider(Severity::Debug);
        let first = provider.get_logger("api");
        let second = provider.get_logger("api");
        assert_eq!(first.provider_id(), second.provider_id());
        assert_eq!(first.provider_id(), provider.id());
        first.debug("one");
        second.debug("two");
        provider.flush();
        let lines = memory.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.contains(" api DEBUG] ")));
    }

    #[test]
    fn test_level_filtering() {
        let (provider, memory) = memory_provider(Severity::Warning);
        let handle = provider.get_logger("filter");
        assert!(!handle.enabled(Severity::Info));
        assert!(handle.enabled(Severity::Critical));
        handle.debug("hidden");
        handle.info("hidden");
        handle.warning("shown");
        handle.error("shown");
        handle.critical("shown");
        provider.flush();
        let lines = memory.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("CRITICAL"));
        assert!(lines.iter().all(|l| !l.contains("hidden")));
    }

    #[test]
    fn test_empty_name_falls_back() {
        let (provider, _memory) = memory_provider(Severity::Info);
        assert_eq!(provider.get_logger("").name(), GLOBAL_LOGGER_NAME);
    }

    #[test]
    fn test_log_file_sink() {
        let dir = test_dir("provider_log_file");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("app.log");
        let provider = provider_config()
            .no_stdout()
            .with_format(LogFormat::Json)
            .with_log_file(&path)
            .build()
            .unwrap();
        provider.get_logger("file").bind("request", 7).info("written");
        provider.flush();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("\"logger\":\"file\""));
        assert!(content.contains("\"request\":\"7\""));
    }

    #[test]
    fn test_log_dir_creates_timestamped_file() {
        let dir = test_dir("provider_log_dir");
        let provider = provider_config()
            .no_stdout()
            .with_log_dir(dir.join("logs"))
            .build()
            .unwrap();
        provider.get_logger("dir").info("hello");
        drop(provider);
        let files: Vec<_> = fs::read_dir(dir.join("logs")).unwrap().flatten().collect();
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().to_string_lossy().to_string();
        assert!(name.ends_with(".log"));
        assert_eq!(name.matches('_').count(), 5);
        assert!(fs::read_to_string(files[0].path()).unwrap().contains("hello"));
    }

    #[test]
    fn test_invalid_sink_is_configuration_error() {
        let dir = test_dir("provider_invalid_sink");
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not_a_dir");
        fs::write(&blocker, "").unwrap();
        let memory = LogMemory::new();
        let err = provider_config()
            .no_stdout()
            .with_writer(memory.clone())
            .with_log_file(blocker.join("app.log"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::Sink { ref path, .. } if path == &blocker.join("app.log")
        ));

        let err = provider_config()
            .no_stdout()
            .with_log_dir(blocker.join("logs"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Sink { .. }));
    }

    #[test]
    fn test_invalid_rotation_is_configuration_error() {
        let dir = test_dir("provider_invalid_rotation");
        let err = provider_config()
            .no_stdout()
            .with_size_rotation(SizeRotationConfig {
                folder: dir.clone(),
                filename: "app".into(),
                extension: "log".into(),
                max_file_size: None,
                max_lines: None,
                max_files: 3,
            })
            .build()
            .unwrap_err();
        match err {
            ConfigurationError::Sink { path, source } => {
                assert_eq!(path, dir);
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidInput);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_size_rotation_sink() {
        let dir = test_dir("provider_size_rotation");
        let provider = provider_config()
            .no_stdout()
            .with_size_rotation(SizeRotationConfig {
                folder: dir.clone(),
                filename: "app".into(),
                extension: "log".into(),
                max_file_size: None,
                max_lines: Some(10),
                max_files: 3,
            })
            .build()
            .unwrap();
        let handle = provider.get_logger("rotation-demo");
        for i in 0..50 {
            handle.info(format!("Log message number {i}"));
            std::thread::sleep(Duration::from_millis(1));
        }
        drop(handle);
        drop(provider);
        let count = fs::read_dir(&dir).unwrap().flatten().count();
        assert!(count <= 3, "max_files cleanup should keep at most 3, got {count}");
    }

    #[test]
    fn test_from_env_config() {
        let dir = test_dir("provider_env");
        let config = LogEnvConfig {
            LEVEL: "error".into(),
            FORMAT: "json".into(),
            DIR: dir.to_string_lossy().to_string(),
            NO_STDOUT: true,
            ..LogEnvConfig::default()
        };
        let provider = ProviderBuilder::from_env_config(&config)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(provider.level(), Severity::Error);
        assert_eq!(provider.format(), LogFormat::Json);
        assert!(dir.is_dir());

        let config = LogEnvConfig {
            LEVEL: "chatty".into(),
            ..LogEnvConfig::default()
        };
        assert!(matches!(
            ProviderBuilder::from_env_config(&config),
            Err(ConfigurationError::InvalidLevel(_))
        ));
    }
}
