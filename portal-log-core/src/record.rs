use std::{borrow::Cow, fmt, str::FromStr, sync::Arc};

use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use serde_json::{Map, Value};

use crate::error::ConfigurationError;

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    fn tag(self, colored: bool) -> String {
        if !colored {
            return self.as_str().to_string();
        }
        match self {
            Severity::Debug => "DEBUG".blue(),
            Severity::Info => "INFO".green(),
            Severity::Warning => "WARNING".yellow(),
            Severity::Error => "ERROR".red(),
            Severity::Critical => "CRITICAL".red().bold(),
        }
        .to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            _ => Err(ConfigurationError::InvalidLevel(s.to_string())),
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info => Severity::Info,
            log::Level::Debug | log::Level::Trace => Severity::Debug,
        }
    }
}

impl From<Severity> for log::LevelFilter {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Debug => log::LevelFilter::Debug,
            Severity::Info => log::LevelFilter::Info,
            Severity::Warning => log::LevelFilter::Warn,
            Severity::Error | Severity::Critical => log::LevelFilter::Error,
        }
    }
}

/// Line format shared by every sink of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `[{time} {name} {LEVEL}] {message} key=value`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigurationError::InvalidFormat(s.to_string())),
        }
    }
}

/// Context fields bound to a logger handle.
pub type Fields = Arc<[(String, String)]>;

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub severity: Severity,
    pub name: Arc<str>,
    pub message: String,
    pub fields: Fields,
    pub time: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(severity: Severity, name: Arc<str>, message: String, fields: Fields) -> Self {
        Self {
            severity,
            name,
            message,
            fields,
            time: Utc::now(),
        }
    }

    pub fn format(&self, format: LogFormat, colored: bool) -> String {
        match format {
            LogFormat::Text => self.format_text(colored),
            LogFormat::Json => self.format_json(),
        }
    }

    fn format_text(&self, colored: bool) -> String {
        let time = self.time.format("%Y-%m-%dT%H:%M:%S%.3f");
        let level = self.severity.tag(colored);
        let message = escape_line_breaks(&self.message);
        let mut line = format!("[{time} {} {level}] {message}", self.name);
        for (key, value) in self.fields.iter() {
            line.push_str(&format!(" {key}={}", escape_line_breaks(value)));
        }
        line
    }

    fn format_json(&self) -> String {
        let mut object = Map::new();
        for (key, value) in self.fields.iter() {
            object.insert(key.clone(), Value::String(value.clone()));
        }
        // Core keys win over bound fields of the same name.
        object.insert(
            "timestamp".into(),
            Value::String(self.time.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        object.insert(
            "level".into(),
            Value::String(self.severity.as_str().to_ascii_lowercase()),
        );
        object.insert("logger".into(), Value::String(self.name.to_string()));
        object.insert("event".into(), Value::String(self.message.clone()));
        Value::Object(object).to_string()
    }
}

/// Keeps one record on one physical line.
fn escape_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(['\n', '\r']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace('\r', "\\r").replace('\n', "\\n"))
}
