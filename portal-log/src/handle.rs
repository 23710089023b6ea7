use std::{fmt, sync::Arc};

use portal_log_core::{Fields, LogRecord, Severity};
use uuid::Uuid;

use crate::provider::Shared;

/// A named logging endpoint bound to one provider's sinks.
///
/// Logging is best-effort and never fails into the caller.
#[derive(Clone)]
pub struct LoggerHandle {
    name: Arc<str>,
    fields: Fields,
    shared: Arc<Shared>,
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("provider", &self.shared.id)
            .finish()
    }
}

impl LoggerHandle {
    pub(crate) fn new(name: Arc<str>, shared: Arc<Shared>) -> Self {
        Self {
            name,
            fields: Arc::new([]),
            shared,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the provider this handle was obtained from.
    pub fn provider_id(&self) -> Uuid {
        self.shared.id
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        self.shared.enabled(severity)
    }

    /// Returns a handle that adds `key=value` to every record it emits.
    pub fn bind(&self, key: impl Into<String>, value: impl ToString) -> Self {
        let mut fields = self.fields.to_vec();
        fields.push((key.into(), value.to_string()));
        Self {
            name: Arc::clone(&self.name),
            fields: fields.into(),
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Blocks until every record emitted so far is written by all sinks.
    pub fn flush(&self) {
        self.shared.flush();
    }

    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        if !self.enabled(severity) {
            return;
        }
        self.shared.dispatch(LogRecord::new(
            severity,
            Arc::clone(&self.name),
            message.into(),
            Arc::clone(&self.fields),
        ));
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message)
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message)
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.log(Severity::Critical, message)
    }
}
