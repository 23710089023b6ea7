use std::sync::Arc;

use log::{Log, Metadata, Record};
use portal_log_core::{LogRecord, Severity};

use crate::provider::Shared;

/// `log` implementation forwarding records to a provider's sinks.
pub(crate) struct LogBridge {
    shared: Arc<Shared>,
    no_fields: portal_log_core::Fields,
}

impl LogBridge {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            no_fields: Arc::new([]),
        }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.shared.enabled(Severity::from(metadata.level()))
    }

    fn log(&self, record: &Record) {
        let severity = Severity::from(record.level());
        if !self.shared.enabled(severity) {
            return;
        }
        self.shared.dispatch(LogRecord::new(
            severity,
            record.target().into(),
            record.args().to_string(),
            Arc::clone(&self.no_fields),
        ));
    }

    fn flush(&self) {
        self.shared.flush();
    }
}
