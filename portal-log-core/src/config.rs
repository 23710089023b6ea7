use std::time::Duration;

use derive_from_env::FromEnv;

use crate::{
    error::ConfigurationError,
    record::{LogFormat, Severity},
};

/// Logging settings read from `PORTAL_LOG_*` environment variables.
#[derive(FromEnv, Debug, Clone, PartialEq, Eq)]
#[from_env(prefix = "PORTAL_LOG")]
#[allow(non_snake_case)]
pub struct LogEnvConfig {
    #[from_env(default = "info")]
    pub LEVEL: String,
    #[from_env(default = "text")]
    pub FORMAT: String,
    #[from_env(default = "logs")]
    pub DIR: String,
    #[from_env(default = "false")]
    pub NO_FILE: bool,
    #[from_env(default = "false")]
    pub NO_STDOUT: bool,
    #[from_env(default = "100")]
    pub FLUSH_INTERVAL_MS: u64,
}

impl Default for LogEnvConfig {
    fn default() -> Self {
        Self {
            LEVEL: "info".into(),
            FORMAT: "text".into(),
            DIR: "logs".into(),
            NO_FILE: false,
            NO_STDOUT: false,
            FLUSH_INTERVAL_MS: 100,
        }
    }
}

impl LogEnvConfig {
    pub fn load() -> Result<Self, ConfigurationError> {
        Self::from_env().map_err(|err| ConfigurationError::Environment(format!("{err:?}")))
    }

    pub fn level(&self) -> Result<Severity, ConfigurationError> {
        self.LEVEL.parse()
    }

    pub fn format(&self) -> Result<LogFormat, ConfigurationError> {
        self.FORMAT.parse()
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.FLUSH_INTERVAL_MS)
    }
}
