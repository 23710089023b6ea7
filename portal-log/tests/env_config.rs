use std::time::Duration;

use portal_log::{
    ConfigurationError, LogEnvConfig, LogFormat, Severity, global_logger, global_provider,
    initialize_logging,
};

const VARS: [&str; 6] = [
    "PORTAL_LOG_LEVEL",
    "PORTAL_LOG_FORMAT",
    "PORTAL_LOG_DIR",
    "PORTAL_LOG_NO_FILE",
    "PORTAL_LOG_NO_STDOUT",
    "PORTAL_LOG_FLUSH_INTERVAL_MS",
];

fn set(key: &str, value: &str) {
    // Single test in this binary, nothing reads the environment concurrently.
    unsafe { std::env::set_var(key, value) };
}

fn clear_all() {
    for key in VARS {
        unsafe { std::env::remove_var(key) };
    }
}

// Environment mutation is process-wide, so every step runs in one test.
#[test]
fn test_environment_configuration() {
    clear_all();
    assert_eq!(LogEnvConfig::load().unwrap(), LogEnvConfig::default());

    set("PORTAL_LOG_NO_STDOUT", "true");
    set("PORTAL_LOG_FLUSH_INTERVAL_MS", "250");
    set("PORTAL_LOG_DIR", "/tmp/portal_log_test_env_dir");
    let config = LogEnvConfig::load().unwrap();
    assert!(config.NO_STDOUT);
    assert!(!config.NO_FILE);
    assert_eq!(config.flush_interval(), Duration::from_millis(250));
    assert_eq!(config.DIR, "/tmp/portal_log_test_env_dir");

    set("PORTAL_LOG_FLUSH_INTERVAL_MS", "soon");
    assert!(matches!(
        LogEnvConfig::load(),
        Err(ConfigurationError::Environment(_))
    ));
    assert!(matches!(
        initialize_logging(),
        Err(ConfigurationError::Environment(_))
    ));
    assert!(global_logger().is_none());

    clear_all();
    set("PORTAL_LOG_LEVEL", "loud");
    assert!(matches!(
        initialize_logging(),
        Err(ConfigurationError::InvalidLevel(level)) if level == "loud"
    ));
    assert!(global_logger().is_none());

    clear_all();
    set("PORTAL_LOG_LEVEL", "warning");
    set("PORTAL_LOG_FORMAT", "json");
    set("PORTAL_LOG_NO_FILE", "true");
    set("PORTAL_LOG_NO_STDOUT", "true");
    let logger = initialize_logging().unwrap();
    assert_eq!(logger.name(), "document_portal");
    assert!(!logger.enabled(Severity::Info));
    assert!(logger.enabled(Severity::Warning));
    let provider = global_provider().unwrap();
    assert_eq!(provider.level(), Severity::Warning);
    assert_eq!(provider.format(), LogFormat::Json);
    clear_all();
}
