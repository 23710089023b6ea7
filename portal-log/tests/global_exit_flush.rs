use std::{fs, path::PathBuf, process::Command, time::Duration};

use portal_log::{initialize_logging_with, provider_config};

const EXIT_FILE_VAR: &str = "PORTAL_LOG_TEST_EXIT_FILE";

/// Runs only when spawned by `test_guard_flushes_at_exit`.
#[test]
fn child_logs_last_words() {
    let Some(path) = std::env::var_os(EXIT_FILE_VAR) else {
        return;
    };
    let guard = initialize_logging_with(
        provider_config()
            .no_stdout()
            .with_log_file(PathBuf::from(path))
            // Nothing reaches the file unless the guard flushes it.
            .with_flush_interval(Duration::from_secs(3600)),
    )
    .unwrap();
    guard.info("last words");
}

#[test]
fn test_guard_flushes_at_exit() {
    let dir = PathBuf::from("/tmp/portal_log_test_exit_flush");
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    let log = dir.join("exit.log");

    let status = Command::new(std::env::current_exe().unwrap())
        .args(["child_logs_last_words", "--exact", "--test-threads=1"])
        .env(EXIT_FILE_VAR, &log)
        .status()
        .unwrap();
    assert!(status.success());

    let content = fs::read_to_string(&log).unwrap();
    assert_eq!(content.matches("last words").count(), 1);
    assert!(content.ends_with("] last words\n"));
}
