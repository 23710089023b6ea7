use portal_log::{initialize_logging, provider_config};

fn main() {
    // Set PORTAL_LOG_NO_FILE=true to keep the logs/ directory clean.
    // Pending records are flushed when the guard goes out of scope.
    let logger = initialize_logging().expect("Unable to initialize logging");
    logger.info("Hello, world!");

    let handles: Vec<_> = (0..5)
        .map(|i| {
            std::thread::spawn(move || {
                let worker = portal_log::get_logger(&format!("thread {i}"))
                    .expect("logging is initialized");
                worker.bind("index", i).warning("Hello, world from a worker thread!");
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // A private provider for a thread logging only to its own file.
    let private = provider_config()
        .no_stdout()
        .with_log_file("/tmp/portal_log_thread_private.log")
        .build()
        .expect("Unable to create log file");
    private.get_logger("private").info("kept out of the global sinks");
    private.flush();
}
