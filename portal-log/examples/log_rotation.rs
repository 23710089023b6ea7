use std::path::PathBuf;

use portal_log::{SizeRotationConfig, provider_config};

fn main() {
    let dir = PathBuf::from("/tmp/portal_log_example_rotation");
    let _ = std::fs::remove_dir_all(&dir);

    let provider = provider_config()
        .with_size_rotation(SizeRotationConfig {
            folder: dir.clone(),
            filename: "app".into(),
            extension: "log".into(),
            max_file_size: None,
            max_lines: Some(10),
            max_files: 3,
        })
        .build()
        .expect("Unable to configure log rotation");

    let logger = provider.get_logger("rotation-demo");
    for i in 0..50 {
        logger.info(format!("Log message number {i}"));
    }
    provider.flush();

    let files: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("app_") && name.ends_with(".log"))
        .collect();

    println!("\n--- Rotation Summary ---");
    println!("Log directory: {}", dir.display());
    println!("Files remaining (max_files=3): {}", files.len());
    for f in &files {
        println!("  {f}");
    }
    assert!(files.len() <= 3, "max_files cleanup should keep at most 3");
}
