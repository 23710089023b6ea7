use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use chrono::Utc;

use crate::log_writer::{LogFile, LogWriter};

#[cfg(not(test))]
mod limits {
    pub const MIN_ROTATION_DURATION_MS: u64 = 1_000;
    pub const MIN_FILE_SIZE: u64 = 4_096;
    pub const MIN_LINES: u64 = 10;
}

#[cfg(test)]
mod limits {
    pub const MIN_ROTATION_DURATION_MS: u64 = 10;
    pub const MIN_FILE_SIZE: u64 = 1_024;
    pub const MIN_LINES: u64 = 1;
}

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// A file logger that supports single-file, time-based rotation, or size-based rotation.
pub enum FileLogger {
    Single(LogFile),
    TimeRotation(LogFileTimeRotation),
    SizeRotation(LogFileSizeRotation),
}

impl LogWriter for FileLogger {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        match self {
            FileLogger::Single(w) => w.regular(line),
            FileLogger::TimeRotation(w) => w.regular(line),
            FileLogger::SizeRotation(w) => w.regular(line),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileLogger::Single(w) => w.flush(),
            FileLogger::TimeRotation(w) => w.flush(),
            FileLogger::SizeRotation(w) => w.flush(),
        }
    }
}

/// Configuration for time-based log file rotation.
#[derive(Debug, Clone)]
pub struct TimeRotationConfig {
    pub folder: PathBuf,
    pub filename: String,
    pub extension: String,
    pub rotation_duration: Duration,
    pub cleanup_after: Duration,
}

/// A log file writer that rotates files based on time intervals.
pub struct LogFileTimeRotation {
    folder: PathBuf,
    filename: String,
    extension: String,
    rotation_duration: Duration,
    cleanup_after: Duration,
    current_file: BufWriter<File>,
    file_opened_at: Instant,
}

impl LogFileTimeRotation {
    pub fn new(config: TimeRotationConfig) -> Result<Self, io::Error> {
        if config.rotation_duration.as_millis() < limits::MIN_ROTATION_DURATION_MS as u128 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "rotation_duration must be at least {} ms",
                    limits::MIN_ROTATION_DURATION_MS
                ),
            ));
        }
        fs::create_dir_all(&config.folder)?;
        let file = open_timestamped_file(&config.folder, &config.filename, &config.extension)?;
        Ok(Self {
            folder: config.folder,
            filename: config.filename,
            extension: config.extension,
            rotation_duration: config.rotation_duration,
            cleanup_after: config.cleanup_after,
            current_file: file,
            file_opened_at: Instant::now(),
        })
    }

    fn should_rotate(&self) -> bool {
        self.file_opened_at.elapsed() >= self.rotation_duration
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.current_file.flush()?;
        self.current_file = open_timestamped_file(&self.folder, &self.filename, &self.extension)?;
        self.file_opened_at = Instant::now();
        self.cleanup();
        Ok(())
    }

    fn cleanup(&self) {
        let Ok(entries) = fs::read_dir(&self.folder) else {
            return;
        };
        let prefix = format!("{}_", self.filename);
        let suffix = format!(".{}", self.extension);
        let now = Utc::now();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with(&prefix) || !name.ends_with(&suffix) {
                continue;
            }
            let timestamp_str = &name[prefix.len()..name.len() - suffix.len()];
            if let Ok(file_time) =
                chrono::NaiveDateTime::parse_from_str(timestamp_str, TIMESTAMP_FORMAT)
                && let Ok(age) = (now - file_time.and_utc()).to_std()
                && age > self.cleanup_after
            {
                let _ = fs::remove_file(entry.path());
            }
        }
    }
}

impl LogWriter for LogFileTimeRotation {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        if self.should_rotate() {
            self.rotate()?;
        }
        writeln!(self.current_file, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.current_file.flush()
    }
}

/// Configuration for size-based log file rotation.
#[derive(Debug, Clone)]
pub struct SizeRotationConfig {
    pub folder: PathBuf,
    pub filename: String,
    pub extension: String,
    pub max_file_size: Option<u64>,
    pub max_lines: Option<u64>,
    pub max_files: u32,
}

/// A log file writer that rotates files based on size or line count.
pub struct LogFileSizeRotation {
    folder: PathBuf,
    filename: String,
    extension: String,
    max_file_size: Option<u64>,
    max_lines: Option<u64>,
    max_files: u32,
    current_file: BufWriter<File>,
    current_lines: u64,
}

impl LogFileSizeRotation {
    pub fn new(config: SizeRotationConfig) -> Result<Self, io::Error> {
        if let Some(max_size) = config.max_file_size
            && max_size < limits::MIN_FILE_SIZE
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "max_file_size must be at least {} bytes",
                    limits::MIN_FILE_SIZE
                ),
            ));
        }
        if let Some(max_lines) = config.max_lines
            && max_lines < limits::MIN_LINES
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("max_lines must be at least {}", limits::MIN_LINES),
            ));
        }
        if config.max_files < 1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "max_files must be at least 1",
            ));
        }
        if config.max_file_size.is_none() && config.max_lines.is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "at least one of max_file_size or max_lines must be set",
            ));
        }
        fs::create_dir_all(&config.folder)?;
        let file = open_timestamped_file(&config.folder, &config.filename, &config.extension)?;
        Ok(Self {
            folder: config.folder,
            filename: config.filename,
            extension: config.extension,
            max_file_size: config.max_file_size,
            max_lines: config.max_lines,
            max_files: config.max_files,
            current_file: file,
            current_lines: 0,
        })
    }

    fn should_rotate(&mut self) -> io::Result<bool> {
        if let Some(max_lines) = self.max_lines
            && self.current_lines >= max_lines
        {
            return Ok(true);
        }
        if let Some(max_size) = self.max_file_size {
            self.current_file.flush()?;
            if self.current_file.get_ref().metadata()?.len() >= max_size {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.current_file.flush()?;
        self.current_file = open_timestamped_file(&self.folder, &self.filename, &self.extension)?;
        self.current_lines = 0;
        self.cleanup();
        Ok(())
    }

    fn cleanup(&self) {
        let Ok(entries) = fs::read_dir(&self.folder) else {
            return;
        };
        let prefix = format!("{}_", self.filename);
        let suffix = format!(".{}", self.extension);
        let mut matching_files: Vec<PathBuf> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                if name.starts_with(&prefix) && name.ends_with(&suffix) {
                    Some(entry.path())
                } else {
                    None
                }
            })
            .collect();
        // Timestamped names sort chronologically.
        matching_files.sort();
        let excess = matching_files.len().saturating_sub(self.max_files as usize);
        for oldest in &matching_files[..excess] {
            let _ = fs::remove_file(oldest);
        }
    }
}

impl LogWriter for LogFileSizeRotation {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        if self.should_rotate()? {
            self.rotate()?;
        }
        writeln!(self.current_file, "{line}")?;
        self.current_lines += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.current_file.flush()
    }
}

fn open_timestamped_file(
    folder: &Path,
    filename: &str,
    extension: &str,
) -> Result<BufWriter<File>, io::Error> {
    let timestamp = Utc::now().format(TIMESTAMP_FORMAT);
    let path = folder.join(format!("{filename}_{timestamp}.{extension}"));
    let file = File::options().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}
