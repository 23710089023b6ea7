use std::{
    fs::File,
    io::{self, BufWriter, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

/// A destination for formatted log lines.
///
/// Each writer is owned by a single log thread, so implementations need no
/// internal locking of their own.
pub trait LogWriter {
    fn regular(&mut self, line: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
    /// Whether level tags should carry terminal colors.
    fn colored(&self) -> bool {
        false
    }
}

impl LogWriter for Box<dyn LogWriter + Send> {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        (**self).regular(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn colored(&self) -> bool {
        (**self).colored()
    }
}

/// Appends lines to a single file, created if it does not exist.
pub struct LogFile {
    file: BufWriter<File>,
}

impl LogFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let file = File::options().create(true).append(true).open(path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }
}

impl LogWriter for LogFile {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.file, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Console writer. Level tags are colored only when stdout is a terminal.
#[derive(Debug)]
pub struct LogStdout {
    colored: bool,
}

impl Default for LogStdout {
    fn default() -> Self {
        Self {
            colored: io::stdout().is_terminal(),
        }
    }
}

impl LogWriter for LogStdout {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }

    fn colored(&self) -> bool {
        self.colored
    }
}

/// In-memory sink. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct LogMemory {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogWriter for LogMemory {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
