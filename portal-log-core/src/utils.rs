use std::{
    io,
    ops::Deref,
    sync::{Arc, Mutex, PoisonError},
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crossbeam_channel::{RecvTimeoutError, Sender, bounded, unbounded};

use crate::{
    log_writer::LogWriter,
    record::{LogFormat, LogRecord},
};

const BATCH_SIZE: usize = 32;

/// Message consumed by a log thread.
#[derive(Debug)]
pub enum LogMessage {
    /// A record to format and write.
    Record(Arc<LogRecord>),
    /// Flush the writer, then acknowledge on the enclosed channel.
    Flush(Sender<()>),
    /// Flush and stop the thread.
    Shutdown,
}

/// Sending half of a log thread. Dropping it shuts the thread down and joins it.
pub struct LogSender {
    sender: Sender<LogMessage>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl Deref for LogSender {
    type Target = Sender<LogMessage>;
    fn deref(&self) -> &Self::Target {
        &self.sender
    }
}

impl Drop for LogSender {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl LogSender {
    pub fn new(sender: Sender<LogMessage>, handler: JoinHandle<()>) -> Self {
        Self {
            sender,
            handler: Mutex::new(Some(handler)),
        }
    }

    /// Queues a record. Best-effort: a stopped thread drops it silently.
    pub fn send_record(&self, record: Arc<LogRecord>) {
        let _ = self.send(LogMessage::Record(record));
    }

    /// Blocks until every message queued before this call is written and flushed.
    pub fn flush(&self) {
        let (ack, done) = bounded(1);
        if self.send(LogMessage::Flush(ack)).is_ok() {
            let _ = done.recv();
        }
    }

    pub fn shutdown(&self) {
        let mut guard = self.handler.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = guard.take() {
            // The channel may already be closed
            let _ = self.send(LogMessage::Shutdown);
            if handle.join().is_err() {
                eprintln!("portal-log: log thread panicked");
            }
        }
    }
}

fn report(result: io::Result<()>) {
    if let Err(err) = result {
        eprintln!("portal-log: unable to write log record: {err}");
    }
}

/// Spawns a thread owning `writer` and returns the sender feeding it.
///
/// Records are formatted on the log thread, in batches of up to 32, and the
/// writer is flushed at least every `flush_interval`.
pub fn spawn_log_thread<W: LogWriter + Send + 'static>(
    mut writer: W,
    format: LogFormat,
    flush_interval: Duration,
) -> io::Result<LogSender> {
    let (sender, receiver) = unbounded::<LogMessage>();
    let handler = std::thread::Builder::new()
        .name("portal-log".into())
        .spawn(move || {
            let mut batch = Vec::with_capacity(BATCH_SIZE);
            let mut last_flush = Instant::now();
            loop {
                let elapsed = last_flush.elapsed();
                let timeout = if elapsed >= flush_interval {
                    Duration::from_millis(1)
                } else {
                    flush_interval - elapsed
                };

                match receiver.recv_timeout(timeout) {
                    Ok(msg) => {
                        batch.push(msg);
                        while let Ok(msg) = receiver.try_recv() {
                            batch.push(msg);
                            if batch.len() >= BATCH_SIZE {
                                break;
                            }
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if last_flush.elapsed() >= flush_interval {
                            report(writer.flush());
                            last_flush = Instant::now();
                        }
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        report(writer.flush());
                        break;
                    }
                }

                let mut should_shutdown = false;
                for message in batch.drain(..) {
                    match message {
                        LogMessage::Record(record) => {
                            let line = record.format(format, writer.colored());
                            report(writer.regular(&line));
                        }
                        LogMessage::Flush(ack) => {
                            report(writer.flush());
                            last_flush = Instant::now();
                            let _ = ack.send(());
                        }
                        LogMessage::Shutdown => {
                            should_shutdown = true;
                            break;
                        }
                    }
                }

                if should_shutdown || last_flush.elapsed() >= flush_interval {
                    report(writer.flush());
                    last_flush = Instant::now();
                }

                if should_shutdown {
                    break;
                }
            }
        })?;
    Ok(LogSender::new(sender, handler))
}
