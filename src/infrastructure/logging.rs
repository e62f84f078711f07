use crate::domain::ports::{LogLevel, LogRecord, LogSink, NotificationLogger};
use async_trait::async_trait;
use serde::Deserialize;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::{Mutex, mpsc};

const TARGET: &str = "paynotify::notification";

/// Which record levels reach the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevelFilter {
    All,
    Errors,
    Transaction,
    #[default]
    ErrorsAndTransaction,
}

impl LogLevelFilter {
    pub fn allows(&self, level: LogLevel) -> bool {
        match self {
            LogLevelFilter::All => true,
            LogLevelFilter::Errors => level == LogLevel::Error,
            LogLevelFilter::Transaction => level == LogLevel::Transaction,
            LogLevelFilter::ErrorsAndTransaction => level != LogLevel::Notice,
        }
    }
}

/// Drops records the filter does not allow before they reach `inner`.
pub struct FilteredLogger<L> {
    inner: L,
    filter: LogLevelFilter,
}

impl<L: NotificationLogger> FilteredLogger<L> {
    pub fn new(inner: L, filter: LogLevelFilter) -> Self {
        Self { inner, filter }
    }
}

impl<L: NotificationLogger> NotificationLogger for FilteredLogger<L> {
    fn log(&self, level: LogLevel, message: &str) {
        if self.filter.allows(level) {
            self.inner.log(level, message);
        }
    }
}

/// Forwards records to the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl NotificationLogger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Notice => tracing::info!(target: TARGET, kind = "notice", "{message}"),
            LogLevel::Transaction => {
                tracing::info!(target: TARGET, kind = "transaction", "{message}")
            }
            LogLevel::Error => tracing::error!(target: TARGET, "{message}"),
        }
    }
}

/// Hands records to a background drain over a bounded channel.
///
/// `log` never waits: when the channel is full or the drain is gone the record
/// is dropped, counted, and reported through `tracing`.
#[derive(Clone)]
pub struct ChannelLogger {
    sender: mpsc::Sender<LogRecord>,
    dropped: Arc<AtomicU64>,
}

impl ChannelLogger {
    pub fn new(capacity: usize) -> (Self, LogDrain) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let logger = Self {
            sender,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (logger, LogDrain { receiver })
    }

    /// Number of records lost since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl NotificationLogger for ChannelLogger {
    fn log(&self, level: LogLevel, message: &str) {
        let record = LogRecord {
            level,
            message: message.to_string(),
        };
        if let Err(err) = self.sender.try_send(record) {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            let reason = match err {
                mpsc::error::TrySendError::Full(_) => "full",
                mpsc::error::TrySendError::Closed(_) => "closed",
            };
            tracing::warn!(target: TARGET, dropped, reason, "notification log record dropped");
        }
    }
}

/// Receiving end of a [`ChannelLogger`].
pub struct LogDrain {
    receiver: mpsc::Receiver<LogRecord>,
}

impl LogDrain {
    /// Writes records into `sink` until every `ChannelLogger` clone is dropped.
    ///
    /// Sink failures are reported and skipped. Returns the number of records
    /// written.
    pub async fn run<S: LogSink>(mut self, sink: S) -> u64 {
        let mut written = 0;
        while let Some(record) = self.receiver.recv().await {
            match sink.write(&record).await {
                Ok(()) => written += 1,
                Err(e) => tracing::warn!(target: TARGET, error = %e, "failed to write log record"),
            }
        }
        if let Err(e) = sink.flush().await {
            tracing::warn!(target: TARGET, error = %e, "failed to flush log sink");
        }
        written
    }
}

/// Appends `HH:MM:SS [PAYNOTIFY] LEVEL: message` lines to a file.
pub struct FileLogSink {
    writer: Mutex<BufWriter<File>>,
}

impl FileLogSink {
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

#[async_trait]
impl LogSink for FileLogSink {
    async fn write(&self, record: &LogRecord) -> io::Result<()> {
        let line = format!(
            "{} [PAYNOTIFY] {}: {}\n",
            chrono::Local::now().format("%H:%M:%S"),
            record.level,
            record.message
        );
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await
    }

    async fn flush(&self) -> io::Result<()> {
        self.writer.lock().await.flush().await
    }
}
