use super::notification::MerchantCredentials;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

/// Severity of a notification log record, as the gateway SDK grades them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Notice,
    Transaction,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Notice => "NOTICE",
            LogLevel::Transaction => "TRANSACTION",
            LogLevel::Error => "ERROR",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Receives one record per validation step.
///
/// Fire-and-forget: implementations swallow their own failures so logging can
/// never change a verdict.
pub trait NotificationLogger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

pub type NotificationLoggerBox = Box<dyn NotificationLogger>;

impl<L: NotificationLogger + ?Sized> NotificationLogger for Box<L> {
    fn log(&self, level: LogLevel, message: &str) {
        (**self).log(level, message)
    }
}

impl<L: NotificationLogger + ?Sized> NotificationLogger for std::sync::Arc<L> {
    fn log(&self, level: LogLevel, message: &str) {
        (**self).log(level, message)
    }
}

/// Supplies the merchant's credentials before any callback is validated.
pub trait CredentialsProvider {
    fn credentials(&self) -> MerchantCredentials;
}

/// Durable destination for drained log records.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn write(&self, record: &LogRecord) -> io::Result<()>;
    async fn flush(&self) -> io::Result<()>;
}
