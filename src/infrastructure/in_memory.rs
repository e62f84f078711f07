use crate::domain::ports::{LogLevel, LogRecord, NotificationLogger};
use std::sync::{Arc, RwLock};

/// A thread-safe in-memory recorder of notification log records.
///
/// Uses `Arc<RwLock<Vec<LogRecord>>>` so clones share one buffer: hand a clone
/// to the validator and inspect the original.
#[derive(Default, Clone)]
pub struct InMemoryLogger {
    records: Arc<RwLock<Vec<LogRecord>>>,
}

impl InMemoryLogger {
    /// Creates a new, empty in-memory logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        match self.records.read() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NotificationLogger for InMemoryLogger {
    fn log(&self, level: LogLevel, message: &str) {
        let record = LogRecord {
            level,
            message: message.to_string(),
        };
        match self.records.write() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}
