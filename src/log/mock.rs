use std::{collections::VecDeque, sync::Arc};
use tokio::sync::Mutex;

use super::data::{LogLevel, LogMessage};

/// Mock implementation of the Log actor for testing purposes.
///
/// Messages are kept in memory so tests can assert on what was logged.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    messages: Arc<Mutex<VecDeque<LogMessage>>>,
}

impl Mock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self, scope: &'static str, message: String, level: LogLevel) {
        let messages = self.messages.clone();
        tokio::spawn(async move {
            let mut lock = messages.lock().await;
            lock.push_back(LogMessage {
                level,
                scope,
                message,
            });
        });
    }

    pub async fn flush(self) {
        let lock = self.messages.lock().await;
        for message in lock.iter() {
            eprintln!("{message}");
        }
    }

    pub async fn get_messages(&self) -> Vec<LogMessage> {
        let lock = self.messages.lock().await;
        lock.iter().cloned().collect()
    }
}
