use std::fmt::Display;

use anyhow::Context;
use tokio::{sync::mpsc::Sender, task::JoinHandle};

use crate::{ArcPath, fs::Fs};

mod core;
mod data;
mod message;
mod mock;

pub use self::core::LogCore;
pub use data::{LogLevel, LogMessage};
use message::Message;

/// The logging actor that provides a thread-safe interface for logging operations.
///
/// Every message carries a static scope naming the component that logged it.
///
/// # Examples
/// ```ignore
/// let log = Log::spawn(fs, LogLevel::Warning, 7, log_dir).await?;
/// log.info("main", "Starting newsfeed");
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or mock reference.
#[derive(Debug, Clone)]
pub enum Log {
    /// A real logging actor that writes to files and stderr
    Actual(Sender<Message>),
    /// A mock implementation for testing that keeps messages in memory
    Mock(mock::Mock),
}

impl From<LogCore> for Log {
    fn from(value: LogCore) -> Self {
        value.spawn().0
    }
}

impl Log {
    /// Builds a [`LogCore`] and spawns it as an actor.
    ///
    /// # Errors
    /// If the log directory or the log files cannot be created.
    pub async fn spawn(
        fs: Fs,
        level: LogLevel,
        max_age: usize,
        log_dir: ArcPath,
    ) -> anyhow::Result<Self> {
        let core = LogCore::build(fs, level, max_age, log_dir)
            .await
            .context("Building the logger")?;
        Ok(core.into())
    }

    /// Creates a logger that keeps its messages in memory.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::new())
    }

    /// Sends the message to the logger in a new task so it won't block the
    /// caller.
    ///
    /// # Panics
    /// If the logger was flushed
    fn log(&self, scope: &'static str, message: String, level: LogLevel) {
        let sender = match self {
            Log::Mock(mock) => return mock.log(scope, message, level),
            Log::Actual(sender) => sender.clone(),
        };

        tokio::spawn(async move {
            sender
                .send(Message::Log(LogMessage {
                    level,
                    scope,
                    message,
                }))
                .await
                .expect("Attempt to use logger after a flush");
        });
    }

    /// Log a message with the `INFO` level
    pub fn info<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Info);
    }

    /// Log a message with the `WARNING` level
    pub fn warn<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Warning);
    }

    /// Log a message with the `ERROR` level
    pub fn error<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Error);
    }

    /// Log an info message if the result is an error and return the result
    /// as is
    pub fn info_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Info);
        }
        result
    }

    /// Log a warning message if the result is an error and return the
    /// result as is
    pub fn warn_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Warning);
        }
        result
    }

    /// Log an error message if the result is an error and return the result
    /// as is
    pub fn error_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Error);
        }
        result
    }

    /// Flushes the logger by printing its buffered messages to [`stderr`].
    /// After this method is called, the logger is destroyed and any attempt
    /// to use it will panic.
    ///
    /// [`stderr`]: std::io::stderr
    pub fn flush(self) -> JoinHandle<()> {
        match self {
            Self::Actual(sender) => tokio::spawn(async move {
                sender
                    .send(Message::Flush)
                    .await
                    .expect("Flushing a logger twice");
            }),
            Self::Mock(mock) => tokio::spawn(mock.flush()),
        }
    }

    /// Deletes the log files older than the `max_age` set when the logger was
    /// built.
    ///
    /// # Panics
    /// If called after a flush
    pub async fn collect_garbage(&self) {
        let Self::Actual(sender) = self else {
            return;
        };

        sender
            .send(Message::CollectGarbage)
            .await
            .expect("Attempt to use logger after a flush")
    }

    /// Messages recorded by a mock logger, `None` for a real one.
    pub async fn get_messages(&self) -> Option<Vec<LogMessage>> {
        match self {
            Self::Actual(_) => None,
            Self::Mock(mock) => Some(mock.get_messages().await),
        }
    }
}
