use anyhow::Context;
use tokio::{io::AsyncWriteExt, task::JoinHandle};

use super::data::{LogLevel, LogMessage};
use super::message::Message;
use crate::{ArcFile, ArcPath, fs::Fs};

const LOG_PREFIX: &str = "newsfeed_";

/// The core of the logging system that manages logging to both stderr and log files.
///
/// It writes every message to a timestamped log file and to `latest.log`, and
/// buffers the messages that reach the configured level so they can be printed
/// to stderr when the logger is flushed.
///
/// # Examples
/// ```ignore
/// let (log, _) = LogCore::build(fs, LogLevel::Info, 7, log_dir).await?.spawn();
/// log.info("main", "Application started");
/// ```
///
/// # Thread Safety
/// All logging operations are handled sequentially by the actor task.
#[derive(Debug)]
pub struct LogCore {
    /// Filesystem interface for file operations
    fs: Fs,
    /// Directory where log files are stored
    log_dir: ArcPath,
    /// Path to the current timestamped log file
    log_path: ArcPath,
    /// Handle to the current log file
    log_file: ArcFile,
    /// Handle to the "latest" log file
    latest_log_file: ArcFile,
    /// Buffer of messages to be printed to stderr
    logs_to_print: Vec<LogMessage>,
    /// Minimum level of messages to be printed to stderr
    print_level: LogLevel,
    /// Maximum age of log files in days before they are deleted
    max_age: usize,
}

impl LogCore {
    /// Creates the log directory and opens both log files.
    ///
    /// # Errors
    /// Returns an error if the directory or either log file cannot be created.
    pub async fn build(
        fs: Fs,
        level: LogLevel,
        max_age: usize,
        log_dir: ArcPath,
    ) -> anyhow::Result<Self> {
        let log_path = ArcPath::from(&log_dir.join(format!(
            "{}{}.log",
            LOG_PREFIX,
            chrono::Utc::now().format("%Y-%m-%d-%H-%M-%S")
        )));
        let latest_log_path = ArcPath::from(&log_dir.join("latest.log"));

        fs.mkdir(log_dir.clone())
            .await
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_file = fs
            .open_file(log_path.clone())
            .await
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        let latest_log_file = fs
            .open_file(latest_log_path.clone())
            .await
            .with_context(|| {
                format!(
                    "Failed to create latest log file: {}",
                    latest_log_path.display()
                )
            })?;
        latest_log_file
            .write()
            .await
            .set_len(0)
            .await
            .context("Failed to truncate the latest log file")?;

        Ok(Self {
            fs,
            log_dir,
            log_path,
            log_file,
            latest_log_file,
            logs_to_print: Vec::new(),
            print_level: level,
            max_age,
        })
    }

    /// Transforms the logger core instance into an actor.
    pub fn spawn(mut self) -> (super::Log, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Message::Log(msg) => {
                        self.log(msg).await;
                    }
                    Message::Flush => {
                        self.flush();
                        rx.close();
                        break;
                    }
                    Message::CollectGarbage => {
                        self.collect_garbage().await;
                    }
                }
            }
        });
        (super::Log::Actual(tx), handle)
    }

    async fn write_line(file: &ArcFile, line: &str) -> std::io::Result<()> {
        let mut lock = file.write().await;
        lock.write_all(line.as_bytes()).await?;
        lock.flush().await
    }

    /// Writes a message to both log files and buffers it for stderr if its
    /// level reaches the print level.
    async fn log(&mut self, message: LogMessage) {
        let line = format!("{}\n", &message);

        if let Err(e) = Self::write_line(&self.log_file, &line).await {
            eprintln!("Failed to write to the current log file: {}", e);
        }
        if let Err(e) = Self::write_line(&self.latest_log_file, &line).await {
            eprintln!("Failed to write to the latest log file: {}", e);
        }

        if message.level >= self.print_level {
            self.logs_to_print.push(message);
        }
    }

    /// Writes buffered log messages to stderr and destroys the logger.
    fn flush(self) {
        for message in &self.logs_to_print {
            eprintln!("{}", message);
        }
        if !self.logs_to_print.is_empty() {
            eprintln!("Check the full log file: {}", self.log_path.display());
        }
    }

    /// Deletes log files older than `max_age` days. A `max_age` of 0 keeps
    /// every file.
    async fn collect_garbage(&mut self) {
        if self.max_age == 0 {
            return;
        }
        let now = std::time::SystemTime::now();
        let Ok(logs) = self.fs.read_dir(self.log_dir.clone()).await else {
            self.log(LogMessage {
                level: LogLevel::Error,
                scope: "log",
                message: "Failed to read the logs directory during garbage collection".into(),
            })
            .await;
            return;
        };
        for log in logs {
            if log == self.log_path {
                continue;
            }
            let Some(filename) = log.file_name() else {
                continue;
            };
            let filename = filename.to_string_lossy();
            if !filename.ends_with(".log") || !filename.starts_with(LOG_PREFIX) {
                continue;
            }
            let Ok(Ok(modified)) = log.metadata().map(|meta| meta.modified()) else {
                continue;
            };
            let Ok(age) = now.duration_since(modified) else {
                continue;
            };
            let age = age.as_secs() / 60 / 60 / 24;
            if age as usize > self.max_age && self.fs.remove_file(log.clone()).await.is_err() {
                self.log(LogMessage {
                    level: LogLevel::Warning,
                    scope: "log",
                    message: format!("Failed to remove the log file: {}", log.display()),
                })
                .await;
            }
        }
    }
}
