use std::time::Duration;

use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

pub use data::{Data, DurationOpt, PathOpt, StrOpt, USizeOpt};
use message::Message;

use crate::{ArcPath, ArcStr, fs::Fs, log::LogLevel};

mod core;
mod data;
mod message;
mod mock;
#[cfg(test)]
mod tests;

/// The configuration actor that provides a thread-safe interface for
/// configuration operations.
///
/// # Examples
/// ```ignore
/// let config = Config::spawn(fs, config_path);
/// config.load().await?;
/// let ttl = config.duration(DurationOpt::CacheTtl).await;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or mock reference.
#[derive(Debug, Clone)]
pub enum Config {
    /// A real configuration actor that reads from and writes to a TOML file
    Actual(Sender<Message>),
    /// A mock implementation for testing that stores data in memory
    Mock(mock::Mock),
}

impl Config {
    /// Spawns a configuration actor backed by the file at `path`. The actor
    /// starts with default values until [`Config::load`] is called.
    pub fn spawn(fs: Fs, path: ArcPath) -> Self {
        self::core::Core::new(fs, path).spawn().0
    }

    pub fn mock(data: Data) -> Self {
        Self::Mock(mock::Mock::new(data))
    }

    async fn request<T>(
        sender: &Sender<Message>,
        what: &'static str,
        message: impl FnOnce(oneshot::Sender<T>) -> Message,
    ) -> T {
        let (tx, rx) = oneshot::channel();
        sender
            .send(message(tx))
            .await
            .with_context(|| format!("{} with Config actor", what))
            .expect("Config actor died");
        rx.await
            .with_context(|| format!("Awaiting response for {} with Config actor", what))
            .expect("Config actor died")
    }

    async fn notify(sender: &Sender<Message>, what: &'static str, message: Message) {
        sender
            .send(message)
            .await
            .with_context(|| format!("{} with Config actor", what))
            .expect("Config actor died");
    }

    /// Replaces the in-memory configuration with the contents of the file.
    ///
    /// # Errors
    /// If the file is missing or is not valid TOML. The previous values are
    /// kept in that case.
    pub async fn load(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Loading config", |tx| Message::Load { tx }).await
            }
            Self::Mock(_) => Ok(()),
        }
    }

    /// Writes the in-memory configuration to the file, creating its parent
    /// directory if needed.
    pub async fn save(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Saving config", |tx| Message::Save { tx }).await
            }
            Self::Mock(_) => Ok(()),
        }
    }

    pub async fn path(&self, opt: PathOpt) -> ArcPath {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Getting path", |tx| Message::GetPath { opt, tx }).await
            }
            Self::Mock(mock) => mock.path(opt).await,
        }
    }

    pub async fn set_path(&self, opt: PathOpt, path: ArcPath) {
        match self {
            Self::Actual(sender) => {
                Self::notify(sender, "Setting path", Message::SetPath { opt, path }).await
            }
            Self::Mock(mock) => mock.set_path(opt, path).await,
        }
    }

    pub async fn log_level(&self) -> LogLevel {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Getting log level", |tx| Message::GetLogLevel { tx }).await
            }
            Self::Mock(mock) => mock.log_level().await,
        }
    }

    pub async fn set_log_level(&self, level: LogLevel) {
        match self {
            Self::Actual(sender) => {
                Self::notify(sender, "Setting log level", Message::SetLogLevel { level }).await
            }
            Self::Mock(mock) => mock.set_log_level(level).await,
        }
    }

    pub async fn usize(&self, opt: USizeOpt) -> usize {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Getting numeric value", |tx| Message::GetUSize {
                    opt,
                    tx,
                })
                .await
            }
            Self::Mock(mock) => mock.usize(opt).await,
        }
    }

    pub async fn set_usize(&self, opt: USizeOpt, value: usize) {
        match self {
            Self::Actual(sender) => {
                Self::notify(
                    sender,
                    "Setting numeric value",
                    Message::SetUSize { opt, size: value },
                )
                .await
            }
            Self::Mock(mock) => mock.set_usize(opt, value).await,
        }
    }

    /// Gets a duration value. Durations are kept with a resolution of one
    /// second.
    pub async fn duration(&self, opt: DurationOpt) -> Duration {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Getting duration", |tx| Message::GetDuration {
                    opt,
                    tx,
                })
                .await
            }
            Self::Mock(mock) => mock.duration(opt).await,
        }
    }

    pub async fn set_duration(&self, opt: DurationOpt, duration: Duration) {
        match self {
            Self::Actual(sender) => {
                Self::notify(
                    sender,
                    "Setting duration",
                    Message::SetDuration { opt, duration },
                )
                .await
            }
            Self::Mock(mock) => mock.set_duration(opt, duration).await,
        }
    }

    pub async fn string(&self, opt: StrOpt) -> ArcStr {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Getting string", |tx| Message::GetString { opt, tx }).await
            }
            Self::Mock(mock) => mock.string(opt).await,
        }
    }

    pub async fn set_string(&self, opt: StrOpt, value: ArcStr) {
        match self {
            Self::Actual(sender) => {
                Self::notify(sender, "Setting string", Message::SetString { opt, value }).await
            }
            Self::Mock(mock) => mock.set_string(opt, value).await,
        }
    }
}
