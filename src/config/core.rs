use anyhow::Context;

use crate::{ArcPath, fs::Fs};

use super::{data::Data, message::Message};

/// The core configuration actor that handles file I/O and data management.
///
/// The configuration is kept in memory and only touches the file on
/// [`Message::Load`] and [`Message::Save`].
pub struct Core {
    /// The filesystem actor for file operations
    fs: Fs,
    /// The path to the configuration file
    path: ArcPath,
    /// The current configuration data
    data: Data,
}

impl Core {
    pub fn new(fs: Fs, path: ArcPath) -> Self {
        Self {
            fs,
            path,
            data: Data::default(),
        }
    }

    /// Spawns the configuration actor and returns a handle to it.
    pub fn spawn(mut self) -> (super::Config, tokio::task::JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    Message::Load { tx } => {
                        let res = self.load().await;
                        let _ = tx.send(res);
                    }
                    Message::Save { tx } => {
                        let res = self.save().await;
                        let _ = tx.send(res);
                    }
                    Message::GetPath { opt, tx } => {
                        let _ = tx.send(self.data.path(opt));
                    }
                    Message::SetPath { opt, path } => {
                        self.data.set_path(opt, path);
                    }
                    Message::GetLogLevel { tx } => {
                        let _ = tx.send(self.data.log_level());
                    }
                    Message::SetLogLevel { level } => {
                        self.data.set_log_level(level);
                    }
                    Message::GetUSize { opt, tx } => {
                        let _ = tx.send(self.data.usize(opt));
                    }
                    Message::SetUSize { opt, size } => {
                        self.data.set_usize(opt, size);
                    }
                    Message::GetDuration { opt, tx } => {
                        let _ = tx.send(self.data.duration(opt));
                    }
                    Message::SetDuration { opt, duration } => {
                        self.data.set_duration(opt, duration);
                    }
                    Message::GetString { opt, tx } => {
                        let _ = tx.send(self.data.string(opt));
                    }
                    Message::SetString { opt, value } => {
                        self.data.set_string(opt, value);
                    }
                }
            }
        });
        (super::Config::Actual(tx), handle)
    }

    async fn load(&mut self) -> anyhow::Result<()> {
        let contents = self
            .fs
            .read_to_string(self.path.clone())
            .await
            .with_context(|| format!("Reading config file {}", self.path.display()))?;
        self.data = toml::from_str(&contents)
            .with_context(|| format!("Parsing config file {}", self.path.display()))?;
        Ok(())
    }

    async fn save(&self) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Serializing config")?;
        if let Some(parent) = self.path.parent() {
            self.fs
                .mkdir(ArcPath::from(parent))
                .await
                .context("Creating config directory")?;
        }
        self.fs
            .write(self.path.clone(), contents)
            .await
            .with_context(|| format!("Writing config file {}", self.path.display()))
    }
}
