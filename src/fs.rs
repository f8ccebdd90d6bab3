use std::{collections::HashMap, io};

use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::{ArcFile, ArcPath};

mod core;
mod message;
mod mock;

use message::Message;

/// The fs actor is responsible for handling filesystem operations.
///
/// This enum represents either a real filesystem actor or a mock implementation
/// for testing purposes.
///
/// # Examples
/// ```ignore
/// let fs = Fs::spawn();
/// fs.mkdir(ArcPath::from("/tmp/newsfeed")).await?;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or mock reference.
#[derive(Debug, Clone)]
pub enum Fs {
    /// A real filesystem actor that interacts with the system
    Actual(Sender<Message>),
    /// A mock implementation for testing
    Mock(mock::Mock),
}

impl Fs {
    /// Spawns a new filesystem actor.
    pub fn spawn() -> Self {
        self::core::Core::new().spawn().0
    }

    /// Creates an in-memory filesystem with no open files.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::default())
    }

    /// Creates an in-memory filesystem that can hand out the given handles.
    pub fn mock_with_files(files: HashMap<ArcPath, ArcFile>) -> Self {
        Self::Mock(mock::Mock::with_files(files))
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
            .with_context(|| format!("{} with Fs", what))
            .expect("Fs actor died");
        rx.await
            .with_context(|| format!("Awaiting response for {} with Fs", what))
            .expect("Fs actor died")
    }

    /// Opens a file for writing, creating it if needed.
    ///
    /// File opening is cached, so opening a file multiple times returns the
    /// same handle.
    pub async fn open_file(&self, path: ArcPath) -> io::Result<ArcFile> {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Opening file", |tx| Message::OpenFile { tx, path }).await
            }
            Self::Mock(mock) => mock.open_file(path).await,
        }
    }

    /// Removes a file handle from the cache. The file is closed once every
    /// clone of the handle is dropped.
    pub async fn close_file(&self, path: ArcPath) {
        match self {
            Self::Actual(sender) => sender
                .send(Message::CloseFile { path })
                .await
                .context("Closing file with Fs")
                .expect("Fs actor died"),
            Self::Mock(mock) => mock.close_file(path).await,
        }
    }

    /// Removes a file from the filesystem.
    pub async fn remove_file(&self, path: ArcPath) -> io::Result<()> {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Removing file", |tx| Message::RemoveFile { tx, path })
                    .await
            }
            Self::Mock(mock) => mock.remove_file(path).await,
        }
    }

    /// Lists the entries of a directory.
    pub async fn read_dir(&self, path: ArcPath) -> io::Result<Vec<ArcPath>> {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Reading directory", |tx| Message::ReadDir { tx, path })
                    .await
            }
            Self::Mock(mock) => mock.read_dir(path).await,
        }
    }

    /// Creates a directory and its parents if they don't exist.
    pub async fn mkdir(&self, path: ArcPath) -> io::Result<()> {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Creating directory", |tx| Message::MkDir { tx, path })
                    .await
            }
            Self::Mock(mock) => mock.mkdir(path).await,
        }
    }

    /// Reads the whole file into a string.
    pub async fn read_to_string(&self, path: ArcPath) -> io::Result<String> {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Reading file", |tx| Message::ReadToString {
                    tx,
                    path,
                })
                .await
            }
            Self::Mock(mock) => mock.read_to_string(path).await,
        }
    }

    /// Replaces the contents of a file, creating it if needed.
    pub async fn write(&self, path: ArcPath, contents: String) -> io::Result<()> {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Writing file", |tx| Message::Write {
                    tx,
                    path,
                    contents,
                })
                .await
            }
            Self::Mock(mock) => mock.write(path, contents).await,
        }
    }
}
