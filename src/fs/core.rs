use std::{collections::HashMap, io};

use tokio::{
    fs::OpenOptions,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use super::message::Message;
use crate::{ArcFile, ArcPath};

/// The core of the Fs actor, responsible for handling filesystem operations.
///
/// Open files are cached so that opening the same path twice hands out the
/// same handle.
#[derive(Debug, Default)]
pub struct Core {
    /// The cache of open files, mapping paths to their file handles
    files: HashMap<ArcPath, ArcFile>,
}

impl Core {
    pub fn new() -> Self {
        Default::default()
    }

    /// Transforms an instance of [`Core`] into an actor ready to receive
    /// messages.
    pub fn spawn(mut self) -> (super::Fs, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                use Message::*;
                match msg {
                    OpenFile { tx, path } => self.open_file(tx, path).await,
                    CloseFile { path } => {
                        self.files.remove(&path);
                    }
                    RemoveFile { tx, path } => {
                        self.files.remove(&path);
                        let _ = tx.send(tokio::fs::remove_file(&path).await);
                    }
                    ReadDir { tx, path } => {
                        let _ = tx.send(Self::read_dir(&path).await);
                    }
                    MkDir { tx, path } => {
                        let _ = tx.send(tokio::fs::create_dir_all(&path).await);
                    }
                    ReadToString { tx, path } => {
                        let _ = tx.send(tokio::fs::read_to_string(&path).await);
                    }
                    Write { tx, path, contents } => {
                        let _ = tx.send(tokio::fs::write(&path, contents).await);
                    }
                }
            }
        });

        (super::Fs::Actual(tx), handle)
    }

    /// Opens a file for appending, creating it if needed, or returns the
    /// cached handle.
    async fn open_file(&mut self, tx: oneshot::Sender<io::Result<ArcFile>>, path: ArcPath) {
        if let Some(file) = self.files.get(&path) {
            let _ = tx.send(Ok(file.clone()));
            return;
        }

        match OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .await
        {
            Ok(file) => {
                let file = ArcFile::new(tokio::sync::RwLock::new(file));
                self.files.insert(path, file.clone());
                let _ = tx.send(Ok(file));
            }
            Err(e) => {
                let _ = tx.send(Err(e));
            }
        }
    }

    async fn read_dir(path: &ArcPath) -> io::Result<Vec<ArcPath>> {
        let mut rd = tokio::fs::read_dir(path).await?;
        let mut entries = Vec::new();
        while let Some(entry) = rd.next_entry().await? {
            entries.push(ArcPath::from(entry.path()));
        }
        Ok(entries)
    }
}
