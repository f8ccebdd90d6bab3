use std::io;

use tokio::sync::oneshot;

use crate::{ArcFile, ArcPath};

/// Messages that can be sent to the [`Fs`](super::Fs) actor.
#[derive(Debug)]
pub enum Message {
    /// Opens a file and returns its handle
    OpenFile {
        tx: oneshot::Sender<io::Result<ArcFile>>,
        path: ArcPath,
    },
    /// Removes a file handle from the cache
    CloseFile { path: ArcPath },
    /// Removes a file from the filesystem
    RemoveFile {
        tx: oneshot::Sender<io::Result<()>>,
        path: ArcPath,
    },
    /// Lists the entries of a directory
    ReadDir {
        tx: oneshot::Sender<io::Result<Vec<ArcPath>>>,
        path: ArcPath,
    },
    /// Creates a directory and its parents
    MkDir {
        tx: oneshot::Sender<io::Result<()>>,
        path: ArcPath,
    },
    /// Reads a whole file into a string
    ReadToString {
        tx: oneshot::Sender<io::Result<String>>,
        path: ArcPath,
    },
    /// Replaces the contents of a file, creating it if needed
    Write {
        tx: oneshot::Sender<io::Result<()>>,
        path: ArcPath,
        contents: String,
    },
}
