use std::{collections::HashMap, io, sync::Arc};

use tokio::sync::Mutex;

use crate::{ArcFile, ArcPath};

/// A mock implementation of the Fs actor, used for testing.
///
/// Whole-file contents and directories live in memory. Mocks cannot open
/// file handles on their own: pass them to [`Mock::with_files`] beforehand.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<ArcPath, ArcFile>,
    contents: HashMap<ArcPath, String>,
    dirs: HashMap<ArcPath, Vec<ArcPath>>,
}

fn not_found(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{what} not found"))
}

impl Mock {
    pub fn with_files(files: HashMap<ArcPath, ArcFile>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                files,
                ..Default::default()
            })),
        }
    }

    pub async fn open_file(&self, path: ArcPath) -> io::Result<ArcFile> {
        let lock = self.inner.lock().await;
        lock.files.get(&path).cloned().ok_or_else(|| not_found("file"))
    }

    pub async fn close_file(&self, path: ArcPath) {
        self.inner.lock().await.files.remove(&path);
    }

    pub async fn remove_file(&self, path: ArcPath) -> io::Result<()> {
        let mut lock = self.inner.lock().await;
        let had_handle = lock.files.remove(&path).is_some();
        let had_contents = lock.contents.remove(&path).is_some();
        if had_handle || had_contents {
            Ok(())
        } else {
            Err(not_found("file"))
        }
    }

    pub async fn read_dir(&self, path: ArcPath) -> io::Result<Vec<ArcPath>> {
        let lock = self.inner.lock().await;
        lock.dirs.get(&path).cloned().ok_or_else(|| not_found("directory"))
    }

    pub async fn mkdir(&self, path: ArcPath) -> io::Result<()> {
        self.inner.lock().await.dirs.entry(path).or_default();
        Ok(())
    }

    pub async fn read_to_string(&self, path: ArcPath) -> io::Result<String> {
        let lock = self.inner.lock().await;
        lock.contents.get(&path).cloned().ok_or_else(|| not_found("file"))
    }

    pub async fn write(&self, path: ArcPath, contents: String) -> io::Result<()> {
        self.inner.lock().await.contents.insert(path, contents);
        Ok(())
    }
}
