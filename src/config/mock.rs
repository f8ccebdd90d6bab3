use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use super::data::{Data, DurationOpt, PathOpt, StrOpt, USizeOpt};
use crate::{ArcPath, ArcStr, log::LogLevel};

/// Mock implementation of the Config actor for testing purposes.
///
/// Values live in memory; loading and saving always succeed.
#[derive(Debug, Clone)]
pub struct Mock {
    data: Arc<Mutex<Data>>,
}

impl Mock {
    pub fn new(data: Data) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn path(&self, opt: PathOpt) -> ArcPath {
        self.data.lock().await.path(opt)
    }

    pub async fn set_path(&self, opt: PathOpt, path: ArcPath) {
        self.data.lock().await.set_path(opt, path);
    }

    pub async fn log_level(&self) -> LogLevel {
        self.data.lock().await.log_level()
    }

    pub async fn set_log_level(&self, level: LogLevel) {
        self.data.lock().await.set_log_level(level);
    }

    pub async fn usize(&self, opt: USizeOpt) -> usize {
        self.data.lock().await.usize(opt)
    }

    pub async fn set_usize(&self, opt: USizeOpt, value: usize) {
        self.data.lock().await.set_usize(opt, value);
    }

    pub async fn duration(&self, opt: DurationOpt) -> Duration {
        self.data.lock().await.duration(opt)
    }

    pub async fn set_duration(&self, opt: DurationOpt, value: Duration) {
        self.data.lock().await.set_duration(opt, value);
    }

    pub async fn string(&self, opt: StrOpt) -> ArcStr {
        self.data.lock().await.string(opt)
    }

    pub async fn set_string(&self, opt: StrOpt, value: ArcStr) {
        self.data.lock().await.set_string(opt, value);
    }
}
