use std::time::Duration;

use tokio::sync::oneshot;

use crate::{ArcPath, ArcStr, log::LogLevel};

use super::data::{DurationOpt, PathOpt, StrOpt, USizeOpt};

/// Messages that can be sent to the configuration actor.
///
/// Operations that return a value carry a channel to send the result back to
/// the caller.
#[derive(Debug)]
pub enum Message {
    /// Load configuration from file
    Load {
        tx: oneshot::Sender<anyhow::Result<()>>,
    },
    /// Save configuration to file
    Save {
        tx: oneshot::Sender<anyhow::Result<()>>,
    },
    GetPath {
        opt: PathOpt,
        tx: oneshot::Sender<ArcPath>,
    },
    SetPath {
        opt: PathOpt,
        path: ArcPath,
    },
    GetLogLevel {
        tx: oneshot::Sender<LogLevel>,
    },
    SetLogLevel {
        level: LogLevel,
    },
    GetUSize {
        opt: USizeOpt,
        tx: oneshot::Sender<usize>,
    },
    SetUSize {
        opt: USizeOpt,
        size: usize,
    },
    GetDuration {
        opt: DurationOpt,
        tx: oneshot::Sender<Duration>,
    },
    SetDuration {
        opt: DurationOpt,
        duration: Duration,
    },
    GetString {
        opt: StrOpt,
        tx: oneshot::Sender<ArcStr>,
    },
    SetString {
        opt: StrOpt,
        value: ArcStr,
    },
}
