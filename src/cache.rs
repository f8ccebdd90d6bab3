//! An in-memory cache of article lists keyed by feed URL.
//!
//! Entries expire a fixed time after they were inserted, but they are only
//! removed by a periodic sweep. Between sweeps an expired entry is still
//! returned by [`TtlCache::lookup`].

use std::time::Duration;

use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::{ArcSlice, ArcStr, clock::Clock, log::Log, model::Article};

mod core;
mod data;
mod message;
mod mock;
#[cfg(test)]
mod tests;

use message::Message;

/// Handle to the cache actor.
///
/// # Examples
/// ```ignore
/// let cache = TtlCache::spawn(ttl, sweep_interval, Clock::system(), log)?;
/// cache.insert(url.clone(), articles).await;
/// assert!(cache.lookup(url).await.is_some());
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or mock reference.
#[derive(Debug, Clone)]
pub enum TtlCache {
    Actual(Sender<Message>),
    Mock(mock::Mock),
}

impl TtlCache {
    /// Starts the cache and its expiry sweeper.
    ///
    /// Entries live for `ttl` and are reclaimed every `sweep_interval`, as
    /// measured by `clock`. A zero `ttl` is valid: every entry is removed by
    /// the next sweep.
    ///
    /// # Errors
    /// If `sweep_interval` is zero.
    pub fn spawn(
        ttl: Duration,
        sweep_interval: Duration,
        clock: Clock,
        log: Log,
    ) -> anyhow::Result<Self> {
        if sweep_interval.is_zero() {
            anyhow::bail!("The sweep interval must be greater than zero");
        }
        Ok(self::core::Core::new(ttl, sweep_interval, clock, log)
            .spawn()
            .0)
    }

    /// Creates a cache that never expires entries, for testing.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::default())
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
            .with_context(|| format!("{} with TtlCache", what))
            .expect("TtlCache actor died");
        rx.await
            .with_context(|| format!("Awaiting response for {} with TtlCache", what))
            .expect("TtlCache actor died")
    }

    /// Returns the value stored under `key`, `None` on a miss.
    pub async fn lookup(&self, key: ArcStr) -> Option<ArcSlice<Article>> {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Looking up entry", |tx| Message::Lookup { key, tx }).await
            }
            Self::Mock(mock) => mock.lookup(key).await,
        }
    }

    /// Stores `value` under `key`, replacing any previous entry and
    /// restarting its time-to-live.
    pub async fn insert(&self, key: ArcStr, value: ArcSlice<Article>) {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Inserting entry", |tx| Message::Insert {
                    key,
                    value,
                    tx,
                })
                .await
            }
            Self::Mock(mock) => mock.insert(key, value).await,
        }
    }

    /// Number of entries in the table, including expired ones that were not
    /// swept yet.
    pub async fn len(&self) -> usize {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Counting entries", |tx| Message::Len { tx }).await
            }
            Self::Mock(mock) => mock.len().await,
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Stops the expiry sweeper. The cache keeps answering requests, but
    /// entries are no longer removed. Stopping twice is harmless.
    pub async fn stop(&self) {
        match self {
            Self::Actual(sender) => {
                Self::request(sender, "Stopping sweeper", |tx| Message::Stop { tx }).await
            }
            Self::Mock(_) => {}
        }
    }
}
