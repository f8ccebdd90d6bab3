use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{sync::mpsc, task::JoinHandle};

use super::data::CacheData;
use super::message::Message;
use crate::{
    clock::{Clock, Ticker},
    log::Log,
};

const SCOPE: &str = "cache";

/// The cache actor.
///
/// A single task owns the table and the sweep ticker. Ticks and requests are
/// multiplexed on that task, ticks first, so a sweep whose tick has already
/// fired is applied before any request waiting in the queue.
pub struct Core {
    data: CacheData,
    ttl: Duration,
    clock: Clock,
    ticker: Ticker,
    log: Log,
}

impl Core {
    /// Registers the sweep ticker with `clock` right away, so a mock clock
    /// can be advanced as soon as this returns.
    pub fn new(ttl: Duration, sweep_interval: Duration, clock: Clock, log: Log) -> Self {
        let ticker = clock.ticker(sweep_interval);
        Self {
            data: CacheData::default(),
            ttl,
            clock,
            ticker,
            log,
        }
    }

    pub fn spawn(self) -> (super::TtlCache, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let Self {
            mut data,
            ttl,
            clock,
            ticker,
            log,
        } = self;

        let handle = tokio::spawn(async move {
            let mut ticker = Some(ticker);
            loop {
                tokio::select! {
                    biased;
                    _ = next_tick(&mut ticker) => {
                        let removed = data.sweep(&clock, ttl);
                        if removed > 0 {
                            log.info(SCOPE, format!("Swept {} expired entries", removed));
                        }
                    }
                    message = rx.recv() => {
                        let Some(message) = message else {
                            break;
                        };
                        match message {
                            Message::Lookup { key, tx } => {
                                let _ = tx.send(data.get(&key));
                            }
                            Message::Insert { key, value, tx } => {
                                data.insert(key, value, clock.now());
                                let _ = tx.send(());
                            }
                            Message::Len { tx } => {
                                let _ = tx.send(data.len());
                            }
                            Message::Stop { tx } => {
                                if let Some(stopped) = ticker.take() {
                                    log.info(
                                        SCOPE,
                                        format!(
                                            "Stopped the expiry sweeper running every {:?}",
                                            stopped.period()
                                        ),
                                    );
                                }
                                let _ = tx.send(());
                            }
                        }
                    }
                }
            }
        });

        (super::TtlCache::Actual(tx), handle)
    }
}

/// Resolves on the next tick, or never once the ticker is released.
async fn next_tick(ticker: &mut Option<Ticker>) -> DateTime<Utc> {
    match ticker {
        Some(ticker) => ticker.tick().await,
        None => std::future::pending().await,
    }
}
