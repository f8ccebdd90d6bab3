use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Notify, mpsc};

use super::Ticker;

/// Simulated clock backing [`Clock::Mock`](super::Clock::Mock).
///
/// Tickers are channels with room for a single pending tick, so a ticker
/// that falls behind sees one tick rather than a burst.
#[derive(Debug, Clone)]
pub struct Mock {
    state: Arc<Mutex<State>>,
    registered: Arc<Notify>,
}

#[derive(Debug)]
struct State {
    now: DateTime<Utc>,
    tickers: Vec<Slot>,
}

#[derive(Debug)]
struct Slot {
    period: TimeDelta,
    next: DateTime<Utc>,
    tx: mpsc::Sender<DateTime<Utc>>,
}

impl Mock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                now: start,
                tickers: Vec::new(),
            })),
            registered: Arc::new(Notify::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.lock().now
    }

    pub fn ticker(&self, period: Duration) -> Ticker {
        let (tx, rx) = mpsc::channel(1);
        {
            let mut state = self.lock();
            let delta = to_delta(period);
            let next = add(state.now, delta);
            state.tickers.push(Slot {
                period: delta,
                next,
                tx,
            });
        }
        self.registered.notify_waiters();

        Ticker::Mock { rx, period }
    }

    pub fn advance(&self, duration: Duration) {
        let mut state = self.lock();
        state.now = add(state.now, to_delta(duration));
        let now = state.now;

        state.tickers.retain(|slot| !slot.tx.is_closed());
        for slot in state.tickers.iter_mut() {
            if slot.next > now {
                continue;
            }
            // Full channel: a tick is already pending, this one is dropped
            let _ = slot.tx.try_send(now);
            slot.next = next_deadline(slot.next, slot.period, now);
        }
    }

    pub async fn block_until(&self, count: usize) {
        loop {
            let notified = self.registered.notified();
            if self.tickers() >= count {
                return;
            }
            notified.await;
        }
    }

    pub fn tickers(&self) -> usize {
        self.lock()
            .tickers
            .iter()
            .filter(|slot| !slot.tx.is_closed())
            .count()
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

fn add(instant: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
    instant
        .checked_add_signed(delta)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// First deadline strictly after `now` that keeps the ticker's phase.
fn next_deadline(next: DateTime<Utc>, period: TimeDelta, now: DateTime<Utc>) -> DateTime<Utc> {
    let behind = (now - next).num_nanoseconds().unwrap_or(i64::MAX);
    let period = period.num_nanoseconds().unwrap_or(i64::MAX).max(1);
    let remaining = period - behind % period;
    add(now, TimeDelta::nanoseconds(remaining))
}
