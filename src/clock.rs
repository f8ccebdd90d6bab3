//! Time source shared by every component that depends on the passage of time.
//!
//! The clock hands out the current instant and repeating [`Ticker`]s. The
//! system variant follows the wall clock and the tokio timer; the mock
//! variant only moves when [`Clock::advance`] is called, which makes expiry
//! logic deterministic under test.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{
    sync::mpsc::Receiver,
    time::{Interval, MissedTickBehavior},
};

mod mock;

/// The time source.
///
/// # Examples
/// ```ignore
/// let clock = Clock::mock(Utc::now());
/// let mut ticker = clock.ticker(Duration::from_secs(1));
/// clock.advance(Duration::from_secs(1));
/// ticker.tick().await;
/// ```
///
/// # Thread Safety
/// Cloning is cheap; clones of a mock clock share the same simulated time.
#[derive(Debug, Clone)]
pub enum Clock {
    /// The wall clock, with tickers driven by the tokio timer
    Actual,
    /// A simulated clock that only moves when advanced
    Mock(mock::Mock),
}

impl Clock {
    /// Creates a clock that follows the system time.
    pub fn system() -> Self {
        Self::Actual
    }

    /// Creates a simulated clock frozen at `start`.
    pub fn mock(start: DateTime<Utc>) -> Self {
        Self::Mock(mock::Mock::new(start))
    }

    /// Returns the current instant.
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::Actual => Utc::now(),
            Self::Mock(mock) => mock.now(),
        }
    }

    /// Returns how much time has passed since `instant`. An instant in the
    /// future yields zero.
    pub fn since(&self, instant: DateTime<Utc>) -> Duration {
        (self.now() - instant).to_std().unwrap_or(Duration::ZERO)
    }

    /// Creates a ticker that fires every `period`, the first time one period
    /// from now.
    ///
    /// # Panics
    /// If `period` is zero.
    pub fn ticker(&self, period: Duration) -> Ticker {
        assert!(!period.is_zero(), "ticker period must be non-zero");

        match self {
            Self::Actual => {
                let start = tokio::time::Instant::now() + period;
                let mut interval = tokio::time::interval_at(start, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                Ticker::Actual { interval, period }
            }
            Self::Mock(mock) => mock.ticker(period),
        }
    }

    /// Moves a simulated clock forward, firing every ticker whose deadline
    /// is reached. Has no effect on the system clock.
    pub fn advance(&self, duration: Duration) {
        if let Self::Mock(mock) = self {
            mock.advance(duration);
        }
    }

    /// Waits until at least `count` tickers are registered on a simulated
    /// clock. Returns immediately for the system clock.
    pub async fn block_until(&self, count: usize) {
        if let Self::Mock(mock) = self {
            mock.block_until(count).await;
        }
    }

    /// Number of live tickers of a simulated clock, `None` for the system
    /// clock.
    pub fn tickers(&self) -> Option<usize> {
        match self {
            Self::Actual => None,
            Self::Mock(mock) => Some(mock.tickers()),
        }
    }
}

/// A repeating timer obtained from [`Clock::ticker`].
///
/// Dropping the ticker releases it.
#[derive(Debug)]
pub enum Ticker {
    Actual {
        interval: Interval,
        period: Duration,
    },
    Mock {
        rx: Receiver<DateTime<Utc>>,
        period: Duration,
    },
}

impl Ticker {
    /// The period this ticker was created with.
    pub fn period(&self) -> Duration {
        match self {
            Self::Actual { period, .. } | Self::Mock { period, .. } => *period,
        }
    }

    /// Waits for the next tick and returns the instant it fired at.
    ///
    /// A mock ticker whose clock is gone never fires again.
    pub async fn tick(&mut self) -> DateTime<Utc> {
        match self {
            Self::Actual { interval, .. } => {
                interval.tick().await;
                Utc::now()
            }
            Self::Mock { rx, .. } => match rx.recv().await {
                Some(instant) => instant,
                None => std::future::pending().await,
            },
        }
    }
}
