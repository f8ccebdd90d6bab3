use std::{collections::HashMap, time::Duration};

use chrono::{DateTime, Utc};

use crate::{ArcSlice, ArcStr, clock::Clock, model::Article};

/// A cached value and the instant it was stored.
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: ArcSlice<Article>,
    pub inserted_at: DateTime<Utc>,
}

/// The table owned by the cache actor.
///
/// Holds at most one entry per key. Expired entries stay in the table until
/// the next [`CacheData::sweep`].
#[derive(Debug, Default)]
pub struct CacheData {
    entries: HashMap<ArcStr, Entry>,
}

impl CacheData {
    pub fn get(&self, key: &str) -> Option<ArcSlice<Article>> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key`, replacing the previous entry and its
    /// timestamp.
    pub fn insert(&mut self, key: ArcStr, value: ArcSlice<Article>, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes every entry whose age on `clock` is at least `ttl`, returning
    /// how many were removed. An entry stamped in the future has age zero.
    pub fn sweep(&mut self, clock: &Clock, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| clock.since(entry.inserted_at) < ttl);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::arc_slice;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn articles(title: &str) -> ArcSlice<Article> {
        arc_slice![Article {
            title: title.into(),
            ..Default::default()
        }]
    }

    #[test]
    fn test_sweep_boundary_is_inclusive() {
        let mut data = CacheData::default();
        data.insert("a".into(), articles("a"), start());

        let almost = start() + TimeDelta::seconds(5) - TimeDelta::nanoseconds(1);
        assert_eq!(data.sweep(&Clock::mock(almost), Duration::from_secs(5)), 0);
        assert!(data.get("a").is_some());

        let exact = start() + TimeDelta::seconds(5);
        assert_eq!(data.sweep(&Clock::mock(exact), Duration::from_secs(5)), 1);
        assert!(data.get("a").is_none());
    }

    #[test]
    fn test_sweep_only_removes_expired() {
        let mut data = CacheData::default();
        data.insert("old".into(), articles("old"), start());
        data.insert(
            "new".into(),
            articles("new"),
            start() + TimeDelta::seconds(3),
        );

        let clock = Clock::mock(start() + TimeDelta::seconds(4));
        let removed = data.sweep(&clock, Duration::from_secs(2));
        assert_eq!(removed, 1);
        assert_eq!(data.len(), 1);
        assert_eq!(data.get("new").unwrap()[0].title.as_str(), "new");
    }

    #[test]
    fn test_zero_ttl_expires_everything() {
        let mut data = CacheData::default();
        data.insert("a".into(), articles("a"), start());
        data.insert("b".into(), articles("b"), start());
        assert_eq!(data.sweep(&Clock::mock(start()), Duration::ZERO), 2);
        assert_eq!(data.len(), 0);
    }

    #[test]
    fn test_future_entry_has_zero_age() {
        let mut data = CacheData::default();
        data.insert("a".into(), articles("a"), start() + TimeDelta::seconds(30));
        assert_eq!(data.sweep(&Clock::mock(start()), Duration::from_secs(1)), 0);
        assert_eq!(data.sweep(&Clock::mock(start()), Duration::ZERO), 1);
    }

    #[test]
    fn test_insert_replaces_timestamp() {
        let mut data = CacheData::default();
        data.insert("a".into(), articles("first"), start());
        data.insert(
            "a".into(),
            articles("second"),
            start() + TimeDelta::seconds(10),
        );

        assert_eq!(data.len(), 1);
        let clock = Clock::mock(start() + TimeDelta::seconds(12));
        assert_eq!(data.sweep(&clock, Duration::from_secs(5)), 0);
        assert_eq!(data.get("a").unwrap()[0].title.as_str(), "second");
    }

    #[test]
    fn test_empty_value_is_a_hit() {
        let mut data = CacheData::default();
        data.insert("empty".into(), ArcSlice::from(Vec::new()), start());
        assert_eq!(data.get("empty").map(|v| v.len()), Some(0));
    }
}
