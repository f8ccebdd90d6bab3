use std::time::Duration;

use chrono::{DateTime, Utc};

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

fn title(value: Option<ArcSlice<Article>>) -> Option<String> {
    value.map(|articles| articles[0].title.to_string())
}

fn spawn_mocked(ttl: u64, sweep: u64) -> (TtlCache, Clock) {
    let clock = Clock::mock(start());
    let cache = TtlCache::spawn(
        Duration::from_secs(ttl),
        Duration::from_secs(sweep),
        clock.clone(),
        Log::mock(),
    )
    .unwrap();
    (cache, clock)
}

#[tokio::test]
async fn test_insert_then_lookup() {
    let (cache, _clock) = spawn_mocked(300, 60);

    assert!(cache.is_empty().await);
    assert_eq!(cache.lookup("https://a.example/rss".into()).await, None);

    cache
        .insert("https://a.example/rss".into(), articles("first"))
        .await;
    assert_eq!(
        title(cache.lookup("https://a.example/rss".into()).await),
        Some("first".to_string())
    );
    assert_eq!(cache.lookup("https://b.example/rss".into()).await, None);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_insert_overwrites() {
    let (cache, _clock) = spawn_mocked(300, 60);

    cache.insert("k".into(), articles("old")).await;
    cache.insert("k".into(), articles("new")).await;

    assert_eq!(title(cache.lookup("k".into()).await), Some("new".to_string()));
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_keys_are_exact() {
    let (cache, _clock) = spawn_mocked(300, 60);

    cache.insert("https://x.example/feed".into(), articles("x")).await;
    assert_eq!(cache.lookup("https://x.example/feed/".into()).await, None);
    assert_eq!(cache.lookup("https://X.example/feed".into()).await, None);
}

#[tokio::test]
async fn test_entry_expires_at_sweep() {
    let (cache, clock) = spawn_mocked(5, 1);
    cache.insert("k".into(), articles("v")).await;

    clock.advance(Duration::from_secs(4));
    assert_eq!(title(cache.lookup("k".into()).await), Some("v".to_string()));

    clock.advance(Duration::from_secs(1));
    assert_eq!(cache.lookup("k".into()).await, None);
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_expired_key_stays_missing() {
    let (cache, clock) = spawn_mocked(5, 1);
    cache.insert("k".into(), articles("v")).await;

    clock.advance(Duration::from_secs(5));
    for _ in 0..5 {
        assert_eq!(cache.lookup("k".into()).await, None);
    }

    clock.advance(Duration::from_secs(30));
    for _ in 0..5 {
        assert_eq!(cache.lookup("k".into()).await, None);
    }
    assert_eq!(cache.lookup("never-inserted".into()).await, None);
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_expired_entry_is_served_until_swept() {
    let (cache, clock) = spawn_mocked(1, 10);
    cache.insert("k".into(), articles("stale")).await;

    clock.advance(Duration::from_secs(5));
    assert_eq!(
        title(cache.lookup("k".into()).await),
        Some("stale".to_string())
    );
    assert_eq!(cache.len().await, 1);

    clock.advance(Duration::from_secs(5));
    assert_eq!(cache.lookup("k".into()).await, None);
    assert_eq!(cache.len().await, 0);
}

#[tokio::test]
async fn test_reinsert_restarts_ttl() {
    let (cache, clock) = spawn_mocked(5, 1);
    cache.insert("k".into(), articles("first")).await;

    clock.advance(Duration::from_secs(4));
    cache.insert("k".into(), articles("second")).await;

    clock.advance(Duration::from_secs(2));
    assert_eq!(
        title(cache.lookup("k".into()).await),
        Some("second".to_string())
    );

    clock.advance(Duration::from_secs(3));
    assert_eq!(cache.lookup("k".into()).await, None);
}

#[tokio::test]
async fn test_zero_ttl_expires_on_next_sweep() {
    let (cache, clock) = spawn_mocked(0, 1);
    cache.insert("k".into(), articles("v")).await;
    assert_eq!(cache.len().await, 1);

    clock.advance(Duration::from_secs(1));
    assert_eq!(cache.lookup("k".into()).await, None);
}

#[tokio::test]
async fn test_zero_sweep_interval_is_rejected() {
    let clock = Clock::mock(start());
    let result = TtlCache::spawn(
        Duration::from_secs(5),
        Duration::ZERO,
        clock.clone(),
        Log::mock(),
    );
    assert!(result.is_err());
    assert_eq!(clock.tickers(), Some(0));
}

#[tokio::test]
async fn test_stop_releases_ticker() {
    let (cache, clock) = spawn_mocked(1, 1);
    assert_eq!(clock.tickers(), Some(1));

    cache.stop().await;
    assert_eq!(clock.tickers(), Some(0));

    cache.insert("k".into(), articles("kept")).await;
    clock.advance(Duration::from_secs(60));
    assert_eq!(
        title(cache.lookup("k".into()).await),
        Some("kept".to_string())
    );

    // A second stop is a no-op
    cache.stop().await;
    assert_eq!(cache.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_access() {
    let cache = TtlCache::spawn(
        Duration::from_secs(300),
        Duration::from_secs(60),
        Clock::system(),
        Log::mock(),
    )
    .unwrap();

    let mut handles = Vec::new();
    for writer in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..50 {
                let key = format!("feed-{}-{}", writer, i);
                cache.insert(key.clone().into(), articles(&key)).await;
            }
        }));
    }
    for reader in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..50 {
                let key = format!("feed-{}-{}", reader, i);
                if let Some(value) = cache.lookup(key.clone().into()).await {
                    assert_eq!(value[0].title.as_str(), key);
                }
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.len().await, 400);
    for writer in 0..8 {
        for i in 0..50 {
            let key = format!("feed-{}-{}", writer, i);
            assert_eq!(title(cache.lookup(key.clone().into()).await), Some(key));
        }
    }
    cache.stop().await;
}

#[tokio::test]
async fn test_mock_cache() {
    let cache = TtlCache::mock();
    cache.insert("k".into(), articles("v")).await;
    cache.stop().await;
    assert_eq!(title(cache.lookup("k".into()).await), Some("v".to_string()));
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_stop_logs_sweeper_period() {
    let log = Log::mock();
    let cache = TtlCache::spawn(
        Duration::from_secs(5),
        Duration::from_secs(2),
        Clock::mock(start()),
        log.clone(),
    )
    .unwrap();

    cache.stop().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    let messages = log.get_messages().await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].scope, "cache");
    assert!(messages[0].message.contains("every 2s"));
}
