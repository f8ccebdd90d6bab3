use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::*;
use crate::model::Feed;

const URL: &str = "https://news.example.com/rss";

fn at(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

fn article(title: &str, published: Option<DateTime<Utc>>) -> Article {
    Article {
        title: title.into(),
        published,
        ..Default::default()
    }
}

fn titles(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.title.as_str()).collect()
}

fn feed() -> Feed {
    Feed {
        title: "News".into(),
        articles: vec![
            article("old", at(100)),
            article("undated-1", None),
            article("new", at(300)),
            article("middle", at(200)),
            article("undated-2", None),
        ],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_miss_fetches_sorts_and_caches() {
    let cache = TtlCache::mock();
    let service = ArticleService::new(
        FeedApi::mock(HashMap::from([(ArcStr::from(URL), feed())])),
        cache.clone(),
        Log::mock(),
    );

    let articles = service.get_articles(URL.into()).await.unwrap();
    assert_eq!(
        titles(&articles),
        ["new", "middle", "old", "undated-1", "undated-2"]
    );

    let cached = cache.lookup(URL.into()).await.unwrap();
    assert_eq!(titles(&cached), titles(&articles));
}

#[tokio::test]
async fn test_hit_skips_fetch() {
    let cache = TtlCache::mock();
    cache
        .insert(URL.into(), ArcSlice::from(vec![article("cached", None)]))
        .await;

    // The fetcher knows no feeds, so any fetch would fail
    let service = ArticleService::new(FeedApi::mock(HashMap::new()), cache, Log::mock());

    let articles = service.get_articles(URL.into()).await.unwrap();
    assert_eq!(titles(&articles), ["cached"]);
}

#[tokio::test]
async fn test_cached_empty_list_is_a_hit() {
    let cache = TtlCache::mock();
    cache.insert(URL.into(), ArcSlice::from(Vec::new())).await;
    let service = ArticleService::new(FeedApi::mock(HashMap::new()), cache, Log::mock());

    assert!(service.get_articles(URL.into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failure_is_wrapped_and_not_cached() {
    let cache = TtlCache::mock();
    let service = ArticleService::new(FeedApi::mock(HashMap::new()), cache.clone(), Log::mock());

    let err = service.get_articles(URL.into()).await.unwrap_err();
    assert_eq!(err.to_string(), "failed to parse feed");
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_equal_dates_keep_feed_order() {
    let feed = Feed {
        articles: vec![
            article("a", at(10)),
            article("b", at(10)),
            article("c", at(20)),
        ],
        ..Default::default()
    };
    let service = ArticleService::new(
        FeedApi::mock(HashMap::from([(ArcStr::from(URL), feed)])),
        TtlCache::mock(),
        Log::mock(),
    );

    let articles = service.get_articles(URL.into()).await.unwrap();
    assert_eq!(titles(&articles), ["c", "a", "b"]);
}

#[tokio::test]
async fn test_with_expiring_cache() {
    use std::time::Duration;

    use crate::clock::Clock;

    let clock = Clock::mock(DateTime::from_timestamp(0, 0).unwrap());
    let cache = TtlCache::spawn(
        Duration::from_secs(300),
        Duration::from_secs(60),
        clock.clone(),
        Log::mock(),
    )
    .unwrap();
    let service = ArticleService::new(
        FeedApi::mock(HashMap::from([(ArcStr::from(URL), feed())])),
        cache.clone(),
        Log::mock(),
    );

    service.get_articles(URL.into()).await.unwrap();
    assert_eq!(cache.len().await, 1);

    clock.advance(Duration::from_secs(300));
    assert!(cache.lookup(URL.into()).await.is_none());

    // Fetched again after expiry
    service.get_articles(URL.into()).await.unwrap();
    assert_eq!(cache.len().await, 1);
}
