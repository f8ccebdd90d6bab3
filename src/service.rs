//! Article lookup with caching in front of the feed fetcher.

use anyhow::Context;

use crate::{ArcSlice, ArcStr, api::FeedApi, cache::TtlCache, log::Log, model::Article};

#[cfg(test)]
mod tests;

const SCOPE: &str = "service";

/// Answers "the articles of this feed, newest first".
///
/// Cheap to clone: every field is an actor handle.
#[derive(Debug, Clone)]
pub struct ArticleService {
    feeds: FeedApi,
    cache: TtlCache,
    log: Log,
}

impl ArticleService {
    pub fn new(feeds: FeedApi, cache: TtlCache, log: Log) -> Self {
        Self { feeds, cache, log }
    }

    /// Returns the articles of `feed_url` sorted by publication date, newest
    /// first, with undated articles at the end.
    ///
    /// A cached list is returned as is. Otherwise the feed is fetched and the
    /// sorted list is cached before returning it. Failed fetches are not
    /// cached.
    ///
    /// # Errors
    /// If the feed cannot be fetched or parsed.
    pub async fn get_articles(&self, feed_url: ArcStr) -> anyhow::Result<ArcSlice<Article>> {
        if let Some(articles) = self.cache.lookup(feed_url.clone()).await {
            return Ok(articles);
        }

        let feed = self
            .log
            .warn_on_error(SCOPE, self.feeds.fetch(feed_url.clone()).await)
            .context("failed to parse feed")?;

        let mut articles = feed.articles;
        sort_newest_first(&mut articles);
        let articles = ArcSlice::from(articles);

        self.cache.insert(feed_url, articles.clone()).await;
        Ok(articles)
    }
}

/// `None` sorts below any date, so undated articles end up last. The sort is
/// stable.
fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published.cmp(&a.published));
}
