use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use tokio::sync::mpsc::Sender;

use crate::{ArcStr, log::Log, model::Feed, net::Net};

mod core;
mod message;
pub mod parse;

use message::Message;

/// The feed fetcher actor: turns a feed URL into a normalized [`Feed`].
///
/// # Examples
/// ```ignore
/// let feeds = FeedApi::spawn(net, log);
/// let feed = feeds.fetch("https://example.com/rss".into()).await?;
/// ```
#[derive(Debug, Clone)]
pub enum FeedApi {
    Actual(Sender<Message>),
    /// Serves fixed feeds by URL; unknown URLs fail
    Mock(Arc<HashMap<ArcStr, Feed>>),
}

impl FeedApi {
    pub fn spawn(net: Net, log: Log) -> Self {
        self::core::Core::new(net, log).spawn().0
    }

    pub fn mock(feeds: HashMap<ArcStr, Feed>) -> Self {
        Self::Mock(Arc::new(feeds))
    }

    /// Downloads and parses the feed at `url`.
    ///
    /// # Errors
    /// If the download fails or the document is not an RSS or Atom feed.
    pub async fn fetch(&self, url: ArcStr) -> anyhow::Result<Feed> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::Fetch { url, tx })
                    .await
                    .context("Sending message to FeedApi actor")
                    .expect("FeedApi actor died");
                rx.await
                    .context("Awaiting response from FeedApi actor")
                    .expect("FeedApi actor died")
            }
            Self::Mock(feeds) => feeds
                .get(&url)
                .cloned()
                .with_context(|| format!("No mock feed for {}", url)),
        }
    }
}
