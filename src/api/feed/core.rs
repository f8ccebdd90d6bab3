use anyhow::Context;
use tokio::task::JoinHandle;

use super::message::Message;
use super::parse;
use crate::{ArcStr, log::Log, model::Feed, net::Net};

const SCOPE: &str = "api.feed";

/// The core of the feed fetcher. Downloads documents through [`Net`] and
/// normalizes them with [`parse::parse_feed`].
#[derive(Debug)]
pub struct Core {
    net: Net,
    log: Log,
}

impl Core {
    pub fn new(net: Net, log: Log) -> Self {
        Self { net, log }
    }

    /// Transforms the fetcher into an actor. Every fetch runs in its own
    /// task, so feeds are downloaded and parsed concurrently.
    pub fn spawn(self) -> (super::FeedApi, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);

        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Fetch { url, tx } => {
                        let net = self.net.clone();
                        let log = self.log.clone();
                        tokio::spawn(async move {
                            let _ = tx.send(fetch(&net, &log, url).await);
                        });
                    }
                }
            }
        });

        (super::FeedApi::Actual(tx), handle)
    }
}

async fn fetch(net: &Net, log: &Log, url: ArcStr) -> anyhow::Result<Feed> {
    let body = net
        .get(url.clone())
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;
    let feed = parse::parse_feed(&body).with_context(|| format!("Failed to parse url {}", url))?;
    log.info(
        SCOPE,
        format!("Fetched {} articles from {}", feed.articles.len(), url),
    );
    Ok(feed)
}
