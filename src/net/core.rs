use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use tokio::task::JoinHandle;

use super::message::Message;
use crate::{ArcStr, log::Log};

const SCOPE: &str = "net";

/// The core of the networking actor.
///
/// Wraps a [`reqwest::Client`] whose timeout bounds every request, from
/// connecting to reading the last byte of the body.
#[derive(Debug)]
pub struct Core {
    log: Log,
    client: Client,
}

impl Core {
    /// # Errors
    /// If the HTTP client cannot be built, which happens when the TLS
    /// backend fails to initialize.
    pub fn build(timeout: Duration, log: Log) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("newsfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Building the HTTP client")?;
        Ok(Self { log, client })
    }

    /// Transforms the networking core into an actor.
    ///
    /// Requests run in their own tasks, so a slow server never delays the
    /// requests sent after it.
    pub fn spawn(self) -> (super::Net, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);

        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Get { url, tx } => {
                        let client = self.client.clone();
                        let log = self.log.clone();
                        tokio::spawn(async move {
                            let response = get(&client, &url)
                                .await
                                .with_context(|| format!("GET request failed for URL: {}", url));
                            let _ = tx.send(log.warn_on_error(SCOPE, response));
                        });
                    }
                }
            }
        });

        (super::Net::Actual(tx), handle)
    }
}

async fn get(client: &Client, url: &str) -> anyhow::Result<ArcStr> {
    let response = client
        .get(url)
        .send()
        .await
        .context("Sending GET request")?
        .error_for_status()
        .context("Unexpected HTTP status")?;
    let text = response.text().await.context("Reading response body")?;
    Ok(ArcStr::from(text))
}
