use std::{collections::HashMap, time::Duration};

use anyhow::Context;
use tokio::sync::mpsc::Sender;

use crate::{
    ArcStr,
    config::{Config, USizeOpt},
    log::Log,
};

mod core;
mod message;
mod mock;

use message::Message;

/// The networking actor that performs HTTP requests.
///
/// # Examples
/// ```ignore
/// let net = Net::spawn(config, log).await?;
/// let body = net.get(url).await?;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or mock reference.
#[derive(Debug, Clone)]
pub enum Net {
    /// A real networking actor backed by an HTTP client
    Actual(Sender<Message>),
    /// A mock implementation that answers from a fixed table
    Mock(mock::Mock),
}

impl Net {
    /// Spawns the networking actor with the request timeout from `config`.
    ///
    /// # Errors
    /// If the HTTP client cannot be built.
    pub async fn spawn(config: Config, log: Log) -> anyhow::Result<Self> {
        let timeout = config.usize(USizeOpt::Timeout).await;
        Self::with_timeout(Duration::from_secs(timeout as u64), log)
    }

    /// Spawns the networking actor with an explicit request timeout.
    pub fn with_timeout(timeout: Duration, log: Log) -> anyhow::Result<Self> {
        Ok(self::core::Core::build(timeout, log)?.spawn().0)
    }

    /// Creates a mock that answers a GET on each key with its value and fails
    /// on any other URL.
    pub fn mock(responses: HashMap<ArcStr, ArcStr>) -> Self {
        Self::Mock(mock::Mock::new(responses))
    }

    /// Performs an HTTP GET request and returns the response body.
    ///
    /// # Errors
    /// On transport failures, timeouts and non-success statuses.
    pub async fn get(&self, url: ArcStr) -> anyhow::Result<ArcStr> {
        match self {
            Net::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::Get { url, tx })
                    .await
                    .context("Sending message to Net actor")
                    .expect("Net actor died");
                rx.await
                    .context("Awaiting response from Net actor")
                    .expect("Net actor died")
            }
            Net::Mock(mock) => mock.get(url).await,
        }
    }
}
