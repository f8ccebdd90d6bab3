use tokio::sync::oneshot;

use crate::{ArcStr, model::Feed};

#[derive(Debug)]
pub enum Message {
    Fetch {
        url: ArcStr,
        tx: oneshot::Sender<anyhow::Result<Feed>>,
    },
}
