use tokio::sync::oneshot;

use crate::ArcStr;

#[derive(Debug)]
pub enum Message {
    /// Fetch the body of `url`
    Get {
        url: ArcStr,
        tx: oneshot::Sender<anyhow::Result<ArcStr>>,
    },
}
