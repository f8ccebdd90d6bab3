use tokio::sync::oneshot;

use crate::{ArcSlice, ArcStr, model::Article};

/// Messages handled by the cache actor, answered in the order they arrive.
#[derive(Debug)]
pub enum Message {
    Lookup {
        key: ArcStr,
        tx: oneshot::Sender<Option<ArcSlice<Article>>>,
    },
    /// Acknowledged once the entry is in the table
    Insert {
        key: ArcStr,
        value: ArcSlice<Article>,
        tx: oneshot::Sender<()>,
    },
    Len {
        tx: oneshot::Sender<usize>,
    },
    /// Release the ticker. Acknowledged once no further sweep can run
    Stop {
        tx: oneshot::Sender<()>,
    },
}
