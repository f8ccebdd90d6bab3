use std::{collections::HashMap, sync::Arc};

use crate::ArcStr;

/// Mock implementation of the Net actor that serves canned bodies by URL.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    responses: Arc<HashMap<ArcStr, ArcStr>>,
}

impl Mock {
    pub fn new(responses: HashMap<ArcStr, ArcStr>) -> Self {
        Self {
            responses: Arc::new(responses),
        }
    }

    pub async fn get(&self, url: ArcStr) -> anyhow::Result<ArcStr> {
        self.responses
            .get(&url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("GET request not found in mock responses: {}", url))
    }
}
