use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::{ArcSlice, ArcStr, model::Article};

/// An in-memory cache where entries never expire.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    entries: Arc<Mutex<HashMap<ArcStr, ArcSlice<Article>>>>,
}

impl Mock {
    pub async fn lookup(&self, key: ArcStr) -> Option<ArcSlice<Article>> {
        self.entries.lock().await.get(&key).cloned()
    }

    pub async fn insert(&self, key: ArcStr, value: ArcSlice<Article>) {
        self.entries.lock().await.insert(key, value);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
