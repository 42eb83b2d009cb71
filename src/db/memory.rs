use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{RecordStore, StoreError};
use crate::models::entry::Entry;

/// Process-local table. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    rows: RwLock<Vec<Entry>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Entry>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn read_all(&self) -> Result<Vec<Entry>, StoreError> {
        Ok(self.rows.read().await.clone())
    }

    async fn replace_all(&self, entries: Vec<Entry>) -> Result<(), StoreError> {
        *self.rows.write().await = entries;
        Ok(())
    }

    async fn append(&self, entry: Entry) -> Result<(), StoreError> {
        self.rows.write().await.push(entry);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
