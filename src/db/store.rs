use async_trait::async_trait;
use thiserror::Error;

use crate::models::entry::Entry;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whole-table persistence for lunch entries.
///
/// `read_all` returns rows in insertion order. `replace_all` swaps the
/// entire table for the given snapshot; it either fully succeeds or leaves
/// the previous table in place.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn read_all(&self) -> Result<Vec<Entry>, StoreError>;

    async fn replace_all(&self, entries: Vec<Entry>) -> Result<(), StoreError>;

    /// Appends one row after every existing row.
    async fn append(&self, entry: Entry) -> Result<(), StoreError> {
        let mut rows = self.read_all().await?;
        rows.push(entry);
        self.replace_all(rows).await
    }

    /// Drops every row of `menu.date` that has no rater, then appends `menu`.
    async fn replace_menu(&self, menu: Entry) -> Result<(), StoreError> {
        let mut rows = self.read_all().await?;
        rows.retain(|row| !row.is_superseded_by_menu_on(menu.date));
        rows.push(menu);
        self.replace_all(rows).await
    }

    fn backend_name(&self) -> &'static str;
}
