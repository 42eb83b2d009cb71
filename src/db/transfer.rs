use std::io;
use std::path::Path;

use super::csv_file::CsvRecordStore;
use super::store::{RecordStore, StoreError};

/// Writes the whole table of `store` to a CSV file at `path`.
/// Returns the number of rows written.
pub async fn export_to_csv(store: &dyn RecordStore, path: &Path) -> Result<usize, StoreError> {
    let rows = store.read_all().await?;
    let count = rows.len();
    CsvRecordStore::new(path).replace_all(rows).await?;
    Ok(count)
}

/// Replaces the whole table of `store` with the rows of the CSV file at `path`.
/// Returns the number of rows imported.
pub async fn import_from_csv(store: &dyn RecordStore, path: &Path) -> Result<usize, StoreError> {
    // A missing file reads as an empty table; never let that wipe the store.
    if !tokio::fs::try_exists(path).await? {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )
        .into());
    }
    let rows = CsvRecordStore::new(path).read_all().await?;
    let count = rows.len();
    store.replace_all(rows).await?;
    Ok(count)
}
