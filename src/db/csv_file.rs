use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use tracing::warn;

use super::store::{RecordStore, StoreError};
use crate::models::entry::Entry;

const HEADER: [&str; 6] = ["date", "meal_name", "user_name", "score", "comment", "timestamp"];

/// Lunch table kept as a single CSV file, the same layout a spreadsheet export uses.
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

/// Raw row as found on disk. Everything is text so that one bad cell
/// does not make the whole table unreadable.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    date: String,
    #[serde(default)]
    meal_name: Option<String>,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    score: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses a CSV document into entries, skipping rows whose date is unusable.
    pub fn parse(data: &[u8]) -> Result<Vec<Entry>, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let mut entries = Vec::new();
        for (line, record) in reader.deserialize::<CsvRow>().enumerate() {
            let row = record?;
            match row.into_entry() {
                Some(entry) => entries.push(entry),
                None => warn!("Skipping CSV row {}: unparsable date", line + 2),
            }
        }
        Ok(entries)
    }

    /// Renders entries as a CSV document with a header row.
    pub fn render(entries: &[Entry]) -> Result<Vec<u8>, StoreError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for entry in entries {
            writer.serialize(entry)?;
        }
        writer.into_inner().map_err(|e| StoreError::Io(e.into_error()))
    }
}

impl CsvRow {
    fn into_entry(self) -> Option<Entry> {
        let date = parse_date(&self.date)?;
        Some(Entry {
            date,
            meal_name: non_empty(self.meal_name),
            user_name: non_empty(self.user_name),
            score: non_empty(self.score).and_then(|s| s.parse::<f64>().ok()),
            comment: non_empty(self.comment),
            timestamp: non_empty(self.timestamp)
                .and_then(|s| NaiveTime::parse_from_str(&s, "%H:%M:%S").ok()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Accepts plain ISO dates plus the variants spreadsheet exports tend to produce.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn read_all(&self) -> Result<Vec<Entry>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Self::parse(&data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn replace_all(&self, entries: Vec<Entry>) -> Result<(), StoreError> {
        let data = Self::render(&entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write beside the target and rename so readers never see a half-written table.
        let tmp = self.path.with_extension("csv.tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "csv"
    }
}
