use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::store::{RecordStore, StoreError};
use crate::models::entry::Entry;

/// Lunch table in Postgres. Insertion order is the `id` sequence.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(tx: &mut Transaction<'_, Postgres>, entry: &Entry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO lunch_entries (date, meal_name, user_name, score, comment, "timestamp")
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(entry.date)
        .bind(&entry.meal_name)
        .bind(&entry.user_name)
        .bind(entry.score)
        .bind(&entry.comment)
        .bind(entry.timestamp)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn read_all(&self) -> Result<Vec<Entry>, StoreError> {
        let rows = sqlx::query_as::<_, Entry>(
            r#"SELECT date, meal_name, user_name, score, comment, "timestamp"
               FROM lunch_entries
               ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn replace_all(&self, entries: Vec<Entry>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM lunch_entries").execute(&mut *tx).await?;
        for entry in &entries {
            Self::insert(&mut tx, entry).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn append(&self, entry: Entry) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        Self::insert(&mut tx, &entry).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace_menu(&self, menu: Entry) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM lunch_entries WHERE date = $1 AND user_name IS NULL")
            .bind(menu.date)
            .execute(&mut *tx)
            .await?;
        Self::insert(&mut tx, &menu).await?;
        tx.commit().await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
