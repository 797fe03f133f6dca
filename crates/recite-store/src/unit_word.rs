use chrono::NaiveDateTime;
use recite_types::UnitWord;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::Result;

#[derive(sqlx::FromRow)]
struct UnitWordRow {
    id: i64,
    unit_id: i64,
    word_id: i64,
    created_at: NaiveDateTime,
}

impl From<UnitWordRow> for UnitWord {
    fn from(row: UnitWordRow) -> Self {
        UnitWord {
            id: row.id,
            unit_id: row.unit_id,
            word_id: row.word_id,
            created_at: row.created_at,
        }
    }
}

/// Which words belong to which unit
#[derive(Clone, Debug)]
pub struct UnitWordStore {
    pool: SqlitePool,
}

impl UnitWordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Adding a word twice is a no-op
    pub async fn add(&self, unit_id: i64, word_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO recite_unit_words (unit_id, word_id) VALUES (?, ?)
             ON CONFLICT (unit_id, word_id) DO NOTHING",
        )
        .bind(unit_id)
        .bind(word_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Newest membership first
    pub async fn list_by_unit(&self, unit_id: i64) -> Result<Vec<UnitWord>> {
        let rows: Vec<UnitWordRow> = sqlx::query_as(
            "SELECT id, unit_id, word_id, created_at FROM recite_unit_words
             WHERE unit_id = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UnitWord::from).collect())
    }

    pub async fn list_by_units(&self, unit_ids: &[i64]) -> Result<Vec<UnitWord>> {
        if unit_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, unit_id, word_id, created_at FROM recite_unit_words WHERE unit_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in unit_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY created_at DESC, id DESC");

        let rows: Vec<UnitWordRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(UnitWord::from).collect())
    }
}
