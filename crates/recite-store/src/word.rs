use std::collections::HashMap;

use chrono::NaiveDateTime;
use recite_types::{RawDefinition, WordRecord};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::Result;

const WORD_COLUMNS: &str =
    "id, word, ph_en, ph_am, mean_tag, parts_json, sentences_json, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct WordRow {
    id: i64,
    word: String,
    ph_en: String,
    ph_am: String,
    mean_tag: String,
    parts_json: String,
    sentences_json: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<WordRow> for WordRecord {
    type Error = serde_json::Error;

    fn try_from(row: WordRow) -> std::result::Result<Self, Self::Error> {
        let parts = if row.parts_json.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&row.parts_json)?
        };
        let sentence_groups = if row.sentences_json.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&row.sentences_json)?
        };

        Ok(WordRecord {
            id: row.id,
            word: row.word,
            ph_en: row.ph_en,
            ph_am: row.ph_am,
            mean_tag: row.mean_tag,
            parts,
            sentence_groups,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Durable word cache keyed by normalized word
#[derive(Clone, Debug)]
pub struct WordStore {
    pool: SqlitePool,
}

impl WordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_word(&self, word: &str) -> Result<Option<WordRecord>> {
        let row: Option<WordRow> =
            sqlx::query_as(&format!("SELECT {WORD_COLUMNS} FROM words WHERE word = ? LIMIT 1"))
                .bind(word)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(WordRecord::try_from).transpose()?)
    }

    pub async fn get_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, WordRecord>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {WORD_COLUMNS} FROM words WHERE id IN ("));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows: Vec<WordRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        tracing::debug!("Loaded {} of {} requested words", rows.len(), ids.len());

        let mut words = HashMap::with_capacity(rows.len());
        for row in rows {
            let record = WordRecord::try_from(row)?;
            words.insert(record.id, record);
        }
        Ok(words)
    }

    /// Insert a freshly fetched definition.
    ///
    /// Fails with a unique violation (see [`crate::StoreError::is_unique_violation`])
    /// when the word is already stored.
    pub async fn create(&self, definition: &RawDefinition) -> Result<WordRecord> {
        let parts_json = serde_json::to_string(&definition.parts)?;
        let sentences_json = serde_json::to_string(&definition.sentence_groups)?;

        let row: WordRow = sqlx::query_as(&format!(
            "INSERT INTO words (word, ph_en, ph_am, mean_tag, parts_json, sentences_json)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {WORD_COLUMNS}"
        ))
        .bind(&definition.word)
        .bind(&definition.ph_en)
        .bind(&definition.ph_am)
        .bind(&definition.mean_tag)
        .bind(parts_json)
        .bind(sentences_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(WordRecord::try_from(row)?)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM words")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
