use sqlx::SqlitePool;

use crate::Result;

/// History of "I forgot this word" marks
#[derive(Clone, Debug)]
pub struct ForgottenWordStore {
    pool: SqlitePool,
}

impl ForgottenWordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn add(&self, word: &str) -> Result<()> {
        sqlx::query("INSERT INTO forgotten_words (word, remembered) VALUES (?, 0)")
            .bind(word)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Distinct words with an unremembered mark, most recently marked first
    pub async fn list_unremembered(&self) -> Result<Vec<String>> {
        let words: Vec<String> = sqlx::query_scalar(
            "SELECT word FROM forgotten_words
             WHERE remembered = 0
             GROUP BY word
             ORDER BY MAX(created_at) DESC, MAX(id) DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(words)
    }

    /// Flag every mark of `word` as remembered, returning how many changed
    pub async fn mark_remembered(&self, word: &str) -> Result<u64> {
        let result =
            sqlx::query("UPDATE forgotten_words SET remembered = 1 WHERE word = ? AND remembered = 0")
                .bind(word)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
