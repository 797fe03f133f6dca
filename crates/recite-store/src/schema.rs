use sqlx::SqlitePool;

const DDL: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        word TEXT NOT NULL,
        ph_en TEXT NOT NULL DEFAULT '',
        ph_am TEXT NOT NULL DEFAULT '',
        mean_tag TEXT NOT NULL DEFAULT '',
        parts_json TEXT NOT NULL,
        sentences_json TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        CONSTRAINT uq_word UNIQUE (word)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS recite_units (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        recite_date TEXT NULL,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_units_sort ON recite_units (sort_order, id)",
    "CREATE INDEX IF NOT EXISTS idx_units_recite_date ON recite_units (recite_date)",
    r#"CREATE TABLE IF NOT EXISTS recite_unit_words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        unit_id INTEGER NOT NULL REFERENCES recite_units (id) ON DELETE CASCADE,
        word_id INTEGER NOT NULL REFERENCES words (id),
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        CONSTRAINT uq_unit_word UNIQUE (unit_id, word_id)
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_unit_created ON recite_unit_words (unit_id, created_at, id)",
    r#"CREATE TABLE IF NOT EXISTS forgotten_words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        word TEXT NOT NULL,
        remembered INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_forgotten_word ON forgotten_words (word)",
    "CREATE INDEX IF NOT EXISTS idx_forgotten_remembered ON forgotten_words (remembered)",
];

/// Idempotent schema setup, safe to run on every start
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for ddl in DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}
