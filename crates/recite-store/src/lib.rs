//! SQLite persistence for words, units, unit memberships and forgotten-word marks.

mod forgotten;
mod schema;
mod unit;
mod unit_word;
mod word;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use forgotten::ForgottenWordStore;
pub use unit::UnitStore;
pub use unit_word::UnitWordStore;
pub use word::WordStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("unit list contains unknown id {0}")]
    UnknownUnit(i64),

    #[error("unit list contains id {0} more than once")]
    DuplicateUnit(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Insert rejected by a UNIQUE constraint
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StoreError::Database(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Connection pool plus the repositories built on it
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database at `url` and migrate the schema
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let filename = options.get_filename();
        if let Some(parent) = filename.parent() {
            if !parent.as_os_str().is_empty() && filename.to_str() != Some(":memory:") {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        schema::migrate(&db.pool).await?;
        tracing::info!("Database ready at {}", url);
        Ok(db)
    }

    /// Private in-memory database on a single long-lived connection
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        schema::migrate(&db.pool).await?;
        Ok(db)
    }

    pub fn words(&self) -> WordStore {
        WordStore::new(self.pool.clone())
    }

    pub fn units(&self) -> UnitStore {
        UnitStore::new(self.pool.clone())
    }

    pub fn unit_words(&self) -> UnitWordStore {
        UnitWordStore::new(self.pool.clone())
    }

    pub fn forgotten_words(&self) -> ForgottenWordStore {
        ForgottenWordStore::new(self.pool.clone())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
