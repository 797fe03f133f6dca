use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use recite_types::Unit;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{Result, StoreError};

const UNIT_COLUMNS: &str = "id, name, recite_date, sort_order, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UnitRow {
    id: i64,
    name: String,
    recite_date: Option<NaiveDate>,
    sort_order: i64,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<UnitRow> for Unit {
    fn from(row: UnitRow) -> Self {
        Unit {
            id: row.id,
            name: row.name,
            recite_date: row.recite_date,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UnitStore {
    pool: SqlitePool,
}

impl UnitStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All units, front-most (highest sort key) first
    pub async fn list(&self) -> Result<Vec<Unit>> {
        let rows: Vec<UnitRow> = sqlx::query_as(&format!(
            "SELECT {UNIT_COLUMNS} FROM recite_units ORDER BY sort_order DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Unit::from).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Unit>> {
        let row: Option<UnitRow> = sqlx::query_as(&format!(
            "SELECT {UNIT_COLUMNS} FROM recite_units WHERE id = ? LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Unit::from))
    }

    /// New units go to the front: sort key is one above the current maximum
    pub async fn create(&self, name: &str, recite_date: Option<NaiveDate>) -> Result<Unit> {
        let row: UnitRow = sqlx::query_as(&format!(
            "INSERT INTO recite_units (name, recite_date, sort_order)
             VALUES (?, ?, (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM recite_units))
             RETURNING {UNIT_COLUMNS}"
        ))
        .bind(name)
        .bind(recite_date)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created unit {} '{}'", row.id, row.name);
        Ok(row.into())
    }

    /// Returns false when no unit has this id
    pub async fn rename(&self, id: i64, name: &str, recite_date: Option<NaiveDate>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE recite_units
             SET name = ?, recite_date = ?, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
        )
        .bind(name)
        .bind(recite_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Give `ids` descending sort keys `N..=1` in input order, all or nothing.
    ///
    /// Every id must name an existing unit and appear once.
    pub async fn reorder(&self, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(dup) = ids.iter().find(|id| !seen.insert(**id)) {
            return Err(StoreError::DuplicateUnit(*dup));
        }

        // Rolled back on drop if we return early
        let mut tx = self.pool.begin().await?;

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id FROM recite_units WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let found: HashSet<i64> = builder
            .build_query_scalar::<i64>()
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .collect();
        if let Some(unknown) = ids.iter().find(|id| !found.contains(*id)) {
            return Err(StoreError::UnknownUnit(*unknown));
        }

        let total = ids.len() as i64;
        for (idx, id) in ids.iter().enumerate() {
            sqlx::query(
                "UPDATE recite_units SET sort_order = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            )
            .bind(total - idx as i64)
            .bind(*id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Remove a unit and its memberships in one transaction.
    /// Returns false when no unit has this id.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM recite_unit_words WHERE unit_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM recite_units WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Units whose recite date is exactly one of `intervals` days before `date`
    pub async fn list_review_by_date(&self, date: NaiveDate, intervals: &[i64]) -> Result<Vec<Unit>> {
        if intervals.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {UNIT_COLUMNS} FROM recite_units
             WHERE recite_date IS NOT NULL
               AND CAST(julianday("
        ));
        builder.push_bind(date);
        builder.push(") - julianday(recite_date) AS INTEGER) IN (");
        let mut separated = builder.separated(", ");
        for days in intervals {
            separated.push_bind(*days);
        }
        separated.push_unseparated(") ORDER BY sort_order DESC, id DESC");

        let rows: Vec<UnitRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Unit::from).collect())
    }
}
