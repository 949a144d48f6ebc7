//! Named counters backing per-project reference numbers.
//!
//! Each project owns one sequence row; `next_value` advances and reads it in
//! a single UPDATE so concurrent callers inside the same backend never see
//! the same value twice.

use anyhow::{anyhow, Result};
use sea_orm::{ConnectionTrait, DbBackend, Statement};

pub fn make_sequence_name(project_id: i32) -> String {
    format!("refseq:{project_id}")
}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str, start: i64) -> Result<()> {
    // Stored value is the last handed-out number, so a sequence starting at
    // `start` is seeded with `start - 1`.
    db.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "INSERT INTO sequences (name, value) VALUES (?, ?)",
        [name.into(), (start - 1).into()],
    ))
    .await?;
    Ok(())
}

pub async fn exists<C: ConnectionTrait>(db: &C, name: &str) -> Result<bool> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            "SELECT COUNT(*) AS n FROM sequences WHERE name = ?",
            [name.into()],
        ))
        .await?;
    let count: i64 = row.map(|r| r.try_get("", "n")).transpose()?.unwrap_or(0);
    Ok(count > 0)
}

/// Raise the sequence to at least `value`. Never lowers it, so replaying
/// smaller maxima is harmless.
pub async fn set_max<C: ConnectionTrait>(db: &C, name: &str, value: i64) -> Result<()> {
    db.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "UPDATE sequences SET value = MAX(value, ?) WHERE name = ?",
        [value.into(), name.into()],
    ))
    .await?;
    Ok(())
}

pub async fn next_value<C: ConnectionTrait>(db: &C, name: &str) -> Result<i64> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            "UPDATE sequences SET value = value + 1 WHERE name = ? RETURNING value",
            [name.into()],
        ))
        .await?
        .ok_or_else(|| anyhow!("sequence '{name}' does not exist"))?;
    Ok(row.try_get("", "value")?)
}

pub async fn delete<C: ConnectionTrait>(db: &C, name: &str) -> Result<()> {
    db.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "DELETE FROM sequences WHERE name = ?",
        [name.into()],
    ))
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_and_advance() {
        let db = setup_test_db().await;
        create(&db, "refseq:1", 1).await.unwrap();
        assert!(exists(&db, "refseq:1").await.unwrap());
        assert!(!exists(&db, "refseq:2").await.unwrap());

        assert_eq!(next_value(&db, "refseq:1").await.unwrap(), 1);
        assert_eq!(next_value(&db, "refseq:1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_set_max_is_monotone() {
        let db = setup_test_db().await;
        create(&db, "refseq:9", 1).await.unwrap();

        set_max(&db, "refseq:9", 40).await.unwrap();
        set_max(&db, "refseq:9", 12).await.unwrap();
        assert_eq!(next_value(&db, "refseq:9").await.unwrap(), 41);
    }

    #[tokio::test]
    async fn test_next_on_missing_sequence_fails() {
        let db = setup_test_db().await;
        assert!(next_value(&db, "refseq:404").await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = setup_test_db().await;
        create(&db, "refseq:3", 5).await.unwrap();
        delete(&db, "refseq:3").await.unwrap();
        assert!(!exists(&db, "refseq:3").await.unwrap());
    }
}
