//! Database initialization and rating persistence
//!
//! One table, `meme_ratings`, holding one row per rating action. Rows are
//! append-only: never updated, never deleted. Schema creation is idempotent
//! so the service can be restarted against an existing database file.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows concurrent readers while a rating insert is in flight
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    // Set busy timeout
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    // Idempotent - safe to call multiple times
    create_meme_ratings_table(&pool).await?;

    Ok(pool)
}

/// Create the meme_ratings table
///
/// One row per rating action: (user, meme, score). Append-only.
pub async fn create_meme_ratings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meme_ratings (
            user_id TEXT NOT NULL,
            meme_name TEXT NOT NULL,
            rating INTEGER NOT NULL,
            CHECK (rating >= 1 AND rating <= 5)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_meme_ratings_meme_name ON meme_ratings(meme_name)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Append one rating row
pub async fn insert_rating(
    pool: &SqlitePool,
    user_id: &str,
    meme_name: &str,
    rating: u8,
) -> Result<()> {
    sqlx::query("INSERT INTO meme_ratings (user_id, meme_name, rating) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(meme_name)
        .bind(rating as i64)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("ratings.db");

        let pool = init_database(&db_path).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meme_ratings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("ratings.db");

        let pool = init_database(&db_path).await.unwrap();
        insert_rating(&pool, "user-1", "doge", 4).await.unwrap();
        pool.close().await;

        // Second init against the same file must not disturb existing rows
        let pool = init_database(&db_path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meme_ratings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_insert_rating_appends() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("ratings.db")).await.unwrap();

        insert_rating(&pool, "user-1", "doge", 3).await.unwrap();
        insert_rating(&pool, "user-2", "doge", 5).await.unwrap();
        insert_rating(&pool, "user-1", "doge", 1).await.unwrap();

        // Re-rating appends, never replaces
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM meme_ratings WHERE meme_name = 'doge'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 3);

        let user1: Vec<i64> = sqlx::query_scalar(
            "SELECT rating FROM meme_ratings WHERE user_id = 'user-1' ORDER BY rowid",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(user1, vec![3, 1]);
    }
}
