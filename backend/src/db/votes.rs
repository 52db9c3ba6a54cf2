//! Votes database repository
//!
//! At most one vote exists per (link, user) pair; the table's unique
//! constraint is the backstop when two votes race.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::error::StoreResult;
use super::sqlite_helpers::{decode_datetime, now_iso8601};

const VOTE_COLUMNS: &str = "id, link_id, user_id, created_at";

/// Vote record from database
#[derive(Debug, Clone)]
pub struct VoteRecord {
    pub id: i64,
    pub link_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for VoteRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let created_str: String = row.try_get("created_at")?;

        Ok(Self {
            id: row.try_get("id")?,
            link_id: row.try_get("link_id")?,
            user_id: row.try_get("user_id")?,
            created_at: decode_datetime(&created_str)?,
        })
    }
}

pub struct VoteRepository {
    pool: SqlitePool,
}

impl VoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a vote for `(link_id, user_id)`
    pub async fn create(&self, link_id: i64, user_id: i64) -> StoreResult<VoteRecord> {
        let record = sqlx::query_as::<_, VoteRecord>(&format!(
            "INSERT INTO votes (link_id, user_id, created_at) VALUES (?, ?, ?) RETURNING {VOTE_COLUMNS}"
        ))
        .bind(link_id)
        .bind(user_id)
        .bind(now_iso8601())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Find the vote a user cast on a link, if any
    pub async fn find(&self, link_id: i64, user_id: i64) -> StoreResult<Option<VoteRecord>> {
        let record = sqlx::query_as::<_, VoteRecord>(&format!(
            "SELECT {VOTE_COLUMNS} FROM votes WHERE link_id = ? AND user_id = ?"
        ))
        .bind(link_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Votes on a link, oldest first
    pub async fn list_by_link(&self, link_id: i64) -> StoreResult<Vec<VoteRecord>> {
        let records = sqlx::query_as::<_, VoteRecord>(&format!(
            "SELECT {VOTE_COLUMNS} FROM votes WHERE link_id = ? ORDER BY id ASC"
        ))
        .bind(link_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Number of votes for a `(link, user)` pair
    pub async fn count_for(&self, link_id: i64, user_id: i64) -> StoreResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE link_id = ? AND user_id = ?")
                .bind(link_id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
