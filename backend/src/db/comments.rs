//! Comments database repository

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::error::StoreResult;
use super::sqlite_helpers::{decode_datetime, now_iso8601};

const COMMENT_COLUMNS: &str = "id, body, link_id, created_at";

/// Comment record from database
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: i64,
    pub body: String,
    pub link_id: i64,
    pub created_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for CommentRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let created_str: String = row.try_get("created_at")?;

        Ok(Self {
            id: row.try_get("id")?,
            body: row.try_get("body")?,
            link_id: row.try_get("link_id")?,
            created_at: decode_datetime(&created_str)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateComment {
    pub link_id: i64,
    pub body: String,
}

pub struct CommentRepository {
    pool: SqlitePool,
}

impl CommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a comment. A missing link surfaces as
    /// [StoreError::ForeignKeyViolation](super::StoreError::ForeignKeyViolation)
    /// and nothing is written.
    pub async fn create(&self, comment: CreateComment) -> StoreResult<CommentRecord> {
        let record = sqlx::query_as::<_, CommentRecord>(&format!(
            "INSERT INTO comments (body, link_id, created_at) VALUES (?, ?, ?) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(&comment.body)
        .bind(comment.link_id)
        .bind(now_iso8601())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get comment by ID
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<CommentRecord>> {
        let record = sqlx::query_as::<_, CommentRecord>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Comments on a link, oldest first
    pub async fn list_by_link(&self, link_id: i64) -> StoreResult<Vec<CommentRecord>> {
        let records = sqlx::query_as::<_, CommentRecord>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE link_id = ? ORDER BY id ASC"
        ))
        .bind(link_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Count all comments
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
