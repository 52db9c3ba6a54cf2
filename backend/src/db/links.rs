//! Links database repository

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::error::StoreResult;
use super::sqlite_helpers::{decode_datetime, escape_like, now_iso8601};

const LINK_COLUMNS: &str = "id, url, description, posted_by_id, created_at";

/// Link record from database
#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub id: i64,
    pub url: String,
    pub description: String,
    pub posted_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for LinkRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let created_str: String = row.try_get("created_at")?;

        Ok(Self {
            id: row.try_get("id")?,
            url: row.try_get("url")?,
            description: row.try_get("description")?,
            posted_by_id: row.try_get("posted_by_id")?,
            created_at: decode_datetime(&created_str)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateLink {
    pub url: String,
    pub description: String,
    pub posted_by_id: Option<i64>,
}

/// Sortable link columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSortColumn {
    CreatedAt,
    Description,
    Url,
}

impl LinkSortColumn {
    fn as_sql(self) -> &'static str {
        match self {
            LinkSortColumn::CreatedAt => "created_at",
            LinkSortColumn::Description => "description",
            LinkSortColumn::Url => "url",
        }
    }
}

/// One `ORDER BY` term for the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOrder {
    pub column: LinkSortColumn,
    pub descending: bool,
}

/// Feed query: optional needle, window and ordering.
/// Rows always finish with `id ASC` so pages are stable.
#[derive(Debug, Clone)]
pub struct LinkFeedQuery {
    pub filter_needle: Option<String>,
    pub skip: i64,
    pub take: i64,
    pub order: Vec<LinkOrder>,
}

impl Default for LinkFeedQuery {
    fn default() -> Self {
        Self {
            filter_needle: None,
            skip: 0,
            take: 30,
            order: Vec::new(),
        }
    }
}

pub struct LinkRepository {
    pool: SqlitePool,
}

impl LinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a link
    pub async fn create(&self, link: CreateLink) -> StoreResult<LinkRecord> {
        let record = sqlx::query_as::<_, LinkRecord>(&format!(
            "INSERT INTO links (url, description, posted_by_id, created_at) VALUES (?, ?, ?, ?) RETURNING {LINK_COLUMNS}"
        ))
        .bind(&link.url)
        .bind(&link.description)
        .bind(link.posted_by_id)
        .bind(now_iso8601())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get link by ID
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<LinkRecord>> {
        let record = sqlx::query_as::<_, LinkRecord>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Page through links, optionally matching a substring of description or url
    pub async fn feed(&self, query: &LinkFeedQuery) -> StoreResult<Vec<LinkRecord>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {LINK_COLUMNS} FROM links"));

        if let Some(needle) = query.filter_needle.as_deref() {
            let pattern = format!("%{}%", escape_like(needle));
            builder
                .push(" WHERE description LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR url LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\'");
        }

        builder.push(" ORDER BY ");
        for order in &query.order {
            builder
                .push(order.column.as_sql())
                .push(if order.descending { " DESC, " } else { " ASC, " });
        }
        builder
            .push("id ASC LIMIT ")
            .push_bind(query.take)
            .push(" OFFSET ")
            .push_bind(query.skip);

        let records = builder
            .build_query_as::<LinkRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// All links posted by a user, oldest first
    pub async fn list_by_poster(&self, user_id: i64) -> StoreResult<Vec<LinkRecord>> {
        let records = sqlx::query_as::<_, LinkRecord>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE posted_by_id = ? ORDER BY id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
