//! Database connection and repositories
//!
//! SQLite through sqlx. Each repository is a cheap handle over the shared pool;
//! obtain one per call via the accessors on [Database].

pub mod comments;
pub mod error;
pub mod links;
pub mod sqlite_helpers;
pub mod users;
pub mod votes;

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use comments::{CommentRecord, CommentRepository, CreateComment};
pub use error::{StoreError, StoreResult};
pub use links::{CreateLink, LinkFeedQuery, LinkOrder, LinkRecord, LinkRepository, LinkSortColumn};
pub use users::{CreateUser, UserRecord, UserRepository};
pub use votes::{VoteRecord, VoteRepository};

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a SQLite database, creating the file if it does not exist.
    /// Foreign keys are enforced on every connection.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid DATABASE_URL '{}'", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    /// Private in-memory database. Every SQLite memory connection is its own
    /// database, so the pool is pinned to a single connection that never expires.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        Ok(())
    }

    /// Cheap connectivity check used by the readiness probe
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Get a links repository
    pub fn links(&self) -> LinkRepository {
        LinkRepository::new(self.pool.clone())
    }

    /// Get a comments repository
    pub fn comments(&self) -> CommentRepository {
        CommentRepository::new(self.pool.clone())
    }

    /// Get a users repository
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Get a votes repository
    pub fn votes(&self) -> VoteRepository {
        VoteRepository::new(self.pool.clone())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn create_user(db: &Database, email: &str) -> UserRecord {
        db.users()
            .create(CreateUser {
                name: "Ada".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    async fn create_link(db: &Database, url: &str, description: &str) -> LinkRecord {
        db.links()
            .create(CreateLink {
                url: url.to_string(),
                description: description.to_string(),
                posted_by_id: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ping_and_migrate_twice() {
        let db = test_db().await;
        assert!(db.ping().await);
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn test_comment_on_missing_link_is_foreign_key_violation() {
        let db = test_db().await;

        let result = db
            .comments()
            .create(CreateComment {
                link_id: 42,
                body: "hello".to_string(),
            })
            .await;

        assert_matches!(result, Err(StoreError::ForeignKeyViolation));
        assert_eq!(db.comments().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let db = test_db().await;
        create_user(&db, "ada@example.com").await;

        let result = db
            .users()
            .create(CreateUser {
                name: "Other".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await;

        assert_matches!(result, Err(StoreError::UniqueViolation));
    }

    #[tokio::test]
    async fn test_duplicate_vote_is_unique_violation() {
        let db = test_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let link = create_link(&db, "https://example.com/", "Example").await;

        db.votes().create(link.id, user.id).await.unwrap();
        let second = db.votes().create(link.id, user.id).await;

        assert_matches!(second, Err(StoreError::UniqueViolation));
        assert_eq!(db.votes().count_for(link.id, user.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_feed_filters_description_or_url() {
        let db = test_db().await;
        create_link(&db, "https://graphql.org/", "Query language").await;
        create_link(&db, "https://www.rust-lang.org/", "A language for GraphQL servers").await;
        create_link(&db, "https://example.com/", "Nothing here").await;

        let query = LinkFeedQuery {
            filter_needle: Some("graphql".to_string()),
            ..Default::default()
        };
        let links = db.links().feed(&query).await.unwrap();

        let urls: Vec<_> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://graphql.org/", "https://www.rust-lang.org/"]);
    }

    #[tokio::test]
    async fn test_feed_wildcards_match_literally() {
        let db = test_db().await;
        create_link(&db, "https://example.com/a", "100% rust").await;
        create_link(&db, "https://example.com/b", "100 percent rust").await;

        let query = LinkFeedQuery {
            filter_needle: Some("100%".to_string()),
            ..Default::default()
        };
        let links = db.links().feed(&query).await.unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].description, "100% rust");
    }

    #[tokio::test]
    async fn test_feed_window_and_order() {
        let db = test_db().await;
        for i in 0..5 {
            create_link(&db, &format!("https://example.com/{i}"), &format!("link {i}")).await;
        }

        let page = db
            .links()
            .feed(&LinkFeedQuery {
                skip: 1,
                take: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        let descriptions: Vec<_> = page.iter().map(|l| l.description.as_str()).collect();
        assert_eq!(descriptions, vec!["link 1", "link 2"]);

        let reversed = db
            .links()
            .feed(&LinkFeedQuery {
                order: vec![LinkOrder {
                    column: LinkSortColumn::Description,
                    descending: true,
                }],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(reversed.first().map(|l| l.description.as_str()), Some("link 4"));
    }

    #[tokio::test]
    async fn test_links_by_poster() {
        let db = test_db().await;
        let user = create_user(&db, "ada@example.com").await;
        db.links()
            .create(CreateLink {
                url: "https://example.com/".to_string(),
                description: "mine".to_string(),
                posted_by_id: Some(user.id),
            })
            .await
            .unwrap();
        create_link(&db, "https://example.org/", "anonymous").await;

        let links = db.links().list_by_poster(user.id).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].description, "mine");
    }
}
