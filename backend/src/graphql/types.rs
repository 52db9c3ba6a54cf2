//! GraphQL object types
//!
//! Scalar fields are plain struct fields. Relations are resolved lazily, one
//! store lookup per field, and only when the client selects them.

use async_graphql::{ComplexObject, Context, ID, Result, SimpleObject};
use chrono::{DateTime, Utc};

use crate::db::{CommentRecord, Database, LinkRecord, UserRecord, VoteRecord};
use crate::error::{ApiError, IntoGqlResult};

use super::helpers::to_id;

/// A submitted URL with a description
#[derive(SimpleObject, Debug, Clone)]
#[graphql(complex)]
pub struct Link {
    pub id: ID,
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    #[graphql(skip)]
    pub key: i64,
    #[graphql(skip)]
    pub posted_by_id: Option<i64>,
}

impl From<LinkRecord> for Link {
    fn from(r: LinkRecord) -> Self {
        Self {
            id: to_id(r.id),
            description: r.description,
            url: r.url,
            created_at: r.created_at,
            key: r.id,
            posted_by_id: r.posted_by_id,
        }
    }
}

#[ComplexObject]
impl Link {
    /// Comments on this link, oldest first
    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<Comment>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db.comments().list_by_link(self.key).await.into_gql()?;
        Ok(records.into_iter().map(Comment::from).collect())
    }

    /// The user who posted this link, if it was posted while signed in
    async fn posted_by(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Some(user_id) = self.posted_by_id else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();
        let record = db.users().get_by_id(user_id).await.into_gql()?;
        Ok(record.map(User::from))
    }

    /// Votes cast on this link
    async fn votes(&self, ctx: &Context<'_>) -> Result<Vec<Vote>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db.votes().list_by_link(self.key).await.into_gql()?;
        Ok(records.into_iter().map(Vote::from).collect())
    }
}

/// Text attached to exactly one link
#[derive(SimpleObject, Debug, Clone)]
#[graphql(complex)]
pub struct Comment {
    pub id: ID,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[graphql(skip)]
    pub link_id: i64,
}

impl From<CommentRecord> for Comment {
    fn from(r: CommentRecord) -> Self {
        Self {
            id: to_id(r.id),
            body: r.body,
            created_at: r.created_at,
            link_id: r.link_id,
        }
    }
}

#[ComplexObject]
impl Comment {
    /// The link this comment belongs to
    async fn link(&self, ctx: &Context<'_>) -> Result<Link> {
        load_link(ctx, self.link_id).await
    }
}

/// A registered user. The password hash never leaves the store.
#[derive(SimpleObject, Debug, Clone)]
#[graphql(complex)]
pub struct User {
    pub id: ID,
    pub name: String,
    pub email: String,
    #[graphql(skip)]
    pub key: i64,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: to_id(r.id),
            name: r.name,
            email: r.email,
            key: r.id,
        }
    }
}

#[ComplexObject]
impl User {
    /// Links this user posted
    async fn links(&self, ctx: &Context<'_>) -> Result<Vec<Link>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db.links().list_by_poster(self.key).await.into_gql()?;
        Ok(records.into_iter().map(Link::from).collect())
    }
}

/// One user's endorsement of one link
#[derive(SimpleObject, Debug, Clone)]
#[graphql(complex)]
pub struct Vote {
    pub id: ID,
    pub created_at: DateTime<Utc>,
    #[graphql(skip)]
    pub link_id: i64,
    #[graphql(skip)]
    pub user_id: i64,
}

impl From<VoteRecord> for Vote {
    fn from(r: VoteRecord) -> Self {
        Self {
            id: to_id(r.id),
            created_at: r.created_at,
            link_id: r.link_id,
            user_id: r.user_id,
        }
    }
}

#[ComplexObject]
impl Vote {
    /// The link voted for
    async fn link(&self, ctx: &Context<'_>) -> Result<Link> {
        load_link(ctx, self.link_id).await
    }

    /// The user who voted
    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        let db = ctx.data_unchecked::<Database>();
        match db.users().get_by_id(self.user_id).await.into_gql()? {
            Some(record) => Ok(User::from(record)),
            None => {
                tracing::error!(vote_id = %self.id.as_str(), user_id = self.user_id, "Vote references a missing user");
                Err(ApiError::Internal).into_gql()
            }
        }
    }
}

/// Signed token returned once from signup or login
#[derive(SimpleObject, Debug, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Non-null link relations are guaranteed by foreign keys; a miss is a store fault.
async fn load_link(ctx: &Context<'_>, link_id: i64) -> Result<Link> {
    let db = ctx.data_unchecked::<Database>();
    match db.links().get_by_id(link_id).await.into_gql()? {
        Some(record) => Ok(Link::from(record)),
        None => {
            tracing::error!(link_id, "Relation references a missing link");
            Err(ApiError::Internal).into_gql()
        }
    }
}
