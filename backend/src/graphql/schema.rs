//! GraphQL schema definition with queries, mutations, and subscriptions
//!
//! Resolvers are grouped by domain under `queries/` and `mutations/` and
//! merged into the roots here.

use std::sync::Arc;

use async_graphql::{MergedObject, Schema};
use async_graphql::extensions::Tracing;

use crate::db::Database;
use crate::services::{AuthService, PubSub};

use super::mutations::{AuthMutations, CommentMutations, LinkMutations, VoteMutations};
use super::queries::{CommentQueries, LinkQueries, SystemQueries, UserQueries};
use super::subscriptions::SubscriptionRoot;

/// The GraphQL schema type
pub type HackernewsSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(SystemQueries, LinkQueries, CommentQueries, UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(LinkMutations, CommentMutations, AuthMutations, VoteMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database, auth: Arc<AuthService>, pubsub: Arc<PubSub>) -> HackernewsSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), SubscriptionRoot)
        .data(db)
        .data(auth)
        .data(pubsub)
        .extension(Tracing)
        .finish()
}
