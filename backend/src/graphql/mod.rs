//! GraphQL API with subscriptions for real-time updates
//!
//! This module provides the GraphQL API using async-graphql with support for
//! queries, mutations, and subscriptions over WebSocket. It is the only API
//! surface of the server apart from the health probes.

pub mod auth;
pub mod filters;
pub mod helpers;
pub mod mutations;
pub mod pagination;
pub mod queries;
mod schema;
mod subscriptions;
pub mod types;

pub use crate::error::ApiError;
pub use auth::{AuthExt, CurrentUser};
pub use schema::{HackernewsSchema, MutationRoot, QueryRoot, build_schema};
pub use subscriptions::SubscriptionRoot;
