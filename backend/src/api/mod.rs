//! HTTP route definitions
//!
//! The API is GraphQL at /graphql (WebSocket subscriptions at /graphql/ws).
//! Health probes live outside GraphQL so load balancers can reach them.

pub mod graphql;
pub mod health;
