//! Hackernews clone GraphQL backend
//!
//! Links, comments, users and votes over a GraphQL API backed by SQLite,
//! with `newLink` and `newVote` subscriptions over WebSocket.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
