//! Application state and HTTP router construction.
//!
//! Used by [main] and by the integration tests to build the Axum app.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::graphql::{HackernewsSchema, build_schema};
use crate::services::{AuthConfig, AuthService, PubSub};

/// Shared state for HTTP handlers (GraphQL, health probes).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub schema: HackernewsSchema,
    pub auth: Arc<AuthService>,
    pub pubsub: Arc<PubSub>,
}

impl AppState {
    /// Wire services and the schema around an already migrated database
    pub fn new(config: Arc<Config>, db: Database) -> Self {
        let auth = Arc::new(AuthService::new(db.clone(), AuthConfig::from(config.as_ref())));
        let pubsub = Arc::new(PubSub::new(config.pubsub_capacity));
        let schema = build_schema(db.clone(), auth.clone(), pubsub.clone());

        Self {
            config,
            db,
            schema,
            auth,
            pubsub,
        }
    }
}

/// Build the full Axum router: health probes, /graphql, /graphql/ws and layers.
/// Returns Router<()> (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::health::router())
        .merge(api::graphql::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
