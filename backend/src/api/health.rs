//! Liveness and readiness probes

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

/// Live subscriber count per topic
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberCounts {
    pub new_link: usize,
    pub new_vote: usize,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub database: bool,
    pub subscribers: SubscriberCounts,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: "healthy",
    })
}

/// Ready once the store answers. Subscriber counts are informational.
async fn readyz(State(state): State<AppState>) -> Json<ReadyResponse> {
    let database = state.db.ping().await;
    if !database {
        tracing::warn!("Readiness check failed: database unreachable");
    }

    Json(ReadyResponse {
        ready: database,
        database,
        subscribers: SubscriberCounts {
            new_link: state.pubsub.new_link.receiver_count(),
            new_vote: state.pubsub.new_vote.receiver_count(),
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
