//! GraphQL HTTP and WebSocket handlers
//!
//! Both transports resolve the bearer token once per request (or once per
//! connection) and attach the matching [CurrentUser] to the request data.
//! An invalid or expired token is not an error here; the request simply runs
//! unauthenticated.

use async_graphql::Data;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::Router;
use axum::extract::{State, WebSocketUpgrade};
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;

use crate::AppState;
use crate::graphql::CurrentUser;
use crate::services::{extract_bearer_token, strip_bearer_scheme};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/graphql/ws", get(graphql_ws_handler))
}

async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        Html(
            GraphiQLSource::build()
                .endpoint("/graphql")
                .subscription_endpoint("/graphql/ws")
                .finish(),
        )
        .into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();

    let token = extract_bearer_token(&headers);
    match state.auth.current_user(token.as_deref()).await {
        Some(user) => {
            tracing::debug!(user_id = user.id, "Request authenticated");
            request = request.data(CurrentUser(user));
        }
        None if token.is_some() => tracing::debug!("Bearer token rejected"),
        None => {}
    }

    state.schema.execute(request).await.into()
}

async fn graphql_ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    protocol: GraphQLProtocol,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let header_user = state
        .auth
        .current_user(extract_bearer_token(&headers).as_deref())
        .await;

    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .on_upgrade(move |socket| {
            let auth = state.auth.clone();
            let mut ws = GraphQLWebSocket::new(socket, state.schema.clone(), protocol);
            if let Some(user) = header_user {
                let mut data = Data::default();
                data.insert(CurrentUser(user));
                ws = ws.with_data(data);
            }

            // Init data is merged over the header data, so a token in the
            // payload takes precedence and an empty payload keeps the header user.
            ws.on_connection_init(move |params| async move {
                let mut data = Data::default();
                let token = token_from_init_payload(&params);

                if let Some(user) = auth.current_user(token.as_deref()).await {
                    tracing::debug!(user_id = user.id, "WebSocket connection authenticated");
                    data.insert(CurrentUser(user));
                }
                Ok(data)
            })
            .serve()
        })
}

/// Keys checked, in order, for a token in the `connection_init` payload
const INIT_TOKEN_KEYS: [&str; 3] = ["Authorization", "authorization", "authToken"];

/// Token carried by a `connection_init` payload, with or without a `Bearer` scheme
fn token_from_init_payload(params: &serde_json::Value) -> Option<String> {
    let raw = INIT_TOKEN_KEYS
        .iter()
        .find_map(|key| params.get(*key).and_then(|v| v.as_str()))?
        .trim();
    let token = strip_bearer_scheme(raw).unwrap_or(raw);

    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_token_from_init_payload() {
        assert_eq!(
            token_from_init_payload(&json!({ "authToken": "abc" })).as_deref(),
            Some("abc")
        );
        assert_eq!(
            token_from_init_payload(&json!({ "Authorization": "Bearer abc" })).as_deref(),
            Some("abc")
        );
        assert_eq!(
            token_from_init_payload(&json!({ "authorization": "bearer abc" })).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_token_from_init_payload_missing() {
        assert_eq!(token_from_init_payload(&json!({})), None);
        assert_eq!(token_from_init_payload(&serde_json::Value::Null), None);
        assert_eq!(token_from_init_payload(&json!({ "authToken": "  " })), None);
        assert_eq!(token_from_init_payload(&json!({ "authToken": 42 })), None);
    }
}
