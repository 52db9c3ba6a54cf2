//! Application services shared across resolvers

pub mod auth;
pub mod pubsub;

pub use auth::{AuthConfig, AuthService, LoginResult, TokenClaims, extract_bearer_token, strip_bearer_scheme};
pub use pubsub::{PubSub, Topic};
