//! Authentication service for user management and JWT handling
//!
//! Provides:
//! - Signup and login
//! - Password hashing with bcrypt
//! - Token signing and verification (HS256)
//! - Resolution of the current user from a bearer token

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::{CreateUser, Database, StoreError, UserRecord};
use crate::error::{ApiError, ApiResult};

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID (subject)
    pub sub: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Token plus the user it was issued for
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub user: UserRecord,
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_lifetime_secs: i64,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_lifetime_secs: config.token_lifetime_secs,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    // ========================================================================
    // Signup / Login
    // ========================================================================

    /// Register a new user and issue a token for them
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> ApiResult<LoginResult> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::invalid_input("email", "must not be empty"));
        }
        if name.trim().is_empty() {
            return Err(ApiError::invalid_input("name", "must not be empty"));
        }
        if password.is_empty() {
            return Err(ApiError::invalid_input("password", "must not be empty"));
        }

        let users = self.db.users();
        if users.get_by_email(email).await?.is_some() {
            return Err(ApiError::EmailTaken {
                email: email.to_string(),
            });
        }

        let password_hash = self.hash_password(password).await?;

        // A concurrent signup can still win the race; the unique index decides.
        let user = users
            .create(CreateUser {
                name: name.trim().to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation => ApiError::EmailTaken {
                    email: email.to_string(),
                },
                other => ApiError::from(other),
            })?;

        let token = self.issue_token(user.id)?;
        tracing::info!(user_id = user.id, "User signed up");

        Ok(LoginResult { token, user })
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResult> {
        let user = self
            .db
            .users()
            .get_by_email(email.trim())
            .await?
            .ok_or(ApiError::NoSuchUser)?;

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::warn!(user_id = user.id, "Login rejected: invalid password");
            return Err(ApiError::InvalidPassword);
        }

        let token = self.issue_token(user.id)?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginResult { token, user })
    }

    // ========================================================================
    // Current User
    // ========================================================================

    /// Resolve the user a request acts as.
    ///
    /// Anything short of a valid, unexpired token naming an existing user
    /// yields `None`; authorization is enforced per resolver, not here.
    pub async fn current_user(&self, token: Option<&str>) -> Option<UserRecord> {
        let token = token?;

        let claims = match self.verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed; continuing anonymously");
                return None;
            }
        };

        let Ok(user_id) = claims.sub.parse::<i64>() else {
            tracing::debug!(sub = %claims.sub, "Token subject is not a user id");
            return None;
        };

        match self.db.users().get_by_id(user_id).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                tracing::debug!(user_id, "Token refers to a user that no longer exists");
                None
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to load user for token");
                None
            }
        }
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Hash a password with bcrypt on the blocking pool
    pub async fn hash_password(&self, password: &str) -> ApiResult<String> {
        let password = password.to_string();
        let cost = self.config.bcrypt_cost;

        run_blocking("hash password", move || hash(password, cost)).await
    }

    /// Verify a password against a hash on the blocking pool
    pub async fn verify_password(&self, password: &str, hash: &str) -> ApiResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();

        run_blocking("verify password", move || verify(password, &hash)).await
    }

    /// Sign a token for a user
    pub fn issue_token(&self, user_id: i64) -> ApiResult<String> {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(self.config.token_lifetime_secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                tracing::error!(
                    token_lifetime_secs = self.config.token_lifetime_secs,
                    "Token lifetime out of range"
                );
                ApiError::Internal
            })?;
        let claims = TokenClaims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            ApiError::Internal
        })
    }

    /// Check signature and expiry
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}

/// Run a bcrypt operation off the async workers
async fn run_blocking<T, F>(what: &'static str, f: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, bcrypt::BcryptError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Failed to {}", what);
            Err(ApiError::Internal)
        }
        Err(e) => {
            tracing::error!(error = %e, "Blocking task failed to {}", what);
            Err(ApiError::Internal)
        }
    }
}

/// Token part of a `Bearer <token>` credential. The scheme is matched
/// case-insensitively; an empty token yields `None`.
pub fn strip_bearer_scheme(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Extract the bearer token from an `Authorization` header.
/// A missing header, a different scheme or an empty token all yield `None`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(strip_bearer_scheme)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use super::*;

    async fn service_with_lifetime(lifetime: i64) -> AuthService {
        service_with(lifetime, 4).await
    }

    async fn service_with(lifetime: i64, bcrypt_cost: u32) -> AuthService {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        AuthService::new(
            db,
            AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_lifetime_secs: lifetime,
                bcrypt_cost,
            },
        )
    }

    async fn service() -> AuthService {
        service_with_lifetime(3600).await
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc.def"));
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("BEARER  abc.def "));
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearerabc.def"));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_strip_bearer_scheme() {
        assert_eq!(strip_bearer_scheme("Bearer tok"), Some("tok"));
        assert_eq!(strip_bearer_scheme("bEaReR tok"), Some("tok"));
        assert_eq!(strip_bearer_scheme("tok"), None);
        assert_eq!(strip_bearer_scheme("Token tok"), None);
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let auth = service().await;
        let result = auth.signup("ada@example.com", "secret", "Ada").await.unwrap();

        assert_ne!(result.user.password_hash, "secret");
        assert!(
            auth.verify_password("secret", &result.user.password_hash)
                .await
                .unwrap()
        );
        assert!(
            !auth.verify_password("wrong", &result.user.password_hash)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_signup_token_resolves_current_user() {
        let auth = service().await;
        let result = auth.signup("ada@example.com", "secret", "Ada").await.unwrap();

        let user = auth.current_user(Some(&result.token)).await;
        assert_eq!(user.map(|u| u.id), Some(result.user.id));
    }

    #[tokio::test]
    async fn test_duplicate_signup_is_domain_error() {
        let auth = service().await;
        auth.signup("ada@example.com", "secret", "Ada").await.unwrap();

        let second = auth.signup("ada@example.com", "other", "Imposter").await;
        assert_matches!(second, Err(ApiError::EmailTaken { .. }));
    }

    #[tokio::test]
    async fn test_signup_requires_fields() {
        let auth = service().await;
        assert_matches!(
            auth.signup("  ", "secret", "Ada").await,
            Err(ApiError::InvalidInput { .. })
        );
        assert_matches!(
            auth.signup("ada@example.com", "", "Ada").await,
            Err(ApiError::InvalidInput { .. })
        );
    }

    #[tokio::test]
    async fn test_login_errors() {
        let auth = service().await;
        auth.signup("ada@example.com", "secret", "Ada").await.unwrap();

        assert_matches!(
            auth.login("nobody@example.com", "secret").await,
            Err(ApiError::NoSuchUser)
        );
        assert_matches!(
            auth.login("ada@example.com", "wrong").await,
            Err(ApiError::InvalidPassword)
        );

        let ok = auth.login("ada@example.com", "secret").await.unwrap();
        assert_eq!(ok.user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_current_user_fails_open() {
        let auth = service().await;
        assert!(auth.current_user(None).await.is_none());
        assert!(auth.current_user(Some("not-a-jwt")).await.is_none());

        // Valid signature, but the user does not exist.
        let orphan = auth.issue_token(999).unwrap();
        assert!(auth.current_user(Some(&orphan)).await.is_none());
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let auth = service().await;
        let result = auth.signup("ada@example.com", "secret", "Ada").await.unwrap();

        let other = AuthService::new(
            auth.db.clone(),
            AuthConfig {
                jwt_secret: "another-secret".to_string(),
                ..auth.config.clone()
            },
        );
        assert!(other.verify_token(&result.token).is_err());
        assert!(other.current_user(Some(&result.token)).await.is_none());
    }

    #[tokio::test]
    async fn test_hashing_does_not_stall_the_runtime() {
        let auth = service_with(3600, 12).await;

        // Single-threaded test runtime: the timer can only win if hashing
        // yields the worker while bcrypt runs.
        tokio::select! {
            biased;
            _ = auth.hash_password("secret") => panic!("hashing held the worker until done"),
            _ = tokio::time::sleep(std::time::Duration::from_millis(5)) => {}
        }
    }

    #[tokio::test]
    async fn test_out_of_range_lifetime_is_internal_error() {
        let auth = service_with_lifetime(i64::MAX).await;
        assert_matches!(auth.issue_token(1), Err(ApiError::Internal));

        let auth = service_with_lifetime(i64::MIN).await;
        assert_matches!(auth.issue_token(1), Err(ApiError::Internal));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let auth = service_with_lifetime(-60).await;
        let token = auth.issue_token(1).unwrap();
        assert!(auth.verify_token(&token).is_err());
    }
}
