//! Application configuration management

use std::env;
use std::net::{IpAddr, Ipv4Addr};

use anyhow::{Context, Result, bail};
use base64::Engine;

const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;

/// Ten years
const MAX_TOKEN_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP listener to
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// SQLite database URL (e.g. `sqlite:hackernews.db` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum pooled database connections
    pub database_max_connections: u32,

    /// Shared secret used to sign and verify bearer tokens
    pub jwt_secret: String,

    /// Token lifetime in seconds
    pub token_lifetime_secs: i64,

    /// Bcrypt cost factor
    pub bcrypt_cost: u32,

    /// Buffered events per subscription topic before slow subscribers lag
    pub pubsub_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret.trim().to_string(),
            _ => {
                tracing::warn!(
                    "JWT_SECRET not set; generated an ephemeral secret, tokens will not survive a restart"
                );
                generate_jwt_secret()
            }
        };

        Ok(Self {
            host: env::var("HOST")
                .ok()
                .map(|h| h.parse().context("Invalid HOST"))
                .transpose()?
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),

            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:hackernews.db".to_string()),

            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,

            jwt_secret,

            token_lifetime_secs: check_token_lifetime(parse_or(
                "TOKEN_LIFETIME_SECS",
                DEFAULT_TOKEN_LIFETIME_SECS,
            )?)?,

            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,

            pubsub_capacity: parse_or("PUBSUB_CAPACITY", 256)?,
        })
    }
}

/// Reject lifetimes that are not positive or would overflow the token expiry
fn check_token_lifetime(secs: i64) -> Result<i64> {
    if !(1..=MAX_TOKEN_LIFETIME_SECS).contains(&secs) {
        bail!(
            "Invalid TOKEN_LIFETIME_SECS: {} (must be between 1 and {})",
            secs,
            MAX_TOKEN_LIFETIME_SECS
        );
    }
    Ok(secs)
}

/// Parse an optional variable, falling back to `default` when it is unset
fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", name, value)),
        Err(_) => Ok(default),
    }
}

fn generate_jwt_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_secret_is_random() {
        let a = generate_jwt_secret();
        let b = generate_jwt_secret();
        assert_eq!(a.len(), 44);
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_or_default_when_unset() {
        let value: u32 = parse_or("HACKERNEWS_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_token_lifetime_range() {
        assert_eq!(check_token_lifetime(3600).unwrap(), 3600);
        assert_eq!(
            check_token_lifetime(MAX_TOKEN_LIFETIME_SECS).unwrap(),
            MAX_TOKEN_LIFETIME_SECS
        );
        assert!(check_token_lifetime(0).is_err());
        assert!(check_token_lifetime(-5).is_err());
        assert!(check_token_lifetime(i64::MAX).is_err());
    }
}
