//! GraphQL authentication context
//!
//! The HTTP and WebSocket handlers resolve the bearer token once per request
//! and, when it names an existing user, attach [CurrentUser] to the request
//! data. Resolvers that need a user call [AuthExt::current_user].

use async_graphql::{Context, ErrorExtensions, Result};

use crate::db::UserRecord;
use crate::error::ApiError;

/// The authenticated user for the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

/// Extension trait to get authenticated user from GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or return an error if not authenticated
    fn current_user(&self) -> Result<&UserRecord>;

    /// Get the authenticated user if present
    fn try_current_user(&self) -> Option<&UserRecord>;
}

impl<'a> AuthExt for Context<'a> {
    fn current_user(&self) -> Result<&UserRecord> {
        self.try_current_user()
            .ok_or_else(|| ApiError::Unauthenticated.extend())
    }

    fn try_current_user(&self) -> Option<&UserRecord> {
        self.data_opt::<CurrentUser>().map(|user| &user.0)
    }
}
