//! Domain errors surfaced to GraphQL clients
//!
//! Every failure a resolver can report is an [ApiError]. Each variant carries a
//! stable `code` extension so clients can tell validation problems, missing
//! authentication, conflicts and referential failures apart without parsing
//! messages.

use async_graphql::ErrorExtensions;

use crate::db::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    #[error("'{name}' argument value '{value}' must be at least '{min}'.")]
    BelowMinimum { name: String, value: i64, min: i64 },

    #[error("'{name}' argument value '{value}' must be between '{min}' and '{max}'.")]
    OutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Cannot post link with invalid URL '{url}'.")]
    InvalidUrl { url: String },

    #[error("'{field}' must be a numeric id, got '{value}'.")]
    InvalidId { field: String, value: String },

    #[error("Cannot post comment with an empty body.")]
    BlankComment,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Cannot post comment on non-existing link with id '{link_id}'.")]
    CommentOnMissingLink { link_id: String },

    #[error("Cannot vote for non-existing link with id '{link_id}'.")]
    VoteOnMissingLink { link_id: String },

    #[error("Already voted for link '{link_id}'.")]
    AlreadyVoted { link_id: String },

    #[error("A user with email '{email}' already exists.")]
    EmailTaken { email: String },

    #[error("No such user found")]
    NoSuchUser,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Machine-readable code placed in the GraphQL error's `extensions.code`
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput { .. }
            | ApiError::BelowMinimum { .. }
            | ApiError::OutOfRange { .. }
            | ApiError::InvalidUrl { .. }
            | ApiError::InvalidId { .. }
            | ApiError::BlankComment => "BAD_USER_INPUT",
            ApiError::Unauthenticated | ApiError::NoSuchUser | ApiError::InvalidPassword => {
                "UNAUTHENTICATED"
            }
            ApiError::CommentOnMissingLink { .. } | ApiError::VoteOnMissingLink { .. } => {
                "NOT_FOUND"
            }
            ApiError::AlreadyVoted { .. } | ApiError::EmailTaken { .. } => "CONFLICT",
            ApiError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

/// Store failures that reach this conversion were not expected by the caller.
/// Constraint failures with a domain meaning are matched before converting.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Unexpected store failure");
        ApiError::Internal
    }
}

/// Convert domain results into GraphQL results, attaching the error code
pub trait IntoGqlResult<T> {
    fn into_gql(self) -> async_graphql::Result<T>;
}

impl<T, E> IntoGqlResult<T> for Result<T, E>
where
    E: Into<ApiError>,
{
    fn into_gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.into().extend())
    }
}
