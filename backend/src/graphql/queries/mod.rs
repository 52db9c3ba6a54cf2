pub mod comments;
pub mod links;
pub mod system;
pub mod user;

pub use comments::CommentQueries;
pub use links::LinkQueries;
pub use system::SystemQueries;
pub use user::UserQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ID, Object, Result};

    pub(crate) use crate::db::*;
    pub(crate) use crate::error::IntoGqlResult;
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::types::*;
}
