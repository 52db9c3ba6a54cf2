//! Signup and login mutations. Neither requires an authenticated request.

use super::prelude::*;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Register a new account and receive a token for it
    async fn signup(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
        name: String,
    ) -> Result<AuthPayload> {
        let auth = ctx.data_unchecked::<Arc<AuthService>>();

        let result = auth.signup(&email, &password, &name).await.into_gql()?;

        Ok(AuthPayload {
            token: result.token,
            user: User::from(result.user),
        })
    }

    /// Exchange email and password for a token
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthPayload> {
        let auth = ctx.data_unchecked::<Arc<AuthService>>();

        let result = auth.login(&email, &password).await.into_gql()?;

        Ok(AuthPayload {
            token: result.token,
            user: User::from(result.user),
        })
    }
}
