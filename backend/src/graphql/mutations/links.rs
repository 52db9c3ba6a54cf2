use super::prelude::*;

#[derive(Default)]
pub struct LinkMutations;

#[Object]
impl LinkMutations {
    /// Post a new link as the current user and announce it on `newLink`
    async fn post_link(&self, ctx: &Context<'_>, url: String, description: String) -> Result<Link> {
        let user = ctx.current_user()?;
        let db = ctx.data_unchecked::<Database>();
        let pubsub = ctx.data_unchecked::<Arc<PubSub>>();

        let url = validate_url(&url)
            .ok_or(ApiError::InvalidUrl { url })
            .into_gql()?;

        let record = db
            .links()
            .create(CreateLink {
                url,
                description,
                posted_by_id: Some(user.id),
            })
            .await
            .into_gql()?;

        tracing::info!(link_id = record.id, user_id = user.id, "Link posted");
        pubsub.new_link.publish(record.clone());

        Ok(Link::from(record))
    }
}
