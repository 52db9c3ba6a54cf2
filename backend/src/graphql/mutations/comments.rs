use super::prelude::*;

#[derive(Default)]
pub struct CommentMutations;

#[Object]
impl CommentMutations {
    /// Comment on an existing link
    async fn post_comment_on_link(
        &self,
        ctx: &Context<'_>,
        link_id: ID,
        body: String,
    ) -> Result<Comment> {
        let db = ctx.data_unchecked::<Database>();

        if body.trim().is_empty() {
            return Err(ApiError::BlankComment).into_gql();
        }
        let link_key = parse_id_arg("linkId", &link_id).into_gql()?;

        let record = db
            .comments()
            .create(CreateComment {
                link_id: link_key,
                body,
            })
            .await
            .map_err(|e| match e {
                StoreError::ForeignKeyViolation => ApiError::CommentOnMissingLink {
                    link_id: link_id.as_str().to_string(),
                },
                other => ApiError::from(other),
            })
            .into_gql()?;

        tracing::info!(comment_id = record.id, link_id = link_key, "Comment posted");
        Ok(Comment::from(record))
    }
}
