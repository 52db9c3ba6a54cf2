use super::prelude::*;

#[derive(Default)]
pub struct CommentQueries;

#[Object]
impl CommentQueries {
    /// Get a comment by ID. Malformed IDs are treated as not found.
    async fn comment(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Comment>> {
        let Some(key) = parse_strict_integer(id.as_str()) else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();
        let record = db.comments().get_by_id(key).await.into_gql()?;
        Ok(record.map(Comment::from))
    }
}
