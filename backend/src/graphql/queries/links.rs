use super::prelude::*;
use crate::graphql::filters::LinkOrderByInput;
use crate::graphql::pagination::parse_page_window;

#[derive(Default)]
pub struct LinkQueries;

#[Object]
impl LinkQueries {
    /// Page through links, optionally keeping only those whose description or
    /// url contains `filterNeedle` (case-insensitive)
    async fn feed(
        &self,
        ctx: &Context<'_>,
        filter_needle: Option<String>,
        skip: Option<i32>,
        take: Option<i32>,
        order_by: Option<LinkOrderByInput>,
    ) -> Result<Vec<Link>> {
        let db = ctx.data_unchecked::<Database>();
        let window = parse_page_window(skip, take).into_gql()?;

        let query = LinkFeedQuery {
            filter_needle,
            skip: window.skip,
            take: window.take,
            order: order_by.map(|o| o.to_order()).unwrap_or_default(),
        };

        let records = db.links().feed(&query).await.into_gql()?;
        Ok(records.into_iter().map(Link::from).collect())
    }

    /// Get a link by ID. Malformed IDs are treated as not found.
    async fn link(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Link>> {
        let Some(key) = parse_strict_integer(id.as_str()) else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();
        let record = db.links().get_by_id(key).await.into_gql()?;
        Ok(record.map(Link::from))
    }
}
