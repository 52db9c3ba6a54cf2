use super::prelude::*;

#[derive(Default)]
pub struct VoteMutations;

#[Object]
impl VoteMutations {
    /// Vote for a link as the current user and announce it on `newVote`.
    /// Each user may vote for a given link once.
    async fn vote(&self, ctx: &Context<'_>, link_id: ID) -> Result<Vote> {
        let user = ctx.current_user()?;
        let db = ctx.data_unchecked::<Database>();
        let pubsub = ctx.data_unchecked::<Arc<PubSub>>();

        let link_key = parse_id_arg("linkId", &link_id).into_gql()?;
        let already_voted = || ApiError::AlreadyVoted {
            link_id: link_id.as_str().to_string(),
        };

        if db.votes().find(link_key, user.id).await.into_gql()?.is_some() {
            return Err(already_voted()).into_gql();
        }

        // The precheck can lose a race with a concurrent vote; the unique
        // index on (link_id, user_id) settles it.
        let record = db
            .votes()
            .create(link_key, user.id)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation => already_voted(),
                StoreError::ForeignKeyViolation => ApiError::VoteOnMissingLink {
                    link_id: link_id.as_str().to_string(),
                },
                other => ApiError::from(other),
            })
            .into_gql()?;

        tracing::info!(vote_id = record.id, link_id = link_key, user_id = user.id, "Vote cast");
        pubsub.new_vote.publish(record.clone());

        Ok(Vote::from(record))
    }
}
