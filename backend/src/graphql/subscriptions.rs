//! GraphQL subscriptions for real-time updates
//!
//! Subscriptions allow clients to receive push updates over WebSocket. Each
//! subscriber only sees events published after it subscribed.

use std::sync::Arc;

use async_graphql::{Context, Subscription};
use futures::Stream;
use tokio_stream::StreamExt;

use crate::services::PubSub;

use super::types::{Link, Vote};

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Links posted from now on
    async fn new_link<'ctx>(&self, ctx: &Context<'ctx>) -> impl Stream<Item = Link> + 'ctx {
        let pubsub = ctx.data_unchecked::<Arc<PubSub>>();
        tracing::debug!("Client subscribed to newLink");
        pubsub.new_link.subscribe().map(Link::from)
    }

    /// Votes cast from now on
    async fn new_vote<'ctx>(&self, ctx: &Context<'ctx>) -> impl Stream<Item = Vote> + 'ctx {
        let pubsub = ctx.data_unchecked::<Arc<PubSub>>();
        tracing::debug!("Client subscribed to newVote");
        pubsub.new_vote.subscribe().map(Vote::from)
    }
}
