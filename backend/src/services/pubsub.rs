//! In-process publish/subscribe for GraphQL subscriptions
//!
//! One broadcast channel per topic. Subscribers only see events published
//! after they subscribed; nothing is replayed or persisted. A subscriber that
//! falls more than `capacity` events behind skips the events it missed.

use futures::Stream;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use crate::db::{LinkRecord, VoteRecord};

pub const NEW_LINK_TOPIC: &str = "newLink";
pub const NEW_VOTE_TOPIC: &str = "newVote";

/// A named broadcast channel carrying payloads of type `T`
pub struct Topic<T> {
    name: &'static str,
    sender: broadcast::Sender<T>,
}

impl<T> Topic<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { name, sender }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Deliver `payload` to every live subscriber. Returns how many received it;
    /// publishing with nobody listening is not an error.
    pub fn publish(&self, payload: T) -> usize {
        match self.sender.send(payload) {
            Ok(receivers) => {
                tracing::debug!(topic = self.name, receivers, "Event published");
                receivers
            }
            Err(_) => {
                tracing::debug!(topic = self.name, "Event published with no subscribers");
                0
            }
        }
    }

    /// Live stream of events published from now on
    pub fn subscribe(&self) -> impl Stream<Item = T> + Send + Unpin + 'static {
        let name = self.name;
        BroadcastStream::new(self.sender.subscribe()).filter_map(move |result| match result {
            Ok(payload) => Some(payload),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(topic = name, skipped, "Subscriber lagged behind; events dropped");
                None
            }
        })
    }

    /// Number of subscribers currently attached
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Process-wide event register, built once at start-up and shared through the
/// GraphQL schema data.
pub struct PubSub {
    pub new_link: Topic<LinkRecord>,
    pub new_vote: Topic<VoteRecord>,
}

impl PubSub {
    pub fn new(capacity: usize) -> Self {
        Self {
            new_link: Topic::new(NEW_LINK_TOPIC, capacity),
            new_vote: Topic::new(NEW_VOTE_TOPIC, capacity),
        }
    }
}

impl Default for PubSub {
    fn default() -> Self {
        Self::new(256)
    }
}
