use crate::event::LeagueEvent;
use async_trait::async_trait;
use dashmap::DashMap;
use futures_core::Stream;
use futures_util::StreamExt;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

pub type EventStream = Pin<Box<dyn Stream<Item = LeagueEvent> + Send + 'static>>;

const CHANNEL_CAPACITY: usize = 256;

#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publishes an event for `tournament_id`'s topic. A no-op if nobody is
    /// subscribed yet -- publishing never creates a topic.
    async fn publish(&self, tournament_id: &str, event: LeagueEvent);

    /// Subscribes to `tournament_id`'s topic, creating it if this is the
    /// first subscriber. Dropping the returned stream ends the
    /// subscription.
    async fn subscribe(&self, tournament_id: &str) -> EventStream;
}

/// One broadcast channel per tournament id, created lazily on first
/// subscribe. The core runs a single tournament per process, so in practice
/// this map holds at most one entry, but keying by topic keeps the seam
/// honest rather than special-casing a single global channel.
#[derive(Clone, Default)]
pub struct InMemoryEventBus {
    topics: Arc<DashMap<String, broadcast::Sender<LeagueEvent>>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        InMemoryEventBus::default()
    }

    fn ensure_topic(&self, tournament_id: &str) -> broadcast::Sender<LeagueEvent> {
        self.topics
            .entry(tournament_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, tournament_id: &str, event: LeagueEvent) {
        if let Some(tx) = self.topics.get(tournament_id) {
            // Best-effort fan-out: a lagging or absent subscriber never
            // blocks or fails the publisher.
            let _ = tx.send(event);
        }
    }

    async fn subscribe(&self, tournament_id: &str) -> EventStream {
        let tx = self.ensure_topic(tournament_id);
        let rx = tx.subscribe();
        let stream = BroadcastStream::new(rx).filter_map(|res| async move { res.ok() });
        Box::pin(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::LeagueEvent;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn publish_before_any_subscriber_is_a_silent_no_op() {
        let bus = InMemoryEventBus::new();
        bus.publish("T1", LeagueEvent::TournamentStarted { tournament_id: "T1".into(), total_rounds: 3 }).await;
    }

    #[tokio::test]
    async fn subscriber_receives_events_published_after_it_subscribes() {
        let bus = InMemoryEventBus::new();
        let mut stream = bus.subscribe("T1").await;
        bus.publish(
            "T1",
            LeagueEvent::TournamentStarted { tournament_id: "T1".into(), total_rounds: 3 },
        )
        .await;
        let received = stream.next().await.expect("event delivered");
        match received {
            LeagueEvent::TournamentStarted { tournament_id, total_rounds } => {
                assert_eq!(tournament_id, "T1");
                assert_eq!(total_rounds, 3);
            }
            _ => panic!("unexpected event variant"),
        }
    }

    #[tokio::test]
    async fn distinct_topics_do_not_cross_talk() {
        let bus = InMemoryEventBus::new();
        let mut stream_a = bus.subscribe("T1").await;
        let _stream_b = bus.subscribe("T2").await;
        let forfeits = vec![crate::event::DegradedMatch { match_id: "R1M1".to_string(), reason: "referee unreachable".to_string() }];
        bus.publish("T2", LeagueEvent::TournamentDegraded { forfeits }).await;

        tokio::time::timeout(std::time::Duration::from_millis(50), stream_a.next())
            .await
            .expect_err("T1 subscriber must not observe a T2 publish");
    }
}
