//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`ForumEvent`]s. It is
//! shared via `Arc<EventBus>` across the application; the notification
//! dispatcher is its main subscriber. Publishing never blocks the write
//! path that produced the event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use campus_core::types::DbId;

// ---------------------------------------------------------------------------
// ForumEvent
// ---------------------------------------------------------------------------

/// Event type name for a newly created post.
pub const EVENT_POST_CREATED: &str = "post.created";
/// Event type name for a topic detail read that should count a view.
pub const EVENT_TOPIC_VIEWED: &str = "topic.viewed";
/// Event type name for a newly added reaction.
pub const EVENT_REACTION_ADDED: &str = "reaction.added";
/// Event type name for a post being marked as the accepted solution.
pub const EVENT_SOLUTION_MARKED: &str = "solution.marked";
/// Event type name for a collaborative wiki content replacement.
pub const EVENT_WIKI_EDITED: &str = "wiki.edited";

/// A domain event emitted by a forum write.
///
/// Constructed via [`ForumEvent::new`] and enriched with the builder
/// methods [`with_topic`](ForumEvent::with_topic),
/// [`with_post`](ForumEvent::with_post),
/// [`with_actor`](ForumEvent::with_actor), and
/// [`with_payload`](ForumEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumEvent {
    /// Dot-separated event name, e.g. `"post.created"`.
    pub event_type: String,

    /// The topic the event concerns, if any.
    pub topic_id: Option<DbId>,

    /// The post the event concerns, if any.
    pub post_id: Option<DbId>,

    /// The user whose action produced the event.
    pub actor_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ForumEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            topic_id: None,
            post_id: None,
            actor_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the concerned topic.
    pub fn with_topic(mut self, topic_id: DbId) -> Self {
        self.topic_id = Some(topic_id);
        self
    }

    /// Attach the concerned post.
    pub fn with_post(mut self, post_id: DbId) -> Self {
        self.post_id = Some(post_id);
        self
    }

    /// Attach the acting user.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`ForumEvent`].
pub struct EventBus {
    sender: broadcast::Sender<ForumEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// a missed secondary effect must never fail the primary write.
    pub fn publish(&self, event: ForumEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ForumEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = ForumEvent::new(EVENT_POST_CREATED)
            .with_topic(42)
            .with_post(7)
            .with_actor(3)
            .with_payload(serde_json::json!({"content": "hello @alice"}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, EVENT_POST_CREATED);
        assert_eq!(received.topic_id, Some(42));
        assert_eq!(received.post_id, Some(7));
        assert_eq!(received.actor_id, Some(3));
        assert_eq!(received.payload["content"], "hello @alice");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ForumEvent::new(EVENT_TOPIC_VIEWED).with_topic(1));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event_type, EVENT_TOPIC_VIEWED);
        assert_eq!(e2.event_type, EVENT_TOPIC_VIEWED);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(ForumEvent::new(EVENT_WIKI_EDITED));
    }

    #[test]
    fn new_event_has_empty_optional_fields() {
        let event = ForumEvent::new(EVENT_SOLUTION_MARKED);
        assert!(event.topic_id.is_none());
        assert!(event.post_id.is_none());
        assert!(event.actor_id.is_none());
        assert!(event.payload.is_object());
    }
}
