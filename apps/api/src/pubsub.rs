//! In-process pub/sub for event notifications
//!
//! Mutations publish a [`Notification`] after they succeed; GraphQL
//! subscriptions receive them through a broadcast channel. Delivery is
//! fire-and-forget: publishing with no subscribers is not an error, and
//! subscribers that fall behind skip the notifications they missed.

use futures_util::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::models::Event;

/// Channel capacity for the broadcast channel
const BROADCAST_CAPACITY: usize = 256;

/// Domain notifications published after successful mutations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    EventCreated(Event),
    EventUpdated(Event),
    EventDeleted(Uuid),
    AttendanceChanged {
        event: Event,
        user_id: Uuid,
        attending: bool,
    },
}

impl Notification {
    /// Id of the event this notification concerns
    pub fn event_id(&self) -> Uuid {
        match self {
            Self::EventCreated(event) | Self::EventUpdated(event) => event.id,
            Self::EventDeleted(id) => *id,
            Self::AttendanceChanged { event, .. } => event.id,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::EventCreated(_) => "event_created",
            Self::EventUpdated(_) => "event_updated",
            Self::EventDeleted(_) => "event_deleted",
            Self::AttendanceChanged { .. } => "attendance_changed",
        }
    }
}

/// Cloneable handle to the notification channel
#[derive(Clone)]
pub struct EventPubSub {
    sender: broadcast::Sender<Notification>,
}

impl Default for EventPubSub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPubSub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { sender }
    }

    /// Publish a notification to every current subscriber
    pub fn publish(&self, notification: Notification) {
        let kind = notification.kind();
        let event_id = notification.event_id();
        // Ignore send errors (no receivers)
        let delivered = self.sender.send(notification).unwrap_or(0);
        tracing::debug!(kind, %event_id, delivered, "Published notification");
    }

    /// Raw receiver for notifications published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Stream of notifications from now on, skipping any that lagged out
    pub fn stream(&self) -> impl Stream<Item = Notification> + Send + 'static {
        BroadcastStream::new(self.subscribe()).filter_map(|item| async move {
            match item {
                Ok(notification) => Some(notification),
                Err(e) => {
                    tracing::warn!(error = %e, "Subscriber lagged behind notifications");
                    None
                }
            }
        })
    }

    /// Number of live subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
