//! Operator event system
//!
//! One central enum of operator-facing events, broadcast via an EventBus
//! backed by `tokio::broadcast`. The SSE endpoint and the surface-channel
//! broadcaster are both plain subscribers; stores emit events and never
//! know who is listening.

use crate::liveness::SurfaceStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;
use vcast_common::messages::{ContentItem, StyleProperty};

/// Operator event types
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum OperatorEvent {
    /// The preview slot changed (staged or cleared)
    PreviewChanged {
        content: Option<ContentItem>,
        timestamp: DateTime<Utc>,
    },

    /// The live slot changed; the surface channel mirrors this outward
    LiveChanged {
        content: Option<ContentItem>,
        timestamp: DateTime<Utc>,
    },

    /// A style property changed
    StyleChanged {
        property: StyleProperty,
        value: String,
        timestamp: DateTime<Utc>,
    },

    /// A rendering surface was classified Connected or Disconnected
    SurfaceStatusChanged {
        surface_id: Uuid,
        status: SurfaceStatus,
        timestamp: DateTime<Utc>,
    },
}

impl OperatorEvent {
    /// Get event type as string for SSE event names and filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            OperatorEvent::PreviewChanged { .. } => "PreviewChanged",
            OperatorEvent::LiveChanged { .. } => "LiveChanged",
            OperatorEvent::StyleChanged { .. } => "StyleChanged",
            OperatorEvent::SurfaceStatusChanged { .. } => "SurfaceStatusChanged",
        }
    }
}

/// Central event distribution bus.
///
/// Non-blocking publish; slow subscribers lag and are told so, they never
/// block producers.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<OperatorEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<OperatorEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring the no-subscriber case
    pub fn emit_lossy(&self, event: OperatorEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_without_subscribers_does_not_panic() {
        let bus = EventBus::new(16);
        bus.emit_lossy(OperatorEvent::LiveChanged {
            content: None,
            timestamp: Utc::now(),
        });
    }

    #[tokio::test]
    async fn subscribers_receive_emitted_events() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        bus.emit_lossy(OperatorEvent::StyleChanged {
            property: StyleProperty::TextColor,
            value: "#ffffff".into(),
            timestamp: Utc::now(),
        });
        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type(), "StyleChanged");
    }
}
