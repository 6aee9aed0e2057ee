//! Broadcast sync tasks
//!
//! Three long-lived tasks keep the rendering surfaces in step with the
//! operator's stores:
//!
//! - the **store broadcaster** subscribes to operator events and mirrors
//!   live/style changes onto the surface channel,
//! - the **heartbeat** pings the group on a fixed interval and sweeps the
//!   liveness registry,
//! - the **reply listener** consumes `Pong`/`Ready` and replays the full
//!   current state to the group, since the replying surface may have just
//!   (re)loaded and missed everything.
//!
//! All sends are fire-and-forget; none of these tasks ever blocks an
//! operator-facing operation.

use crate::events::{EventBus, OperatorEvent};
use crate::liveness::SurfaceRegistry;
use crate::staging::StagingStore;
use crate::styles::StyleStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vcast_common::channel::SurfaceChannel;
use vcast_common::messages::SurfaceMessage;

/// Mirror live-content and style changes onto the surface channel
pub fn spawn_store_broadcaster(
    events: EventBus,
    channel: Arc<SurfaceChannel>,
) -> JoinHandle<()> {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(OperatorEvent::LiveChanged { content: Some(content), timestamp }) => {
                    channel
                        .send(&SurfaceMessage::ContentUpdate { content, timestamp })
                        .await;
                }
                Ok(OperatorEvent::LiveChanged { content: None, timestamp }) => {
                    channel.send(&SurfaceMessage::ClearContent { timestamp }).await;
                }
                Ok(OperatorEvent::StyleChanged { property, value, timestamp }) => {
                    channel
                        .send(&SurfaceMessage::StyleUpdate { property, value, timestamp })
                        .await;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    // A reconnecting surface will be resynced anyway.
                    warn!("Store broadcaster lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Ping the group every interval and expire silent surfaces
pub fn spawn_heartbeat(
    channel: Arc<SurfaceChannel>,
    registry: Arc<SurfaceRegistry>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            channel.send(&SurfaceMessage::Ping { timestamp: Utc::now() }).await;
            registry.sweep().await;
        }
    })
}

/// Consume surface replies: update liveness, then resync the group
pub fn spawn_reply_listener(
    channel: Arc<SurfaceChannel>,
    registry: Arc<SurfaceRegistry>,
    staging: Arc<StagingStore>,
    styles: Arc<StyleStore>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match channel.recv().await {
                Ok(SurfaceMessage::Pong { surface_id, .. })
                | Ok(SurfaceMessage::Ready { surface_id, .. }) => {
                    registry.record_reply(surface_id).await;
                    for message in resync_messages(&staging, &styles).await {
                        channel.send(&message).await;
                    }
                }
                // Our own broadcasts loop back on the multicast group.
                Ok(other) => debug!("Ignoring {} frame", other.message_type()),
                Err(e) => {
                    warn!("Surface channel receive failed: {}", e);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    })
}

/// Assemble the full-state replay: every style property with its latest
/// value, then the current live content (or an explicit clear)
pub async fn resync_messages(
    staging: &StagingStore,
    styles: &StyleStore,
) -> Vec<SurfaceMessage> {
    let timestamp = Utc::now();
    let mut messages: Vec<SurfaceMessage> = styles
        .snapshot()
        .await
        .into_iter()
        .map(|(property, value)| SurfaceMessage::StyleUpdate {
            property,
            value,
            timestamp,
        })
        .collect();
    messages.push(match staging.live().await {
        Some(content) => SurfaceMessage::ContentUpdate { content, timestamp },
        None => SurfaceMessage::ClearContent { timestamp },
    });
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcast_common::messages::{ContentItem, StyleProperty};

    #[tokio::test]
    async fn resync_replays_every_style_once_and_the_live_content() {
        let events = EventBus::new(64);
        let staging = StagingStore::new(events.clone());
        let styles = StyleStore::new(events.clone());

        styles.set(StyleProperty::BackgroundColor, "#000000".into()).await;
        styles.set(StyleProperty::FontSize, "2.5".into()).await;
        styles.set(StyleProperty::BackgroundColor, "#0f172a".into()).await;
        staging
            .stage(ContentItem::Note { title: None, body_html: "<p>hi</p>".into() })
            .await;
        staging.publish().await.unwrap();

        let messages = resync_messages(&staging, &styles).await;
        assert_eq!(messages.len(), 3);
        let styles_sent: Vec<_> = messages
            .iter()
            .filter_map(|m| match m {
                SurfaceMessage::StyleUpdate { property, value, .. } => {
                    Some((*property, value.as_str()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            styles_sent,
            vec![
                (StyleProperty::BackgroundColor, "#0f172a"),
                (StyleProperty::FontSize, "2.5"),
            ]
        );
        assert!(matches!(messages.last(), Some(SurfaceMessage::ContentUpdate { .. })));
    }

    #[tokio::test]
    async fn resync_with_nothing_live_sends_an_explicit_clear() {
        let events = EventBus::new(64);
        let staging = StagingStore::new(events.clone());
        let styles = StyleStore::new(events);

        let messages = resync_messages(&staging, &styles).await;
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], SurfaceMessage::ClearContent { .. }));
    }
}
