//! Content staging store
//!
//! Holds at most one preview (staged, not audience-visible) and one live
//! (currently broadcast) content item. This store is the single writer of
//! both slots; rendering surfaces only ever see read-only projections
//! delivered as messages.

use crate::events::{EventBus, OperatorEvent};
use crate::{Error, Result};
use chrono::Utc;
use tokio::sync::RwLock;
use vcast_common::messages::ContentItem;

#[derive(Debug, Default)]
struct Slots {
    preview: Option<ContentItem>,
    live: Option<ContentItem>,
}

/// The preview/live slot pair
pub struct StagingStore {
    slots: RwLock<Slots>,
    events: EventBus,
}

impl StagingStore {
    pub fn new(events: EventBus) -> Self {
        Self {
            slots: RwLock::new(Slots::default()),
            events,
        }
    }

    /// Stage a content item into the preview slot. Never touches live;
    /// always succeeds.
    pub async fn stage(&self, item: ContentItem) {
        self.slots.write().await.preview = Some(item.clone());
        self.events.emit_lossy(OperatorEvent::PreviewChanged {
            content: Some(item),
            timestamp: Utc::now(),
        });
    }

    /// Copy the preview into live.
    ///
    /// The swap happens under one write lock, so no reader can observe a
    /// half-updated live slot. The preview is kept, so re-publishing an
    /// unchanged preview is idempotent. Fails with `EmptyPreview` when
    /// nothing is staged, leaving live unchanged.
    pub async fn publish(&self) -> Result<ContentItem> {
        let item = {
            let mut slots = self.slots.write().await;
            let item = slots.preview.clone().ok_or(Error::EmptyPreview)?;
            slots.live = Some(item.clone());
            item
        };
        self.events.emit_lossy(OperatorEvent::LiveChanged {
            content: Some(item.clone()),
            timestamp: Utc::now(),
        });
        Ok(item)
    }

    /// Direct mode: put a content item straight live, bypassing preview.
    /// The preview slot is left untouched.
    pub async fn publish_direct(&self, item: ContentItem) {
        self.slots.write().await.live = Some(item.clone());
        self.events.emit_lossy(OperatorEvent::LiveChanged {
            content: Some(item),
            timestamp: Utc::now(),
        });
    }

    /// Empty both slots
    pub async fn clear(&self) {
        {
            let mut slots = self.slots.write().await;
            slots.preview = None;
            slots.live = None;
        }
        let now = Utc::now();
        self.events.emit_lossy(OperatorEvent::PreviewChanged {
            content: None,
            timestamp: now,
        });
        self.events.emit_lossy(OperatorEvent::LiveChanged {
            content: None,
            timestamp: now,
        });
    }

    pub async fn preview(&self) -> Option<ContentItem> {
        self.slots.read().await.preview.clone()
    }

    pub async fn live(&self) -> Option<ContentItem> {
        self.slots.read().await.live.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str) -> ContentItem {
        ContentItem::Note {
            title: None,
            body_html: text.to_string(),
        }
    }

    fn store() -> StagingStore {
        StagingStore::new(EventBus::new(16))
    }

    #[tokio::test]
    async fn publish_copies_preview_and_keeps_it() {
        let store = store();
        store.stage(note("a")).await;
        store.publish().await.unwrap();
        assert_eq!(store.live().await, Some(note("a")));
        assert_eq!(store.preview().await, Some(note("a")));
        // Repeated publish of the unchanged preview is a no-op in effect.
        store.publish().await.unwrap();
        assert_eq!(store.live().await, Some(note("a")));
    }

    #[tokio::test]
    async fn publish_with_empty_preview_fails_without_touching_live() {
        let store = store();
        store.stage(note("a")).await;
        store.publish().await.unwrap();
        store.clear().await;
        assert!(matches!(store.publish().await, Err(Error::EmptyPreview)));
        assert_eq!(store.live().await, None);
    }

    #[tokio::test]
    async fn stage_never_touches_live() {
        let store = store();
        store.stage(note("a")).await;
        store.publish().await.unwrap();
        store.stage(note("b")).await;
        assert_eq!(store.live().await, Some(note("a")));
        assert_eq!(store.preview().await, Some(note("b")));
    }

    #[tokio::test]
    async fn direct_mode_bypasses_preview() {
        let store = store();
        store.stage(note("staged")).await;
        store.publish_direct(note("direct")).await;
        assert_eq!(store.live().await, Some(note("direct")));
        assert_eq!(store.preview().await, Some(note("staged")));
    }

    #[tokio::test]
    async fn live_changes_are_announced() {
        let events = EventBus::new(16);
        let store = StagingStore::new(events.clone());
        let mut rx = events.subscribe();
        store.stage(note("a")).await;
        store.publish().await.unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.event_type(), "PreviewChanged");
        let second = rx.recv().await.unwrap();
        match second {
            OperatorEvent::LiveChanged { content, .. } => {
                assert_eq!(content, Some(note("a")))
            }
            other => panic!("unexpected event {}", other.event_type()),
        }
    }
}
