//! Display state
//!
//! The projection a rendering surface keeps of the operator's broadcast:
//! the current content item plus the style property map. Updates are
//! idempotent replacements; style properties apply last-write-wins, so the
//! channel's lack of ordering between message kinds is harmless.

use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;
use vcast_common::messages::{ContentItem, StyleProperty, SurfaceMessage};

/// One rendering surface's view of the world
pub struct DisplayState {
    surface_id: Uuid,
    content: Option<ContentItem>,
    styles: BTreeMap<StyleProperty, String>,
}

impl DisplayState {
    pub fn new(surface_id: Uuid) -> Self {
        Self {
            surface_id,
            content: None,
            styles: BTreeMap::new(),
        }
    }

    pub fn surface_id(&self) -> Uuid {
        self.surface_id
    }

    pub fn content(&self) -> Option<&ContentItem> {
        self.content.as_ref()
    }

    pub fn style(&self, property: StyleProperty) -> Option<&str> {
        self.styles.get(&property).map(String::as_str)
    }

    /// Startup announcement, sent once when the surface comes up
    pub fn ready_message(&self) -> SurfaceMessage {
        SurfaceMessage::Ready {
            surface_id: self.surface_id,
            timestamp: Utc::now(),
        }
    }

    /// Apply one inbound message, returning the reply to send, if any.
    ///
    /// `Pong`/`Ready` frames from other surfaces (and our own loopback)
    /// carry nothing for us and are dropped.
    pub fn apply(&mut self, message: SurfaceMessage) -> Option<SurfaceMessage> {
        match message {
            SurfaceMessage::ContentUpdate { content, .. } => {
                info!("Displaying {}", describe(&content));
                self.content = Some(content);
                None
            }
            SurfaceMessage::ClearContent { .. } => {
                info!("Display cleared");
                self.content = None;
                None
            }
            SurfaceMessage::StyleUpdate { property, value, .. } => {
                debug!("Style {:?} = {}", property, value);
                self.styles.insert(property, value);
                None
            }
            SurfaceMessage::Ping { .. } => Some(SurfaceMessage::Pong {
                surface_id: self.surface_id,
                timestamp: Utc::now(),
            }),
            SurfaceMessage::Pong { .. } | SurfaceMessage::Ready { .. } => None,
        }
    }
}

fn describe(content: &ContentItem) -> String {
    match content {
        ContentItem::Verse { blocks, .. } => match blocks.first() {
            Some(block) => format!("{} ({} block(s))", block.label, blocks.len()),
            None => "empty passage".to_string(),
        },
        ContentItem::Video { video_id, .. } => format!("video {video_id}"),
        ContentItem::Note { title, .. } => {
            format!("note \"{}\"", title.as_deref().unwrap_or("untitled"))
        }
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

    fn update(content: ContentItem) -> SurfaceMessage {
        SurfaceMessage::ContentUpdate {
            content,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn content_updates_replace_idempotently() {
        let mut state = DisplayState::new(Uuid::new_v4());
        assert!(state.apply(update(note("a"))).is_none());
        assert!(state.apply(update(note("a"))).is_none());
        assert_eq!(state.content(), Some(&note("a")));

        state.apply(update(note("b")));
        assert_eq!(state.content(), Some(&note("b")));

        state.apply(SurfaceMessage::ClearContent { timestamp: Utc::now() });
        assert_eq!(state.content(), None);
    }

    #[test]
    fn styles_apply_last_write_wins_per_property() {
        let mut state = DisplayState::new(Uuid::new_v4());
        for value in ["#000000", "#0f172a"] {
            state.apply(SurfaceMessage::StyleUpdate {
                property: StyleProperty::BackgroundColor,
                value: value.into(),
                timestamp: Utc::now(),
            });
        }
        state.apply(SurfaceMessage::StyleUpdate {
            property: StyleProperty::FontSize,
            value: "2.5".into(),
            timestamp: Utc::now(),
        });
        assert_eq!(state.style(StyleProperty::BackgroundColor), Some("#0f172a"));
        assert_eq!(state.style(StyleProperty::FontSize), Some("2.5"));
        assert_eq!(state.style(StyleProperty::TextColor), None);
    }

    #[test]
    fn ping_is_answered_with_our_identity() {
        let id = Uuid::new_v4();
        let mut state = DisplayState::new(id);
        let reply = state.apply(SurfaceMessage::Ping { timestamp: Utc::now() });
        match reply {
            Some(SurfaceMessage::Pong { surface_id, .. }) => assert_eq!(surface_id, id),
            other => panic!("expected Pong, got {other:?}"),
        }
    }

    #[test]
    fn foreign_replies_are_ignored() {
        let mut state = DisplayState::new(Uuid::new_v4());
        assert!(state
            .apply(SurfaceMessage::Pong {
                surface_id: Uuid::new_v4(),
                timestamp: Utc::now()
            })
            .is_none());
        assert!(state
            .apply(SurfaceMessage::Ready {
                surface_id: Uuid::new_v4(),
                timestamp: Utc::now()
            })
            .is_none());
    }
}
