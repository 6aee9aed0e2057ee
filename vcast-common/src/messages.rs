//! Broadcast message vocabulary
//!
//! The closed set of messages carried on the surface channel between the
//! control surface and the rendering surfaces. Delivery is at-most-once and
//! unordered; every receiver matches exhaustively and treats content
//! replacement as idempotent.

use crate::corpus::TranslationId;
use crate::reference::VerseReference;
use crate::resolver::PassageBlock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resolved content item, the unit that flows through staging and
/// broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ContentItem {
    /// Scripture passage(s), already resolved into display blocks
    Verse {
        references: Vec<VerseReference>,
        translations: Vec<TranslationId>,
        blocks: Vec<PassageBlock>,
    },
    /// An embedded video, referenced by platform id
    Video { video_id: String, autoplay: bool },
    /// A note, body already rendered to HTML by the external renderer
    Note {
        title: Option<String>,
        body_html: String,
    },
}

/// Style properties a rendering surface applies last-write-wins
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum StyleProperty {
    BackgroundColor,
    TextColor,
    FontSize,
    BackgroundImage,
    BackgroundVideo,
    TextShadow,
    OverlayOpacity,
}

impl StyleProperty {
    /// Every property, in resync order
    pub const ALL: [StyleProperty; 7] = [
        StyleProperty::BackgroundColor,
        StyleProperty::TextColor,
        StyleProperty::FontSize,
        StyleProperty::BackgroundImage,
        StyleProperty::BackgroundVideo,
        StyleProperty::TextShadow,
        StyleProperty::OverlayOpacity,
    ];
}

/// Messages on the surface channel
///
/// `ContentUpdate`/`ClearContent`/`StyleUpdate`/`Ping` travel from the
/// control surface to rendering surfaces; `Pong`/`Ready` travel back. Every
/// process on the channel sees every message and ignores the directions it
/// does not consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurfaceMessage {
    /// Replace the displayed content
    ContentUpdate {
        content: ContentItem,
        timestamp: DateTime<Utc>,
    },

    /// Blank the display
    ClearContent { timestamp: DateTime<Utc> },

    /// Set one style property, last write wins per property
    StyleUpdate {
        property: StyleProperty,
        value: String,
        timestamp: DateTime<Utc>,
    },

    /// Liveness probe, broadcast to every surface that may exist
    Ping { timestamp: DateTime<Utc> },

    /// Reply to a Ping
    Pong {
        surface_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// Unsolicited startup announcement from a rendering surface
    Ready {
        surface_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl SurfaceMessage {
    /// Get message type as string for logging/filtering
    pub fn message_type(&self) -> &'static str {
        match self {
            SurfaceMessage::ContentUpdate { .. } => "ContentUpdate",
            SurfaceMessage::ClearContent { .. } => "ClearContent",
            SurfaceMessage::StyleUpdate { .. } => "StyleUpdate",
            SurfaceMessage::Ping { .. } => "Ping",
            SurfaceMessage::Pong { .. } => "Pong",
            SurfaceMessage::Ready { .. } => "Ready",
        }
    }
}
