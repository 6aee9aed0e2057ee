//! Lookup history
//!
//! Ring of the most recent successful lookups, newest first. A lookup that
//! exactly repeats the most recent entry (same reference text, same
//! translation set) is not recorded again.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::RwLock;
use vcast_common::corpus::TranslationId;
use vcast_common::reference::VerseReference;

/// Maximum retained entries
pub const MAX_HISTORY: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Reference text as the operator typed it
    pub reference: String,
    pub references: Vec<VerseReference>,
    pub translations: Vec<TranslationId>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct LookupHistory {
    entries: RwLock<VecDeque<HistoryEntry>>,
}

impl LookupHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful lookup
    pub async fn record(
        &self,
        reference: &str,
        references: Vec<VerseReference>,
        translations: Vec<TranslationId>,
    ) {
        let mut entries = self.entries.write().await;
        if let Some(last) = entries.front() {
            let same_translations = last.translations.len() == translations.len()
                && last.translations.iter().all(|t| translations.contains(t));
            if last.reference == reference && same_translations {
                return;
            }
        }
        entries.push_front(HistoryEntry {
            reference: reference.to_string(),
            references,
            translations,
            recorded_at: Utc::now(),
        });
        entries.truncate(MAX_HISTORY);
    }

    /// Entries newest first
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.iter().cloned().collect()
    }
}
