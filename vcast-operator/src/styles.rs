//! Style property store
//!
//! Current value of every display style property, kept so a (re)connecting
//! surface can be replayed the full set. Receivers apply last-write-wins
//! per property, so replay order does not matter; a BTreeMap keeps it
//! deterministic anyway.

use crate::events::{EventBus, OperatorEvent};
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use vcast_common::messages::StyleProperty;

pub struct StyleStore {
    values: RwLock<BTreeMap<StyleProperty, String>>,
    events: EventBus,
}

impl StyleStore {
    pub fn new(events: EventBus) -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            events,
        }
    }

    /// Set one property, overwriting any previous value
    pub async fn set(&self, property: StyleProperty, value: String) {
        self.values.write().await.insert(property, value.clone());
        self.events.emit_lossy(OperatorEvent::StyleChanged {
            property,
            value,
            timestamp: Utc::now(),
        });
    }

    pub async fn get(&self, property: StyleProperty) -> Option<String> {
        self.values.read().await.get(&property).cloned()
    }

    /// Every property that has been set, for resync replay
    pub async fn snapshot(&self) -> Vec<(StyleProperty, String)> {
        self.values
            .read()
            .await
            .iter()
            .map(|(p, v)| (*p, v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_write_wins_per_property() {
        let store = StyleStore::new(EventBus::new(16));
        store.set(StyleProperty::BackgroundColor, "#000000".into()).await;
        store.set(StyleProperty::TextColor, "#ffffff".into()).await;
        store.set(StyleProperty::BackgroundColor, "#0f172a".into()).await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            store.get(StyleProperty::BackgroundColor).await.as_deref(),
            Some("#0f172a")
        );
    }

    #[tokio::test]
    async fn unset_properties_are_absent_from_snapshots() {
        let store = StyleStore::new(EventBus::new(16));
        assert!(store.snapshot().await.is_empty());
        assert_eq!(store.get(StyleProperty::FontSize).await, None);
    }
}
