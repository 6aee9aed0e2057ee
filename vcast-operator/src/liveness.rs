//! Surface liveness tracker
//!
//! Classifies each rendering surface as Connected or Disconnected from the
//! heartbeat replies it sends. This is a pessimistic, sampling-based check:
//! a surface that replied and then crashed stays Connected until the next
//! missed window. Registrations are never destroyed, only re-created on the
//! next contact.

use crate::events::{EventBus, OperatorEvent};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Connectivity classification of one rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SurfaceStatus {
    Connected,
    Disconnected,
}

/// Status snapshot for the operator UI
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceInfo {
    pub surface_id: Uuid,
    pub status: SurfaceStatus,
}

#[derive(Debug)]
struct SurfaceRecord {
    last_reply: Instant,
    status: SurfaceStatus,
}

/// Registry of every surface that has ever contacted us
pub struct SurfaceRegistry {
    surfaces: RwLock<HashMap<Uuid, SurfaceRecord>>,
    timeout: Duration,
    events: EventBus,
}

impl SurfaceRegistry {
    pub fn new(timeout: Duration, events: EventBus) -> Self {
        Self {
            surfaces: RwLock::new(HashMap::new()),
            timeout,
            events,
        }
    }

    /// Record a Pong/Ready from a surface, marking it Connected.
    ///
    /// Returns the previous status, `None` for a first contact.
    pub async fn record_reply(&self, surface_id: Uuid) -> Option<SurfaceStatus> {
        let previous = {
            let mut surfaces = self.surfaces.write().await;
            let previous = surfaces.get(&surface_id).map(|r| r.status);
            surfaces.insert(
                surface_id,
                SurfaceRecord {
                    last_reply: Instant::now(),
                    status: SurfaceStatus::Connected,
                },
            );
            previous
        };
        if previous != Some(SurfaceStatus::Connected) {
            info!("Surface {} connected", surface_id);
            self.events.emit_lossy(OperatorEvent::SurfaceStatusChanged {
                surface_id,
                status: SurfaceStatus::Connected,
                timestamp: Utc::now(),
            });
        } else {
            debug!("Surface {} still connected", surface_id);
        }
        previous
    }

    /// Expire surfaces whose last reply is older than the timeout window
    pub async fn sweep(&self) {
        let now = Instant::now();
        let expired: Vec<Uuid> = {
            let mut surfaces = self.surfaces.write().await;
            surfaces
                .iter_mut()
                .filter(|(_, r)| {
                    r.status == SurfaceStatus::Connected
                        && now.duration_since(r.last_reply) > self.timeout
                })
                .map(|(id, r)| {
                    r.status = SurfaceStatus::Disconnected;
                    *id
                })
                .collect()
        };
        for surface_id in expired {
            info!("Surface {} disconnected (no heartbeat reply)", surface_id);
            self.events.emit_lossy(OperatorEvent::SurfaceStatusChanged {
                surface_id,
                status: SurfaceStatus::Disconnected,
                timestamp: Utc::now(),
            });
        }
    }

    /// Snapshot of every known surface, ordered by id for stable output
    pub async fn surfaces(&self) -> Vec<SurfaceInfo> {
        let mut infos: Vec<SurfaceInfo> = self
            .surfaces
            .read()
            .await
            .iter()
            .map(|(id, r)| SurfaceInfo {
                surface_id: *id,
                status: r.status,
            })
            .collect();
        infos.sort_by_key(|i| i.surface_id);
        infos
    }

    pub async fn connected_count(&self) -> usize {
        self.surfaces
            .read()
            .await
            .values()
            .filter(|r| r.status == SurfaceStatus::Connected)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (SurfaceRegistry, EventBus) {
        let events = EventBus::new(32);
        (
            SurfaceRegistry::new(Duration::from_secs(6), events.clone()),
            events,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn reply_connects_and_timeout_disconnects() {
        let (registry, _events) = registry();
        let id = Uuid::new_v4();

        registry.record_reply(id).await;
        assert_eq!(registry.connected_count().await, 1);

        // Within the window nothing expires.
        tokio::time::advance(Duration::from_secs(5)).await;
        registry.sweep().await;
        assert_eq!(registry.connected_count().await, 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        registry.sweep().await;
        assert_eq!(registry.connected_count().await, 0);
        let surfaces = registry.surfaces().await;
        assert_eq!(surfaces.len(), 1);
        assert_eq!(surfaces[0].status, SurfaceStatus::Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_restores_connected() {
        let (registry, events) = registry();
        let mut rx = events.subscribe();
        let id = Uuid::new_v4();

        registry.record_reply(id).await;
        tokio::time::advance(Duration::from_secs(10)).await;
        registry.sweep().await;
        let previous = registry.record_reply(id).await;
        assert_eq!(previous, Some(SurfaceStatus::Disconnected));
        assert_eq!(registry.connected_count().await, 1);

        // Connected, Disconnected, Connected again.
        let mut statuses = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let OperatorEvent::SurfaceStatusChanged { status, .. } = event {
                statuses.push(status);
            }
        }
        assert_eq!(
            statuses,
            vec![
                SurfaceStatus::Connected,
                SurfaceStatus::Disconnected,
                SurfaceStatus::Connected
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_replies_do_not_spam_status_events() {
        let (registry, events) = registry();
        let mut rx = events.subscribe();
        let id = Uuid::new_v4();

        registry.record_reply(id).await;
        tokio::time::advance(Duration::from_secs(2)).await;
        registry.record_reply(id).await;
        registry.sweep().await;

        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 1);
    }
}
