//! SSE stream of operator events

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};

use super::AppState;

/// GET /api/v1/events
///
/// Every operator event (staging changes, style changes, surface
/// connectivity) as a named SSE event with a JSON body.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!(
        "New SSE client connected, total subscribers: {}",
        state.events.subscriber_count() + 1
    );

    let rx = state.events.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => Event::default()
                .event(event.event_type())
                .json_data(&event)
                .ok()
                .map(Ok),
            Err(e) => {
                warn!("SSE client lagged: {:?}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}
