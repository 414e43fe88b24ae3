//! Server-Sent Events for rendered frames

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::scene::Frame;
use crate::AppState;

/// Create an SSE stream of rendered frames
pub fn create_frame_stream(
    app_state: Arc<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = app_state.subscribe_frames();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(frame) => frame_to_event(&frame).map(Ok),
        Err(_) => None, // Skip lagged frames
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Convert a frame to an SSE event
fn frame_to_event(frame: &Frame) -> Option<Event> {
    match serde_json::to_string(frame) {
        Ok(data) => Some(Event::default().event("frame").data(data)),
        Err(e) => {
            tracing::warn!("Failed to serialize frame {}: {}", frame.seq, e);
            None
        }
    }
}
