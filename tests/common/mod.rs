#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use vibes_lib::events::{ViewerEvent, ViewerEventSink};
use vibes_lib::timeline::{MediaKind, StorySegment};

pub fn segment(id: &str, author: &str, kind: MediaKind) -> StorySegment {
    StorySegment {
        id: id.to_string(),
        author_id: author.to_string(),
        media_ref: format!("https://cdn.example/{id}"),
        media_kind: kind,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
    }
}

/// `[S0, S1, S2]` for "ana", with another author's segment interleaved.
pub fn catalog() -> Vec<StorySegment> {
    vec![
        segment("S0", "ana", MediaKind::Photo),
        segment("B0", "ben", MediaKind::Photo),
        segment("S1", "ana", MediaKind::Video),
        segment("S2", "ana", MediaKind::Photo),
    ]
}

pub fn event_channel() -> (Arc<dyn ViewerEventSink>, UnboundedReceiver<ViewerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(tx), rx)
}

pub fn drain(rx: &mut UnboundedReceiver<ViewerEvent>) -> Vec<ViewerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn names(events: &[ViewerEvent]) -> Vec<&'static str> {
    events.iter().map(ViewerEvent::name).collect()
}
