use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;

use crate::{
    events::ViewerEventSink,
    gesture::{BareSurface, GestureCommand, GestureConfig, GestureRouter, PointerEvent},
    playback::{PlaybackController, PlaybackSnapshot},
    settings::ViewerSettings,
    timeline::{SegmentTimeline, StorySegment},
};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// One author's stories being watched: timeline, playback and gesture routing.
pub struct ViewerSession {
    controller: PlaybackController,
    router: Mutex<GestureRouter>,
}

impl ViewerSession {
    /// Builds the timeline for `author_id` and starts playback.
    pub async fn open(
        catalog: &[StorySegment],
        author_id: &str,
        settings: &ViewerSettings,
        sink: Arc<dyn ViewerEventSink>,
    ) -> Result<Self> {
        let timeline = SegmentTimeline::from_catalog(catalog, author_id);
        let controller = PlaybackController::new(timeline, settings, sink);
        controller.start().await?;

        Ok(Self {
            controller,
            router: Mutex::new(GestureRouter::new(GestureConfig::from(settings))),
        })
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.controller.get_snapshot().await
    }

    pub async fn handle_pointer(&self, event: PointerEvent) -> Result<PlaybackSnapshot> {
        let commands = self.router.lock().await.handle(event, &BareSurface);
        self.dispatch(commands).await
    }

    /// Lets a held press turn into a long-press without waiting for more input.
    pub async fn poll_gestures(&self, now_ms: u64) -> Result<PlaybackSnapshot> {
        let commands = self.router.lock().await.poll(now_ms);
        self.dispatch(commands).await
    }

    pub async fn long_press_deadline(&self) -> Option<u64> {
        self.router.lock().await.long_press_deadline()
    }

    async fn dispatch(&self, commands: Vec<GestureCommand>) -> Result<PlaybackSnapshot> {
        for command in commands {
            match command {
                GestureCommand::Advance | GestureCommand::NextStory => {
                    self.controller.advance().await?;
                }
                GestureCommand::Retreat | GestureCommand::PreviousStory => {
                    self.controller.retreat().await?;
                }
                GestureCommand::Pause => {
                    self.controller.pause().await?;
                }
                GestureCommand::Resume => {
                    self.controller.resume().await?;
                }
                GestureCommand::BeginDrag { .. }
                | GestureCommand::UpdateDrag { .. }
                | GestureCommand::CommitDrag
                | GestureCommand::CancelDrag
                | GestureCommand::RemoveOverlay { .. } => {
                    // The viewer surface has no overlays to drag or remove.
                    log_warn!("overlay gesture {:?} ignored by viewer", command);
                }
            }
        }
        Ok(self.controller.get_snapshot().await)
    }

    pub async fn media_ready(&self, segment_id: &str) -> Result<PlaybackSnapshot> {
        self.controller.media_ready(segment_id).await
    }

    pub async fn media_failed(&self, segment_id: &str) -> Result<PlaybackSnapshot> {
        self.controller.media_failed(segment_id).await
    }

    pub async fn toggle_like(&self) -> Result<bool> {
        self.controller.toggle_like().await
    }

    pub async fn exit(&self) -> Result<PlaybackSnapshot> {
        self.controller.exit().await
    }

    pub async fn close(&self) -> Result<PlaybackSnapshot> {
        self.controller.close().await
    }
}
