use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::geometry::Point;
use crate::gesture::{GestureCommand, GestureConfig, GestureRouter, PointerEvent};
use crate::settings::ViewerSettings;
use crate::timeline::MediaKind;

use super::{
    canvas::OverlayCanvas,
    error::{CanvasError, ShareError},
    overlay::{Overlay, OverlayId, TextColor},
};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Media handed over by the capture or picker collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapturedMedia {
    pub uri: String,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub media: CapturedMedia,
    pub overlays: Vec<Overlay>,
}

/// The upload collaborator. Submission is fire-and-forget; the outcome comes back
/// through [`CompositionSession::share_finished`].
pub trait UploadCollaborator: Send + Sync {
    fn submit(&self, payload: SharePayload);
}

impl UploadCollaborator for UnboundedSender<SharePayload> {
    fn submit(&self, payload: SharePayload) {
        let _ = self.send(payload);
    }
}

/// Annotating one captured media item before sharing it.
pub struct CompositionSession {
    media: CapturedMedia,
    canvas: OverlayCanvas,
    router: GestureRouter,
    uploader: Arc<dyn UploadCollaborator>,
    sharing: bool,
    closed: bool,
}

impl CompositionSession {
    pub fn new(
        media: CapturedMedia,
        settings: &ViewerSettings,
        uploader: Arc<dyn UploadCollaborator>,
    ) -> Self {
        log_info!("composition started for {} {}", media.kind.as_str(), media.uri);
        Self {
            media,
            canvas: OverlayCanvas::new(settings.surface),
            router: GestureRouter::new(GestureConfig::from(settings)),
            uploader,
            sharing: false,
            closed: false,
        }
    }

    pub fn media(&self) -> &CapturedMedia {
        &self.media
    }

    pub fn canvas(&self) -> &OverlayCanvas {
        &self.canvas
    }

    pub fn is_sharing(&self) -> bool {
        self.sharing
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn add_text(
        &mut self,
        content: &str,
        color: TextColor,
        position: Option<Point>,
    ) -> Result<OverlayId, CanvasError> {
        self.canvas.add_text(content, color, position)
    }

    pub fn add_sticker(&mut self, glyph: &str, position: Option<Point>) -> OverlayId {
        self.canvas.add_sticker(glyph, position)
    }

    pub fn remove_overlay(&mut self, id: OverlayId) -> bool {
        self.canvas.remove_overlay(id)
    }

    /// Routes a pointer event against the canvas. Background gestures have no
    /// playback to drive here and are dropped.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<GestureCommand> {
        if self.closed {
            return Vec::new();
        }
        let commands = self.router.handle(event, &self.canvas);
        self.apply(&commands);
        commands
    }

    pub fn poll_gestures(&mut self, now_ms: u64) -> Vec<GestureCommand> {
        if self.closed {
            return Vec::new();
        }
        let commands = self.router.poll(now_ms);
        self.apply(&commands);
        commands
    }

    fn apply(&mut self, commands: &[GestureCommand]) {
        for command in commands {
            let result = match *command {
                GestureCommand::BeginDrag {
                    overlay_id,
                    pointer,
                } => self.canvas.begin_drag(overlay_id, pointer),
                GestureCommand::UpdateDrag { pointer } => {
                    self.canvas.update_drag(pointer).map(|_| ())
                }
                GestureCommand::CommitDrag => self.canvas.commit_drag().map(|_| ()),
                GestureCommand::CancelDrag => self.canvas.cancel_drag().map(|_| ()),
                GestureCommand::RemoveOverlay { overlay_id } => {
                    self.canvas.remove_overlay(overlay_id);
                    Ok(())
                }
                _ => Ok(()),
            };

            // Drag commands arriving after the overlay vanished are expected; keep going.
            if let Err(err) = result {
                log_warn!("gesture {:?} ignored: {err}", command);
            }
        }
    }

    /// Hands the media and final overlay list to the upload collaborator. An open
    /// drag is dropped without committing.
    pub fn share(&mut self) -> Result<SharePayload, ShareError> {
        if self.closed {
            return Err(ShareError::Closed);
        }
        if self.sharing {
            return Err(ShareError::AlreadySharing);
        }

        let _ = self.canvas.cancel_drag();
        let payload = SharePayload {
            media: self.media.clone(),
            overlays: self.canvas.overlays().to_vec(),
        };

        self.sharing = true;
        log_info!(
            "sharing {} with {} overlays",
            payload.media.uri,
            payload.overlays.len()
        );
        self.uploader.submit(payload.clone());
        Ok(payload)
    }

    /// Upload outcome reported by the collaborator; sharing is possible again.
    pub fn share_finished(&mut self, success: bool) {
        if !self.sharing {
            return;
        }
        self.sharing = false;
        if success {
            log_info!("share of {} completed", self.media.uri);
        } else {
            log_warn!("share of {} failed", self.media.uri);
        }
    }

    /// Leaves the composition; any open drag is dropped without committing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        let _ = self.canvas.cancel_drag();
        self.closed = true;
        log_info!("composition for {} closed", self.media.uri);
    }
}
