//! Scripted sessions: a timestamped list of collaborator inputs is played against a
//! viewer or composition session and every output is printed as a JSON line.

use std::{io::Write, path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tokio::time::{self, Instant};

use crate::{
    compose::{CapturedMedia, CompositionSession, SharePayload, TextColor, UploadCollaborator},
    events::{ViewerEvent, ViewerEventSink},
    geometry::Point,
    gesture::PointerEvent,
    settings::ViewerSettings,
    timeline::StorySegment,
    viewer::ViewerSession,
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayScript {
    #[serde(default)]
    pub settings: Option<ViewerSettings>,
    pub session: ScriptSession,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
    /// Extra time to let playback run after the last step.
    #[serde(default)]
    pub trailing_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScriptSession {
    Viewer {
        catalog: Vec<StorySegment>,
        author_id: String,
    },
    Compose {
        media: CapturedMedia,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStep {
    pub at_ms: u64,
    pub action: ScriptAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScriptAction {
    Pointer {
        event: PointerEvent,
    },
    MediaReady {
        segment_id: String,
    },
    MediaFailed {
        segment_id: String,
    },
    ToggleLike,
    Exit,
    AddText {
        content: String,
        #[serde(default)]
        color: TextColor,
        x: Option<f64>,
        y: Option<f64>,
    },
    AddSticker {
        glyph: String,
        x: Option<f64>,
        y: Option<f64>,
    },
    Share,
    ShareFinished {
        success: bool,
    },
}

fn position(x: Option<f64>, y: Option<f64>) -> Option<Point> {
    match (x, y) {
        (Some(x), Some(y)) => Some(Point::new(x, y)),
        _ => None,
    }
}

/// Writes events and share submissions to stdout, one JSON object per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesSink;

impl JsonLinesSink {
    fn write_line(&self, value: &serde_json::Value) {
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{value}") {
            log_error!("failed to write event line: {err}");
        }
    }
}

impl ViewerEventSink for JsonLinesSink {
    fn emit(&self, event: ViewerEvent) {
        match serde_json::to_value(&event) {
            Ok(value) => self.write_line(&value),
            Err(err) => log_error!("failed to serialize {} event: {err}", event.name()),
        }
    }
}

impl UploadCollaborator for JsonLinesSink {
    fn submit(&self, payload: SharePayload) {
        self.write_line(&json!({ "event": "share-submitted", "payload": payload }));
    }
}

pub fn load_script(path: &Path) -> Result<ReplayScript> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read replay script {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid replay script {}", path.display()))
}

pub async fn run_script(mut script: ReplayScript, fallback: ViewerSettings) -> Result<()> {
    let settings = script.settings.take().unwrap_or(fallback);
    settings.validate()?;
    script.steps.sort_by_key(|step| step.at_ms);

    match script.session {
        ScriptSession::Viewer { catalog, author_id } => {
            replay_viewer(&catalog, &author_id, &settings, &script.steps, script.trailing_ms)
                .await
        }
        ScriptSession::Compose { media } => {
            replay_compose(media, &settings, &script.steps);
            Ok(())
        }
    }
}

async fn replay_viewer(
    catalog: &[StorySegment],
    author_id: &str,
    settings: &ViewerSettings,
    steps: &[ScriptStep],
    trailing_ms: u64,
) -> Result<()> {
    let start = Instant::now();
    let viewer = ViewerSession::open(catalog, author_id, settings, Arc::new(JsonLinesSink)).await?;
    log_info!("replaying {} steps against viewer for {}", steps.len(), author_id);

    for step in steps {
        if let Some(deadline) = viewer.long_press_deadline().await {
            if deadline <= step.at_ms {
                time::sleep_until(start + Duration::from_millis(deadline)).await;
                viewer.poll_gestures(deadline).await?;
            }
        }
        time::sleep_until(start + Duration::from_millis(step.at_ms)).await;

        match &step.action {
            ScriptAction::Pointer { event } => {
                viewer.handle_pointer(*event).await?;
            }
            ScriptAction::MediaReady { segment_id } => {
                viewer.media_ready(segment_id).await?;
            }
            ScriptAction::MediaFailed { segment_id } => {
                viewer.media_failed(segment_id).await?;
            }
            ScriptAction::ToggleLike => {
                if let Err(err) = viewer.toggle_like().await {
                    log_warn!("like at {}ms ignored: {err}", step.at_ms);
                }
            }
            ScriptAction::Exit => {
                viewer.exit().await?;
            }
            other => log_warn!("{:?} has no meaning in a viewer session", other),
        }
    }

    time::sleep(Duration::from_millis(trailing_ms)).await;
    viewer.close().await?;
    Ok(())
}

fn replay_compose(media: CapturedMedia, settings: &ViewerSettings, steps: &[ScriptStep]) {
    let sink = JsonLinesSink;
    let mut session = CompositionSession::new(media, settings, Arc::new(sink));

    for step in steps {
        session.poll_gestures(step.at_ms);

        match &step.action {
            ScriptAction::Pointer { event } => {
                session.handle_pointer(*event);
            }
            ScriptAction::AddText {
                content,
                color,
                x,
                y,
            } => {
                if let Err(err) = session.add_text(content, *color, position(*x, *y)) {
                    log_warn!("text at {}ms ignored: {err}", step.at_ms);
                }
            }
            ScriptAction::AddSticker { glyph, x, y } => {
                session.add_sticker(glyph, position(*x, *y));
            }
            ScriptAction::Share => {
                if let Err(err) = session.share() {
                    log_warn!("share at {}ms ignored: {err}", step.at_ms);
                }
            }
            ScriptAction::ShareFinished { success } => session.share_finished(*success),
            ScriptAction::Exit => session.close(),
            other => log_warn!("{:?} has no meaning in a composition session", other),
        }
    }

    session.close();
    sink.write_line(&json!({
        "event": "composition-closed",
        "overlays": session.canvas().overlays(),
    }));
}
