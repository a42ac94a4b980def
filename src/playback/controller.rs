use std::{collections::HashSet, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    events::{ViewerEvent, ViewerEventSink},
    settings::ViewerSettings,
    timeline::SegmentTimeline,
};

use super::{PlaybackEffect, PlaybackMachine, PlaybackState, ProgressClock};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub segment_count: usize,
    pub remaining_ms: u64,
    pub progress_bars: Vec<f64>,
}

struct PlaybackCore {
    machine: PlaybackMachine,
    clock: ProgressClock,
    started: bool,
    liked: HashSet<String>,
}

impl PlaybackCore {
    fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.machine.state(),
            segment_count: self.machine.segment_count(),
            remaining_ms: self.machine.remaining().as_millis() as u64,
            progress_bars: self.machine.progress_bars(),
        }
    }

    /// Keeps the clock running exactly while the machine is playing.
    fn settle_clock(&mut self, effect: &PlaybackEffect, now: Instant) {
        match effect {
            PlaybackEffect::SegmentEntered { .. } | PlaybackEffect::Resumed { .. } => {
                self.clock.start(now)
            }
            PlaybackEffect::Paused { .. } | PlaybackEffect::Exited(_) => {
                self.clock.stop(now);
            }
        }
    }
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

/// Drives one viewer's playback: owns the state machine, runs the progress clock
/// task, and reports every transition to the event sink.
#[derive(Clone)]
pub struct PlaybackController {
    core: Arc<Mutex<PlaybackCore>>,
    timeline: Arc<SegmentTimeline>,
    sink: Arc<dyn ViewerEventSink>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    shutdown: CancellationToken,
    tick_interval: Duration,
    heartbeat_every_ticks: u32,
}

impl PlaybackController {
    pub fn new(
        timeline: SegmentTimeline,
        settings: &ViewerSettings,
        sink: Arc<dyn ViewerEventSink>,
    ) -> Self {
        let debug_mode = std::env::var("VIBES_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let machine = PlaybackMachine::new(timeline.len(), settings.segment_duration());

        Self {
            core: Arc::new(Mutex::new(PlaybackCore {
                machine,
                clock: ProgressClock::new(),
                started: false,
                liked: HashSet::new(),
            })),
            timeline: Arc::new(timeline),
            sink,
            ticker: Arc::new(Mutex::new(None)),
            shutdown: CancellationToken::new(),
            tick_interval: settings.tick_interval().max(Duration::from_millis(1)),
            heartbeat_every_ticks: if debug_mode {
                1
            } else {
                settings.heartbeat_every_ticks.max(1)
            },
        }
    }

    pub fn timeline(&self) -> &SegmentTimeline {
        &self.timeline
    }

    pub async fn get_state(&self) -> PlaybackState {
        self.core.lock().await.machine.state()
    }

    pub async fn get_snapshot(&self) -> PlaybackSnapshot {
        self.core.lock().await.snapshot()
    }

    /// Enters the first segment, or reports the not-found state for an empty
    /// timeline.
    pub async fn start(&self) -> Result<PlaybackSnapshot> {
        let snapshot = {
            let mut core = self.core.lock().await;
            if core.started {
                return Err(anyhow!("playback already started"));
            }
            core.started = true;

            if core.machine.state() == PlaybackState::NotFound {
                log_warn!("no segments for author {}", self.timeline.author_id());
                self.sink.emit(ViewerEvent::StoryNotFound {
                    author_id: self.timeline.author_id().to_string(),
                });
                self.sink.emit(ViewerEvent::PlaybackStateChanged {
                    snapshot: core.snapshot(),
                });
                return Ok(core.snapshot());
            }

            let effect = PlaybackEffect::SegmentEntered { index: 0 };
            core.settle_clock(&effect, Instant::now());
            emit_effect(self.sink.as_ref(), &self.timeline, &core, &effect);
            core.snapshot()
        };

        self.spawn_ticker().await;
        Ok(snapshot)
    }

    pub async fn advance(&self) -> Result<PlaybackSnapshot> {
        self.apply("advance", |core, _| core.machine.advance().into_iter().collect())
            .await
    }

    pub async fn retreat(&self) -> Result<PlaybackSnapshot> {
        self.apply("retreat", |core, _| core.machine.retreat().into_iter().collect())
            .await
    }

    /// Freezes progress. The clock is stopped and its task cancelled before this
    /// returns, so no tick can land on a paused segment.
    pub async fn pause(&self) -> Result<PlaybackSnapshot> {
        self.apply("pause", |core, now| {
            let pending = core.clock.lap(now);
            let mut effects: Vec<PlaybackEffect> = core.machine.tick(pending).into_iter().collect();
            effects.extend(core.machine.pause());
            effects
        })
        .await
    }

    pub async fn resume(&self) -> Result<PlaybackSnapshot> {
        self.apply("resume", |core, _| core.machine.resume().into_iter().collect())
            .await
    }

    /// Close button: leaves the viewer from any non-terminal state.
    pub async fn exit(&self) -> Result<PlaybackSnapshot> {
        self.apply("exit", |core, _| core.machine.exit().into_iter().collect())
            .await
    }

    pub async fn media_ready(&self, segment_id: &str) -> Result<PlaybackSnapshot> {
        let core = self.core.lock().await;
        let active = core
            .machine
            .state()
            .index()
            .and_then(|index| self.timeline.get(index));
        match active {
            Some(segment) if segment.id == segment_id => {
                log_info!("media ready for segment {}", segment_id);
            }
            _ => log_warn!("ignoring stale media-ready for segment {}", segment_id),
        }
        Ok(core.snapshot())
    }

    /// A segment whose media failed to load counts as fully shown.
    pub async fn media_failed(&self, segment_id: &str) -> Result<PlaybackSnapshot> {
        let Some(index) = self.timeline.position_of(segment_id) else {
            log_warn!("media failure for unknown segment {}", segment_id);
            return Ok(self.get_snapshot().await);
        };

        self.apply("media-failed", move |core, _| {
            let effect = core.machine.media_failed(index);
            if effect.is_none() {
                log_warn!("ignoring stale media failure for segment {}", index);
            }
            effect.into_iter().collect()
        })
        .await
    }

    /// Toggles the like on the active segment and returns the new value.
    pub async fn toggle_like(&self) -> Result<bool> {
        let mut core = self.core.lock().await;
        let segment = core
            .machine
            .state()
            .index()
            .and_then(|index| self.timeline.get(index))
            .ok_or_else(|| anyhow!("no active segment to like"))?;
        let segment_id = segment.id.clone();

        let liked = if core.liked.remove(&segment_id) {
            false
        } else {
            core.liked.insert(segment_id.clone());
            true
        };

        self.sink.emit(ViewerEvent::LikeToggled { segment_id, liked });
        Ok(liked)
    }

    /// Tears the viewer down: exits if still active and cancels the clock task.
    /// Later commands leave the state untouched.
    pub async fn close(&self) -> Result<PlaybackSnapshot> {
        let snapshot = {
            let mut core = self.core.lock().await;
            let now = Instant::now();
            if let Some(effect) = core.machine.exit() {
                core.settle_clock(&effect, now);
                emit_effect(self.sink.as_ref(), &self.timeline, &core, &effect);
            }
            core.snapshot()
        };

        self.shutdown.cancel();
        self.cancel_ticker().await;
        log_info!("viewer for {} closed", self.timeline.author_id());
        Ok(snapshot)
    }

    async fn apply<F>(&self, command: &str, op: F) -> Result<PlaybackSnapshot>
    where
        F: FnOnce(&mut PlaybackCore, Instant) -> Vec<PlaybackEffect>,
    {
        let snapshot = {
            let mut core = self.core.lock().await;
            if !core.started {
                return Err(anyhow!("{command} before playback started"));
            }
            if self.shutdown.is_cancelled() {
                return Ok(core.snapshot());
            }

            let now = Instant::now();
            let effects = op(&mut *core, now);
            if effects.is_empty() {
                log_info!("{} ignored in state {:?}", command, core.machine.state().status());
            }
            for effect in &effects {
                core.settle_clock(effect, now);
                emit_effect(self.sink.as_ref(), &self.timeline, &core, effect);
            }
            core.snapshot()
        };

        self.sync_ticker(&snapshot.state).await;
        Ok(snapshot)
    }

    async fn sync_ticker(&self, state: &PlaybackState) {
        if state.is_playing() {
            let running = self
                .ticker
                .lock()
                .await
                .as_ref()
                .map(|ticker| !ticker.handle.is_finished())
                .unwrap_or(false);
            if !running {
                self.spawn_ticker().await;
            }
        } else {
            self.cancel_ticker().await;
        }
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            previous.cancel.cancel();
            previous.handle.abort();
        }
        if self.shutdown.is_cancelled() {
            return;
        }

        let cancel = self.shutdown.child_token();
        let token = cancel.clone();
        let core = self.core.clone();
        let sink = self.sink.clone();
        let timeline = self.timeline.clone();
        let tick_interval = self.tick_interval;
        let heartbeat_every = self.heartbeat_every_ticks;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks: u32 = 0;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let mut guard = core.lock().await;
                if token.is_cancelled() || !guard.machine.state().is_playing() {
                    break;
                }

                let now = Instant::now();
                let elapsed = guard.clock.lap(now);
                ticks = ticks.wrapping_add(1);

                match guard.machine.tick(elapsed) {
                    Some(effect) => {
                        guard.settle_clock(&effect, now);
                        emit_effect(sink.as_ref(), &timeline, &guard, &effect);
                        if guard.machine.state().is_terminal() {
                            break;
                        }
                    }
                    None => {
                        if ticks % heartbeat_every == 0 {
                            emit_heartbeat(sink.as_ref(), &guard);
                        }
                    }
                }
            }
        });

        *ticker_guard = Some(Ticker { handle, cancel });
    }

    async fn cancel_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel.cancel();
            ticker.handle.abort();
        }
    }
}

fn emit_effect(
    sink: &dyn ViewerEventSink,
    timeline: &SegmentTimeline,
    core: &PlaybackCore,
    effect: &PlaybackEffect,
) {
    match *effect {
        PlaybackEffect::SegmentEntered { index } => {
            if let Some(segment) = timeline.get(index) {
                log_info!(
                    "entered segment {} ({}/{}, {})",
                    segment.id,
                    index + 1,
                    timeline.len(),
                    segment.media_kind.as_str()
                );
                sink.emit(ViewerEvent::SegmentChanged {
                    index,
                    total: timeline.len(),
                    segment: segment.clone(),
                    age_label: segment.age_label(Utc::now()),
                });
                if segment.is_video() {
                    sink.emit(ViewerEvent::StartMedia {
                        segment_id: segment.id.clone(),
                        media_ref: segment.media_ref.clone(),
                    });
                }
            }
        }
        PlaybackEffect::Paused { index, progress } => {
            log_info!("paused segment {} at {:.3}", index, progress);
        }
        PlaybackEffect::Resumed { index, progress } => {
            log_info!("resumed segment {} at {:.3}", index, progress);
        }
        PlaybackEffect::Exited(reason) => {
            log_info!("viewer exited: {:?}", reason);
            sink.emit(ViewerEvent::ViewerExited { reason });
        }
    }

    sink.emit(ViewerEvent::PlaybackStateChanged {
        snapshot: core.snapshot(),
    });
}

fn emit_heartbeat(sink: &dyn ViewerEventSink, core: &PlaybackCore) {
    let state = core.machine.state();
    if let Some(index) = state.index() {
        sink.emit(ViewerEvent::PlaybackHeartbeat {
            index,
            progress: state.progress(),
            remaining_ms: core.machine.remaining().as_millis() as u64,
        });
    }
}
