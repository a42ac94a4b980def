use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

use crate::geometry::Size;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerSettings {
    /// How long one segment stays on screen.
    pub segment_duration_ms: u64,
    pub tick_interval_ms: u64,
    /// Progress heartbeat cadence, in ticks.
    pub heartbeat_every_ticks: u32,
    /// Horizontal release displacement beyond which a drag counts as a swipe.
    pub swipe_threshold: f64,
    /// Movement under which a press-and-release still counts as a tap.
    pub tap_slop: f64,
    pub long_press_ms: u64,
    pub surface: Size,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            segment_duration_ms: 5000,
            tick_interval_ms: 50,
            heartbeat_every_ticks: 10,
            swipe_threshold: 50.0,
            tap_slop: 10.0,
            long_press_ms: 500,
            surface: Size::new(390.0, 844.0),
        }
    }
}

impl ViewerSettings {
    pub fn segment_duration(&self) -> Duration {
        Duration::from_millis(self.segment_duration_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.segment_duration_ms == 0 {
            bail!("segmentDurationMs must be greater than zero");
        }
        if self.tick_interval_ms == 0 {
            bail!("tickIntervalMs must be greater than zero");
        }
        if self.heartbeat_every_ticks == 0 {
            bail!("heartbeatEveryTicks must be greater than zero");
        }
        if self.swipe_threshold < 0.0 || self.tap_slop < 0.0 {
            bail!("gesture thresholds must not be negative");
        }
        if self.surface.width <= 0.0 || self.surface.height <= 0.0 {
            bail!("surface must have a positive size");
        }
        Ok(())
    }
}

/// JSON-file backed settings; a missing or invalid file falls back to defaults.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ViewerSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str::<ViewerSettings>(&contents) {
                Ok(settings) => match settings.validate() {
                    Ok(()) => settings,
                    Err(err) => {
                        log_warn!("ignoring settings in {}: {err}", path.display());
                        ViewerSettings::default()
                    }
                },
                Err(err) => {
                    log_warn!("unreadable settings in {}: {err}", path.display());
                    ViewerSettings::default()
                }
            }
        } else {
            ViewerSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> ViewerSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, settings: ViewerSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &ViewerSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
