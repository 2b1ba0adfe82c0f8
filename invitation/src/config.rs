use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransitionTiming {
    /// How long the outgoing scene plays its exit animation.
    #[serde(rename = "exit_ms", with = "crate::serde_millis")]
    pub exit: Duration,
    /// Cooldown after the new scene is shown before input is accepted again.
    #[serde(rename = "settle_ms", with = "crate::serde_millis")]
    pub settle: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            exit: Duration::from_millis(1500),
            settle: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SwipeThresholds {
    pub min_horizontal_px: f32,
    pub max_vertical_px: f32,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            min_horizontal_px: 50.0,
            max_vertical_px: 100.0,
        }
    }
}

impl SwipeThresholds {
    fn sanitized(self) -> Self {
        let fix = |v: f32, fallback: f32| {
            if v.is_finite() && v >= 0.0 { v } else { fallback }
        };
        let defaults = Self::default();
        Self {
            min_horizontal_px: fix(self.min_horizontal_px, defaults.min_horizontal_px),
            max_vertical_px: fix(self.max_vertical_px, defaults.max_vertical_px),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverlaySettings {
    #[serde(rename = "show_delay_ms", with = "crate::serde_millis")]
    pub show_delay: Duration,
    #[serde(rename = "fade_ms", with = "crate::serde_millis")]
    pub fade: Duration,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            show_delay: Duration::from_millis(100),
            fade: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountdownSettings {
    /// Local wall-clock time, `YYYY-MM-DDTHH:MM:SS`.
    pub target: String,
    #[serde(rename = "tick_ms", with = "crate::serde_millis")]
    pub tick: Duration,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            target: "2026-04-21T18:00:00".to_string(),
            tick: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticleSettings {
    pub enabled: bool,
    #[serde(rename = "spawn_interval_ms", with = "crate::serde_millis")]
    pub spawn_interval: Duration,
    pub burst_count: u32,
    #[serde(rename = "burst_stagger_ms", with = "crate::serde_millis")]
    pub burst_stagger: Duration,
    /// Extra lifetime on top of the animation, covering its start delay.
    #[serde(rename = "linger_ms", with = "crate::serde_millis")]
    pub linger: Duration,
    pub seed: u64,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            spawn_interval: Duration::from_millis(4000),
            burst_count: 10,
            burst_stagger: Duration::from_millis(400),
            linger: Duration::from_millis(2000),
            seed: 0x2104_2026,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GallerySettings {
    pub captions: Vec<String>,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            captions: (1..=6).map(|n| format!("Photo {n}")).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrandingSettings {
    pub couple: String,
    pub date_label: String,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        Self {
            couple: "Anubhav & Nishi".to_string(),
            date_label: "21st April 2026".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresentationConfig {
    #[serde(default = "default_scene_count")]
    pub scene_count: u8,
    #[serde(default)]
    pub transition: TransitionTiming,
    #[serde(default)]
    pub swipe: SwipeThresholds,
    #[serde(default)]
    pub overlay: OverlaySettings,
    #[serde(default)]
    pub countdown: CountdownSettings,
    #[serde(default)]
    pub particles: ParticleSettings,
    #[serde(default)]
    pub gallery: GallerySettings,
    #[serde(default = "default_event_items")]
    pub event_items: usize,
    #[serde(
        default = "default_frame_interval",
        rename = "frame_interval_ms",
        with = "crate::serde_millis"
    )]
    pub frame_interval: Duration,
    #[serde(default)]
    pub branding: BrandingSettings,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            scene_count: default_scene_count(),
            transition: TransitionTiming::default(),
            swipe: SwipeThresholds::default(),
            overlay: OverlaySettings::default(),
            countdown: CountdownSettings::default(),
            particles: ParticleSettings::default(),
            gallery: GallerySettings::default(),
            event_items: default_event_items(),
            frame_interval: default_frame_interval(),
            branding: BrandingSettings::default(),
        }
    }
}

impl PresentationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_slice::<Self>(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded presentation config");
        Ok(config.sanitized())
    }

    pub fn sanitized(mut self) -> Self {
        if self.scene_count == 0 {
            tracing::warn!("scene_count of 0 raised to 1");
            self.scene_count = 1;
        }
        let swipe = self.swipe.sanitized();
        if swipe != self.swipe {
            tracing::warn!(?swipe, "invalid swipe thresholds replaced");
            self.swipe = swipe;
        }
        self.countdown.tick = self.countdown.tick.max(Duration::from_millis(1));
        self.particles.spawn_interval = self.particles.spawn_interval.max(Duration::from_millis(1));
        self.frame_interval = self.frame_interval.max(Duration::from_millis(1));
        self
    }
}

fn default_scene_count() -> u8 {
    13
}

fn default_event_items() -> usize {
    3
}

fn default_frame_interval() -> Duration {
    Duration::from_millis(16)
}
