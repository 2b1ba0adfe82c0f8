use std::time::Duration;

use engine::timer::Delay;
use serde::{Deserialize, Serialize};

use crate::config::OverlaySettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayStage {
    /// Waiting for the show delay; input passes through.
    Pending,
    /// Visible and swallowing navigation until dismissed.
    Shown,
    /// Dismissed and fading out; no longer blocks input.
    Fading,
    Removed,
}

/// The "tap to open" card covering the slideshow at startup.
#[derive(Debug, Clone)]
pub struct OpeningOverlay {
    stage: OverlayStage,
    timer: Delay,
    fade: Duration,
}

impl OpeningOverlay {
    pub fn new(settings: OverlaySettings) -> Self {
        Self {
            stage: OverlayStage::Pending,
            timer: Delay::new(settings.show_delay),
            fade: settings.fade,
        }
    }

    pub fn stage(&self) -> OverlayStage {
        self.stage
    }

    pub fn blocks_input(&self) -> bool {
        self.stage == OverlayStage::Shown
    }

    /// Starts the fade-out. Dismissing while still pending cancels the show.
    /// Returns the new stage if anything changed.
    pub fn dismiss(&mut self) -> Option<OverlayStage> {
        if !matches!(self.stage, OverlayStage::Pending | OverlayStage::Shown) {
            return None;
        }
        tracing::info!("opening overlay dismissed");
        self.stage = OverlayStage::Fading;
        self.timer = Delay::new(self.fade);
        Some(self.stage)
    }

    pub fn advance(&mut self, dt: Duration) -> Option<OverlayStage> {
        let next = match self.stage {
            OverlayStage::Pending => OverlayStage::Shown,
            OverlayStage::Fading => OverlayStage::Removed,
            OverlayStage::Shown | OverlayStage::Removed => return None,
        };
        self.timer.tick(dt)?;
        self.stage = next;
        Some(next)
    }
}
