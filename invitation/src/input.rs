use serde::{Deserialize, Serialize};

use crate::config::SwipeThresholds;
use crate::scene::SceneIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
    Char(char),
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            " " | "Space" | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightboxPart {
    Backdrop,
    Content,
    Close,
    Prev,
    Next,
}

/// What a click landed on, resolved by the host from the event target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickTarget {
    /// Anywhere on the slideshow without its own handler.
    Scene,
    OpeningOverlay,
    /// One-based, as shown to the guest.
    ProgressDot(u8),
    PhoneLink,
    GalleryItem(usize),
    EventItem(usize),
    Lightbox(LightboxPart),
}

impl ClickTarget {
    /// Controls whose click is theirs alone and never advances the scene.
    ///
    /// Event items and the opening overlay react to a click too, but the same
    /// click still reaches the slideshow and advances it.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            ClickTarget::ProgressDot(_)
                | ClickTarget::PhoneLink
                | ClickTarget::GalleryItem(_)
                | ClickTarget::Lightbox(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawInput {
    Click { target: ClickTarget },
    Key { key: Key },
    TouchStart { x: f32, y: f32 },
    TouchEnd { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavIntent {
    Advance,
    Retreat,
    Restart,
    JumpTo(SceneIndex),
    None,
}

/// Conditions under which primary navigation input is swallowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputGate {
    pub overlay_active: bool,
    pub modal_open: bool,
}

impl InputGate {
    pub fn is_closed(self) -> bool {
        self.overlay_active || self.modal_open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    pub intent: NavIntent,
    /// The host should cancel the event's default action (page scroll on space).
    pub prevent_default: bool,
}

impl Normalized {
    const IGNORED: Normalized = Normalized {
        intent: NavIntent::None,
        prevent_default: false,
    };

    fn intent(intent: NavIntent) -> Self {
        Self {
            intent,
            prevent_default: false,
        }
    }

    fn key(intent: NavIntent) -> Self {
        Self {
            intent,
            prevent_default: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureSample {
    x: f32,
    y: f32,
}

/// Classifies a finished touch gesture by its displacement.
pub fn classify_swipe(dx: f32, dy: f32, thresholds: SwipeThresholds) -> NavIntent {
    if dy.abs() > thresholds.max_vertical_px {
        // Mostly vertical: the guest is scrolling.
        return NavIntent::None;
    }
    if dx < -thresholds.min_horizontal_px {
        NavIntent::Advance
    } else if dx > thresholds.min_horizontal_px {
        NavIntent::Retreat
    } else {
        NavIntent::None
    }
}

pub fn map_key_to_intent(key: Key) -> NavIntent {
    match key {
        Key::ArrowRight | Key::Space => NavIntent::Advance,
        Key::ArrowLeft => NavIntent::Retreat,
        Key::Char('r') | Key::Char('R') => NavIntent::Restart,
        _ => NavIntent::None,
    }
}

/// Turns raw device events into navigation intents.
///
/// The only state kept between events is the pending touch-start sample.
#[derive(Debug, Clone, Default)]
pub struct InputNormalizer {
    thresholds: SwipeThresholds,
    gesture: Option<GestureSample>,
}

impl InputNormalizer {
    pub fn new(thresholds: SwipeThresholds) -> Self {
        Self {
            thresholds,
            gesture: None,
        }
    }

    pub fn has_pending_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn normalize(&mut self, input: &RawInput, gate: InputGate) -> Normalized {
        match *input {
            RawInput::Click { target } => {
                if gate.is_closed() || target.is_interactive() {
                    return Normalized::IGNORED;
                }
                Normalized::intent(NavIntent::Advance)
            }
            RawInput::Key { key } => {
                if gate.is_closed() {
                    return Normalized::IGNORED;
                }
                match map_key_to_intent(key) {
                    NavIntent::None => Normalized::IGNORED,
                    intent => Normalized::key(intent),
                }
            }
            RawInput::TouchStart { x, y } => {
                self.gesture = Some(GestureSample { x, y });
                Normalized::IGNORED
            }
            RawInput::TouchEnd { x, y } => {
                let Some(start) = self.gesture.take() else {
                    return Normalized::IGNORED;
                };
                if gate.is_closed() {
                    return Normalized::IGNORED;
                }
                Normalized::intent(classify_swipe(x - start.x, y - start.y, self.thresholds))
            }
        }
    }
}
