use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use engine::Machine;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::PresentationConfig;
use crate::countdown::{Countdown, CountdownTicker};
use crate::expand::ExpandGroup;
use crate::input::{ClickTarget, InputGate, InputNormalizer, NavIntent, RawInput};
use crate::lightbox::{GalleryProvider, Lightbox, LightboxEffect};
use crate::overlay::{OpeningOverlay, OverlayStage};
use crate::particles::{ParticleEffect, ParticleSpawner};
use crate::scene::{SceneCount, SceneIndex};
use crate::sequencer::{Phase, SceneEffect, SceneSequencer};
use crate::view::ViewCommand;

pub type SharedGallery = Arc<dyn GalleryProvider + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationSnapshot {
    pub scene: SceneIndex,
    pub phase: Phase,
    pub overlay: OverlayStage,
    pub lightbox: Option<usize>,
    pub expanded_event: Option<usize>,
    pub live_particles: usize,
    pub countdown_running: bool,
    pub particles_spawning: bool,
}

/// The whole invitation: routes raw input to the scene sequencer or the
/// lightbox, and drives every timer from elapsed time.
pub struct Presentation {
    normalizer: InputNormalizer,
    sequencer: SceneSequencer,
    lightbox: Lightbox,
    overlay: OpeningOverlay,
    events: ExpandGroup,
    countdown: CountdownTicker,
    particles: ParticleSpawner,
    gallery: SharedGallery,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presentation")
            .field("sequencer", &self.sequencer)
            .field("lightbox", &self.lightbox)
            .field("overlay", &self.overlay.stage())
            .finish_non_exhaustive()
    }
}

impl Presentation {
    pub fn new(config: &PresentationConfig, gallery: SharedGallery, clock: Arc<dyn Clock>) -> Self {
        Self {
            normalizer: InputNormalizer::new(config.swipe),
            sequencer: SceneSequencer::new(
                SceneCount::at_least_one(config.scene_count),
                config.transition,
            ),
            lightbox: Lightbox::new(gallery.len()),
            overlay: OpeningOverlay::new(config.overlay),
            events: ExpandGroup::new(config.event_items),
            countdown: CountdownTicker::new(
                Countdown::parse_local(&config.countdown.target),
                config.countdown.tick,
            ),
            particles: ParticleSpawner::new(config.particles),
            gallery,
            clock,
        }
    }

    /// Gallery captions from the config, wall-clock time from the system.
    pub fn from_config(config: &PresentationConfig) -> Self {
        Self::new(
            config,
            Arc::new(config.gallery.captions.clone()),
            Arc::new(SystemClock),
        )
    }

    pub fn current_scene(&self) -> SceneIndex {
        self.sequencer.current()
    }

    pub fn sequencer(&self) -> &SceneSequencer {
        &self.sequencer
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn overlay_stage(&self) -> OverlayStage {
        self.overlay.stage()
    }

    pub fn expanded_event(&self) -> Option<usize> {
        self.events.expanded()
    }

    pub fn live_particles(&self) -> usize {
        self.particles.live_count()
    }

    pub fn gate(&self) -> InputGate {
        InputGate {
            overlay_active: self.overlay.blocks_input(),
            modal_open: self.lightbox.is_open(),
        }
    }

    pub fn stop_countdown(&mut self) {
        self.countdown.stop();
    }

    pub fn stop_particles(&mut self) {
        self.particles.stop();
    }

    /// Clicks reach the clicked control first and the slideshow after, so a
    /// control that changes the gate (dismissing the overlay) lets the same
    /// click through. Keys are seen by the slideshow before the lightbox.
    pub fn handle_input(&mut self, input: RawInput) -> Vec<ViewCommand> {
        let mut out = Vec::new();
        let normalized = match input {
            RawInput::Click { target } => {
                self.route_click(target, &mut out);
                self.normalizer.normalize(&input, self.gate())
            }
            RawInput::Key { key } => {
                let normalized = self.normalizer.normalize(&input, self.gate());
                if normalized.prevent_default {
                    out.push(ViewCommand::PreventDefault);
                }
                if let Some(effect) = self.lightbox.handle_key(key) {
                    out.push(self.lightbox_command(effect));
                }
                normalized
            }
            RawInput::TouchStart { .. } | RawInput::TouchEnd { .. } => {
                self.normalizer.normalize(&input, self.gate())
            }
        };

        self.navigate(normalized.intent, &mut out);
        out
    }

    /// Handlers owned by specific click targets. Whether the click also
    /// advances the scene is left to the normalizer.
    fn route_click(&mut self, target: ClickTarget, out: &mut Vec<ViewCommand>) {
        if target == ClickTarget::OpeningOverlay {
            if let Some(stage) = self.overlay.dismiss() {
                out.push(ViewCommand::Overlay { stage });
            }
            return;
        }
        if self.overlay.blocks_input() {
            return;
        }

        if self.lightbox.is_open() {
            if let ClickTarget::Lightbox(part) = target {
                if let Some(effect) = self.lightbox.handle_click(part) {
                    out.push(self.lightbox_command(effect));
                }
            }
            return;
        }

        match target {
            ClickTarget::GalleryItem(index) => {
                if let Some(effect) = self.lightbox.open(index) {
                    out.push(self.lightbox_command(effect));
                }
            }
            ClickTarget::ProgressDot(number) => match self.sequencer.count().index(number) {
                Some(scene) => self.navigate(NavIntent::JumpTo(scene), out),
                None => tracing::debug!(number, "progress dot outside scene range"),
            },
            ClickTarget::EventItem(item) => {
                out.extend(self.events.toggle(item).into_iter().map(ViewCommand::EventItem));
            }
            ClickTarget::Scene
            | ClickTarget::OpeningOverlay
            | ClickTarget::PhoneLink
            | ClickTarget::Lightbox(_) => {}
        }
    }

    fn navigate(&mut self, intent: NavIntent, out: &mut Vec<ViewCommand>) {
        if intent == NavIntent::None {
            return;
        }
        match self.sequencer.apply(intent) {
            Ok(effect) => out.push(scene_command(effect)),
            Err(rejection) => tracing::debug!(?intent, ?rejection, "navigation rejected"),
        }
    }

    pub fn advance_time(&mut self, dt: Duration) -> Vec<ViewCommand> {
        let mut out = Vec::new();
        if let Some(stage) = self.overlay.advance(dt) {
            out.push(ViewCommand::Overlay { stage });
        }
        out.extend(self.sequencer.advance(dt).into_iter().map(scene_command));
        if let Some(parts) = self.countdown.tick(dt, self.clock.as_ref()) {
            out.push(ViewCommand::Countdown(parts));
        }
        out.extend(self.particles.advance(dt).into_iter().map(particle_command));
        out
    }

    /// Initial render: settled first scene, a countdown reading, the first flowers.
    pub fn startup(&mut self) -> Vec<ViewCommand> {
        let mut out: Vec<ViewCommand> = self
            .sequencer
            .sync_effects()
            .into_iter()
            .map(scene_command)
            .collect();
        out.push(ViewCommand::Countdown(self.countdown.read(self.clock.as_ref())));
        out.extend(self.particles.start().into_iter().map(particle_command));
        out
    }

    pub fn snapshot(&self) -> PresentationSnapshot {
        PresentationSnapshot {
            scene: self.sequencer.current(),
            phase: self.sequencer.phase(),
            overlay: self.overlay.stage(),
            lightbox: self.lightbox.current(),
            expanded_event: self.events.expanded(),
            live_particles: self.particles.live_count(),
            countdown_running: self.countdown.is_running(),
            particles_spawning: self.particles.is_spawning(),
        }
    }

    fn lightbox_command(&self, effect: LightboxEffect) -> ViewCommand {
        match effect {
            LightboxEffect::Show { index } => ViewCommand::LightboxShow {
                index,
                caption: self.gallery.caption(index).unwrap_or_default().to_string(),
            },
            LightboxEffect::Closed => ViewCommand::LightboxClose,
        }
    }
}

fn scene_command(effect: SceneEffect) -> ViewCommand {
    match effect {
        SceneEffect::Visual { scene, visual } => ViewCommand::SceneVisual { scene, visual },
        SceneEffect::Indicator { scene, on } => ViewCommand::Indicator { scene, on },
    }
}

fn particle_command(effect: ParticleEffect) -> ViewCommand {
    match effect {
        ParticleEffect::Spawn(particle) => ViewCommand::SpawnParticle(particle),
        ParticleEffect::Remove { id } => ViewCommand::RemoveParticle { id },
    }
}

impl Machine for Presentation {
    type Input = RawInput;
    type Effect = ViewCommand;
    type Snapshot = PresentationSnapshot;

    fn start(&mut self) -> Vec<ViewCommand> {
        self.startup()
    }

    fn handle(&mut self, input: RawInput) -> Vec<ViewCommand> {
        self.handle_input(input)
    }

    fn advance(&mut self, dt: Duration) -> Vec<ViewCommand> {
        self.advance_time(dt)
    }

    fn snapshot(&self) -> PresentationSnapshot {
        Presentation::snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::expand::ExpandChange;
    use crate::input::{Key, LightboxPart};
    use crate::scene::SceneVisual;

    fn quiet_config() -> PresentationConfig {
        let mut config = PresentationConfig::default();
        config.particles.enabled = false;
        config
    }

    fn presentation() -> Presentation {
        let config = quiet_config();
        Presentation::new(
            &config,
            Arc::new(config.gallery.captions.clone()),
            Arc::new(ManualClock::new(0)),
        )
    }

    fn click(target: ClickTarget) -> RawInput {
        RawInput::Click { target }
    }

    fn key(key: Key) -> RawInput {
        RawInput::Key { key }
    }

    fn scene(number: u8) -> SceneIndex {
        SceneCount::at_least_one(13)
            .index(number)
            .expect("scene in range")
    }

    fn exiting(number: u8) -> ViewCommand {
        ViewCommand::SceneVisual {
            scene: scene(number),
            visual: SceneVisual::Exiting,
        }
    }

    fn settle(p: &mut Presentation) {
        p.advance_time(Duration::from_millis(1600));
    }

    /// Lets the overlay appear, dismisses it (which also moves to scene 2)
    /// and waits for everything to settle.
    fn opened() -> Presentation {
        let mut p = presentation();
        p.startup();
        p.advance_time(Duration::from_millis(100));
        p.handle_input(click(ClickTarget::OpeningOverlay));
        settle(&mut p);
        p
    }

    #[test]
    fn shown_overlay_blocks_navigation() {
        let mut p = presentation();
        p.startup();
        p.advance_time(Duration::from_millis(100));
        assert_eq!(p.overlay_stage(), OverlayStage::Shown);

        assert!(p.handle_input(key(Key::ArrowRight)).is_empty());
        assert!(p.handle_input(click(ClickTarget::Scene)).is_empty());
        assert!(p.handle_input(click(ClickTarget::GalleryItem(0))).is_empty());
        assert!(!p.sequencer().is_transitioning());
        assert!(!p.lightbox().is_open());
    }

    #[test]
    fn dismissing_click_also_advances() {
        let mut p = presentation();
        p.startup();
        p.advance_time(Duration::from_millis(100));

        let out = p.handle_input(click(ClickTarget::OpeningOverlay));
        assert_eq!(
            out,
            vec![
                ViewCommand::Overlay {
                    stage: OverlayStage::Fading
                },
                exiting(1),
            ]
        );
        settle(&mut p);
        assert_eq!(p.current_scene().get(), 2);
    }

    #[test]
    fn input_before_overlay_appears_passes_through() {
        let mut p = presentation();
        p.startup();
        assert_eq!(p.overlay_stage(), OverlayStage::Pending);

        let out = p.handle_input(key(Key::ArrowRight));
        assert_eq!(out, vec![ViewCommand::PreventDefault, exiting(1)]);

        // The overlay still shows on schedule and then blocks.
        p.advance_time(Duration::from_millis(100));
        assert_eq!(p.overlay_stage(), OverlayStage::Shown);
        settle(&mut p);
        assert_eq!(p.current_scene().get(), 2);
        assert!(p.handle_input(click(ClickTarget::Scene)).is_empty());
    }

    #[test]
    fn scene_click_advances_after_overlay() {
        let mut p = opened();
        let out = p.handle_input(click(ClickTarget::Scene));
        assert_eq!(out, vec![exiting(2)]);
        settle(&mut p);
        assert_eq!(p.current_scene().get(), 3);
    }

    #[test]
    fn space_requests_prevent_default_even_when_dropped() {
        let mut p = opened();
        p.handle_input(key(Key::Space));
        let out = p.handle_input(key(Key::Space));
        assert_eq!(out, vec![ViewCommand::PreventDefault]);
    }

    #[test]
    fn gallery_click_opens_lightbox_and_arrows_belong_to_it() {
        let mut p = opened();
        let out = p.handle_input(click(ClickTarget::GalleryItem(5)));
        assert_eq!(
            out,
            vec![ViewCommand::LightboxShow {
                index: 5,
                caption: "Photo 6".to_string()
            }]
        );

        let out = p.handle_input(key(Key::ArrowRight));
        assert_eq!(
            out,
            vec![ViewCommand::LightboxShow {
                index: 0,
                caption: "Photo 1".to_string()
            }]
        );
        assert!(!p.sequencer().is_transitioning());

        assert!(p.handle_input(click(ClickTarget::Scene)).is_empty());
        assert_eq!(
            p.handle_input(click(ClickTarget::Lightbox(LightboxPart::Backdrop))),
            vec![ViewCommand::LightboxClose]
        );
        assert!(!p.lightbox().is_open());
        assert!(!p.sequencer().is_transitioning());
    }

    #[test]
    fn escape_closes_lightbox_without_touching_scenes() {
        let mut p = opened();
        p.handle_input(click(ClickTarget::GalleryItem(0)));
        assert_eq!(p.handle_input(key(Key::Escape)), vec![ViewCommand::LightboxClose]);
        assert_eq!(p.current_scene().get(), 2);
        assert!(!p.sequencer().is_transitioning());
    }

    #[test]
    fn progress_dot_jumps() {
        let mut p = opened();
        p.handle_input(click(ClickTarget::ProgressDot(7)));
        settle(&mut p);
        assert_eq!(p.current_scene().get(), 7);

        assert!(p.handle_input(click(ClickTarget::ProgressDot(7))).is_empty());
        assert!(p.handle_input(click(ClickTarget::ProgressDot(40))).is_empty());
    }

    #[test]
    fn event_item_click_toggles_and_advances() {
        let mut p = opened();
        let out = p.handle_input(click(ClickTarget::EventItem(0)));
        assert_eq!(
            out,
            vec![
                ViewCommand::EventItem(ExpandChange {
                    item: 0,
                    expanded: true
                }),
                exiting(2),
            ]
        );
        settle(&mut p);
        assert_eq!(p.current_scene().get(), 3);

        let out = p.handle_input(click(ClickTarget::EventItem(1)));
        assert_eq!(out.len(), 3);
        assert_eq!(p.expanded_event(), Some(1));
    }

    #[test]
    fn event_item_still_toggles_during_a_transition() {
        let mut p = opened();
        p.handle_input(click(ClickTarget::Scene));
        let out = p.handle_input(click(ClickTarget::EventItem(2)));
        assert_eq!(
            out,
            vec![ViewCommand::EventItem(ExpandChange {
                item: 2,
                expanded: true
            })]
        );
        settle(&mut p);
        assert_eq!(p.current_scene().get(), 3);
    }

    #[test]
    fn phone_link_is_inert() {
        let mut p = opened();
        assert!(p.handle_input(click(ClickTarget::PhoneLink)).is_empty());
    }

    #[test]
    fn swipe_drives_the_sequencer() {
        let mut p = opened();
        p.handle_input(RawInput::TouchStart { x: 300.0, y: 400.0 });
        p.handle_input(RawInput::TouchEnd { x: 220.0, y: 410.0 });
        settle(&mut p);
        assert_eq!(p.current_scene().get(), 3);

        p.handle_input(RawInput::TouchStart { x: 100.0, y: 400.0 });
        p.handle_input(RawInput::TouchEnd { x: 190.0, y: 400.0 });
        settle(&mut p);
        assert_eq!(p.current_scene().get(), 2);
    }

    #[test]
    fn countdown_is_rendered_at_startup_and_each_tick() {
        let mut p = presentation();
        let start = p.startup();
        assert!(start.iter().any(|c| matches!(c, ViewCommand::Countdown(_))));
        let ticks = p
            .advance_time(Duration::from_millis(1000))
            .into_iter()
            .filter(|c| matches!(c, ViewCommand::Countdown(_)))
            .count();
        assert_eq!(ticks, 1);

        p.stop_countdown();
        assert!(p
            .advance_time(Duration::from_secs(3))
            .iter()
            .all(|c| !matches!(c, ViewCommand::Countdown(_))));
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut p = opened();
        p.handle_input(click(ClickTarget::GalleryItem(2)));
        let snap = p.snapshot();
        assert_eq!(snap.scene.get(), 2);
        assert_eq!(snap.lightbox, Some(2));
        assert_eq!(snap.overlay, OverlayStage::Removed);
        assert_eq!(snap.phase, Phase::Idle);
        assert!(!snap.particles_spawning);
    }
}
