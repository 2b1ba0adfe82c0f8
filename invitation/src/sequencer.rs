use std::time::Duration;

use engine::timer::Delay;
use serde::{Deserialize, Serialize};

use crate::config::TransitionTiming;
use crate::cursor::{self, EdgePolicy};
use crate::input::NavIntent;
use crate::scene::{SceneCount, SceneIndex, SceneVisual};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    /// The outgoing scene is animating out; `current` still points at `from`.
    Exiting { from: SceneIndex, to: SceneIndex },
    /// The new scene is shown; input stays locked until the settle delay ends.
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneEffect {
    Visual { scene: SceneIndex, visual: SceneVisual },
    Indicator { scene: SceneIndex, on: bool },
}

/// Why an intent did not start a transition. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    Locked,
    AtFirstScene,
    AtLastScene,
    AlreadyThere,
    OutOfRange,
    NoIntent,
}

/// Owns the current scene and the transition lock.
///
/// A transition runs in two timed phases (exit, then settle) driven by
/// [`SceneSequencer::advance`]. Intents that arrive while either phase is
/// running are rejected, never queued.
#[derive(Debug, Clone)]
pub struct SceneSequencer {
    count: SceneCount,
    current: SceneIndex,
    phase: Phase,
    timer: Delay,
    timing: TransitionTiming,
}

impl SceneSequencer {
    pub fn new(count: SceneCount, timing: TransitionTiming) -> Self {
        Self {
            count,
            current: SceneIndex::FIRST,
            phase: Phase::Idle,
            timer: Delay::new(Duration::ZERO),
            timing,
        }
    }

    pub fn count(&self) -> SceneCount {
        self.count
    }

    pub fn current(&self) -> SceneIndex {
        self.current
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Full visual state for the settled current scene, used at startup.
    pub fn sync_effects(&self) -> Vec<SceneEffect> {
        let mut out: Vec<SceneEffect> = self
            .count
            .iter()
            .map(|scene| SceneEffect::Visual {
                scene,
                visual: if scene == self.current {
                    SceneVisual::Active
                } else {
                    SceneVisual::Inactive
                },
            })
            .collect();
        out.extend(self.indicator_effects());
        out
    }

    /// One indicator per scene; only the current one is on.
    pub fn indicators(&self) -> impl Iterator<Item = (SceneIndex, bool)> + '_ {
        self.count.iter().map(move |scene| (scene, scene == self.current))
    }

    fn indicator_effects(&self) -> impl Iterator<Item = SceneEffect> + '_ {
        self.indicators()
            .map(|(scene, on)| SceneEffect::Indicator { scene, on })
    }

    /// Resolves `intent` to a target scene and starts the transition.
    ///
    /// On success the returned effect marks the outgoing scene as exiting.
    pub fn apply(&mut self, intent: NavIntent) -> Result<SceneEffect, Rejection> {
        if self.is_transitioning() {
            tracing::debug!(?intent, "navigation dropped: transition in flight");
            return Err(Rejection::Locked);
        }
        let target = self.target_for(intent)?;
        Ok(self.begin(target))
    }

    fn target_for(&self, intent: NavIntent) -> Result<SceneIndex, Rejection> {
        let step = |delta: isize, edge: Rejection| {
            cursor::step(self.current.slot(), self.count.len(), delta, EdgePolicy::Clamp)
                .and_then(|slot| self.count.from_slot(slot))
                .ok_or(edge)
        };
        match intent {
            NavIntent::Advance => step(1, Rejection::AtLastScene),
            NavIntent::Retreat => step(-1, Rejection::AtFirstScene),
            NavIntent::Restart => self.jump_target(SceneIndex::FIRST),
            NavIntent::JumpTo(target) => self.jump_target(target),
            NavIntent::None => Err(Rejection::NoIntent),
        }
    }

    fn jump_target(&self, target: SceneIndex) -> Result<SceneIndex, Rejection> {
        if !self.count.contains(target) {
            return Err(Rejection::OutOfRange);
        }
        if target == self.current {
            return Err(Rejection::AlreadyThere);
        }
        Ok(target)
    }

    fn begin(&mut self, to: SceneIndex) -> SceneEffect {
        let from = self.current;
        tracing::debug!(%from, %to, "scene transition started");
        self.phase = Phase::Exiting { from, to };
        self.timer = Delay::new(self.timing.exit);
        SceneEffect::Visual {
            scene: from,
            visual: SceneVisual::Exiting,
        }
    }

    /// Feeds elapsed time into the running transition. Time left over after
    /// one phase completes carries into the next.
    pub fn advance(&mut self, dt: Duration) -> Vec<SceneEffect> {
        let mut out = Vec::new();
        let mut left = dt;
        loop {
            match self.phase {
                Phase::Idle => break,
                Phase::Exiting { from, to } => {
                    let Some(overshoot) = self.timer.tick(left) else {
                        break;
                    };
                    left = overshoot;
                    self.current = to;
                    self.phase = Phase::Settling;
                    self.timer = Delay::new(self.timing.settle);

                    out.push(SceneEffect::Visual {
                        scene: from,
                        visual: SceneVisual::Inactive,
                    });
                    out.push(SceneEffect::Visual {
                        scene: to,
                        visual: SceneVisual::Active,
                    });
                    out.extend(self.indicator_effects());
                }
                Phase::Settling => {
                    if self.timer.tick(left).is_some() {
                        tracing::debug!(scene = %self.current, "scene transition settled");
                        self.phase = Phase::Idle;
                    }
                    break;
                }
            }
        }
        out
    }
}
