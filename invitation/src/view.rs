use serde::{Deserialize, Serialize};

use crate::countdown::CountdownParts;
use crate::expand::ExpandChange;
use crate::overlay::OverlayStage;
use crate::particles::Particle;
use crate::scene::{SceneIndex, SceneVisual};

/// Everything the controller asks of the rendering side. The controller never
/// reads presentation state back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ViewCommand {
    SceneVisual { scene: SceneIndex, visual: SceneVisual },
    Indicator { scene: SceneIndex, on: bool },
    Overlay { stage: OverlayStage },
    LightboxShow { index: usize, caption: String },
    LightboxClose,
    EventItem(ExpandChange),
    Countdown(CountdownParts),
    SpawnParticle(Particle),
    RemoveParticle { id: u64 },
    /// Cancel the default action of the event being handled.
    PreventDefault,
}

pub trait PresentationView {
    fn apply(&mut self, command: &ViewCommand);

    fn apply_all(&mut self, commands: &[ViewCommand]) {
        for command in commands {
            self.apply(command);
        }
    }
}

/// Keeps every command in order; handy for tests and scripted runs.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    pub commands: Vec<ViewCommand>,
}

impl CommandLog {
    pub fn take(&mut self) -> Vec<ViewCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl PresentationView for CommandLog {
    fn apply(&mut self, command: &ViewCommand) {
        self.commands.push(command.clone());
    }
}

/// Emits each command as a debug event, skipping per-frame particle noise.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingView;

impl PresentationView for TracingView {
    fn apply(&mut self, command: &ViewCommand) {
        match command {
            ViewCommand::SpawnParticle(_) | ViewCommand::RemoveParticle { .. } => {
                tracing::trace!(?command, "view");
            }
            _ => tracing::debug!(?command, "view"),
        }
    }
}

impl<V: PresentationView + ?Sized> PresentationView for &mut V {
    fn apply(&mut self, command: &ViewCommand) {
        (**self).apply(command);
    }
}
