//! Runs a [`Presentation`] on a tokio task against real time.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::input::RawInput;
use crate::presentation::Presentation;
use crate::view::PresentationView;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Control {
    Input(RawInput),
    StopCountdown,
    StopParticles,
    Shutdown,
}

/// Handle to a running presentation task.
///
/// Dropping every clone of the sender (or calling [`PresentationHandle::shutdown`])
/// ends the task.
#[derive(Debug)]
pub struct PresentationHandle {
    tx: mpsc::UnboundedSender<Control>,
    task: JoinHandle<Presentation>,
}

impl PresentationHandle {
    /// Queues a device event. Returns `false` once the task has ended.
    pub fn send(&self, input: RawInput) -> bool {
        self.tx.send(Control::Input(input)).is_ok()
    }

    pub fn stop_countdown(&self) -> bool {
        self.tx.send(Control::StopCountdown).is_ok()
    }

    pub fn stop_particles(&self) -> bool {
        self.tx.send(Control::StopParticles).is_ok()
    }

    /// Stops the task and hands back the presentation in its final state.
    pub async fn shutdown(self) -> Option<Presentation> {
        let _ = self.tx.send(Control::Shutdown);
        match self.task.await {
            Ok(presentation) => Some(presentation),
            Err(err) => {
                tracing::warn!(%err, "presentation task did not finish cleanly");
                None
            }
        }
    }
}

/// Spawns the presentation loop. Timers advance every `frame` of wall time.
pub fn spawn<V>(presentation: Presentation, view: V, frame: Duration) -> PresentationHandle
where
    V: PresentationView + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(presentation, view, frame, rx));
    PresentationHandle { tx, task }
}

async fn run<V>(
    mut presentation: Presentation,
    mut view: V,
    frame: Duration,
    mut rx: mpsc::UnboundedReceiver<Control>,
) -> Presentation
where
    V: PresentationView,
{
    tracing::info!(frame_ms = frame.as_millis() as u64, "presentation runtime started");
    view.apply_all(&presentation.startup());

    let mut ticker = time::interval(frame.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(Control::Input(input)) => {
                    view.apply_all(&presentation.handle_input(input));
                }
                Some(Control::StopCountdown) => presentation.stop_countdown(),
                Some(Control::StopParticles) => presentation.stop_particles(),
                Some(Control::Shutdown) | None => break,
            },
            now = ticker.tick() => {
                let dt = now.saturating_duration_since(last);
                last = now;
                view.apply_all(&presentation.advance_time(dt));
            }
        }
    }

    tracing::info!(scene = %presentation.current_scene(), "presentation runtime stopped");
    presentation
}
