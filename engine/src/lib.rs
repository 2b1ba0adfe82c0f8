pub mod rng;
pub mod timer;

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One recorded snapshot, stamped with the virtual time it was taken at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame<S> {
    pub at_ms: u64,
    pub state: S,
}

/// Append-only history of snapshots produced while driving a [`Machine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline<S> {
    frames: Vec<Frame<S>>,
}

impl<S> Default for Timeline<S> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<S> Timeline<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn latest(&self) -> Option<&Frame<S>> {
        self.frames.last()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame<S>> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame<S>] {
        &self.frames
    }

    /// Last snapshot taken at or before `at`.
    pub fn state_at(&self, at: Duration) -> Option<&S> {
        let at_ms = duration_ms(at);
        self.frames
            .iter()
            .take_while(|frame| frame.at_ms <= at_ms)
            .last()
            .map(|frame| &frame.state)
    }

    pub fn record(&mut self, at: Duration, state: S) -> usize {
        self.frames.push(Frame {
            at_ms: duration_ms(at),
            state,
        });
        self.frames.len() - 1
    }
}

impl<S: Serialize + DeserializeOwned> Timeline<S> {
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, text)
    }

    pub fn load_json_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

fn duration_ms(d: Duration) -> u64 {
    d.as_millis().min(u64::MAX as u128) as u64
}

/// A state machine driven by discrete inputs and by the passage of time.
///
/// Both entry points report side effects as values so a host (a renderer, a
/// test, a recording) decides what to do with them.
pub trait Machine {
    type Input;
    type Effect;
    type Snapshot;

    /// Effects to apply once, before any input or elapsed time.
    fn start(&mut self) -> Vec<Self::Effect> {
        Vec::new()
    }

    fn handle(&mut self, input: Self::Input) -> Vec<Self::Effect>;

    fn advance(&mut self, dt: Duration) -> Vec<Self::Effect>;

    fn snapshot(&self) -> Self::Snapshot;
}

/// Drives a [`Machine`] on virtual time and keeps a snapshot after every step.
#[derive(Debug)]
pub struct HeadlessRunner<M: Machine> {
    machine: M,
    elapsed: Duration,
    timeline: Timeline<M::Snapshot>,
}

impl<M: Machine> HeadlessRunner<M> {
    /// Starts the machine; effects emitted by [`Machine::start`] are returned
    /// alongside the runner.
    pub fn new(mut machine: M) -> (Self, Vec<M::Effect>) {
        let effects = machine.start();
        let mut timeline = Timeline::new();
        timeline.record(Duration::ZERO, machine.snapshot());
        (
            Self {
                machine,
                elapsed: Duration::ZERO,
                timeline,
            },
            effects,
        )
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn timeline(&self) -> &Timeline<M::Snapshot> {
        &self.timeline
    }

    pub fn into_parts(self) -> (M, Timeline<M::Snapshot>) {
        (self.machine, self.timeline)
    }

    pub fn send(&mut self, input: M::Input) -> Vec<M::Effect> {
        let effects = self.machine.handle(input);
        self.timeline.record(self.elapsed, self.machine.snapshot());
        effects
    }

    pub fn run<I>(&mut self, inputs: I) -> Vec<M::Effect>
    where
        I: IntoIterator<Item = M::Input>,
    {
        let mut effects = Vec::new();
        for input in inputs {
            effects.extend(self.send(input));
        }
        effects
    }

    /// Advances by `total`, in slices of at most `step` (a zero step means one slice).
    pub fn advance(&mut self, total: Duration, step: Duration) -> Vec<M::Effect> {
        let mut effects = Vec::new();
        let mut left = total;
        while !left.is_zero() {
            let dt = if step.is_zero() { left } else { left.min(step) };
            effects.extend(self.machine.advance(dt));
            self.elapsed += dt;
            left -= dt;
        }
        tracing::trace!(elapsed_ms = duration_ms(self.elapsed), "headless runner advanced");
        self.timeline.record(self.elapsed, self.machine.snapshot());
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts inputs, and fires a "ding" each full second.
    struct Metronome {
        count: u32,
        since_ding: Duration,
    }

    impl Machine for Metronome {
        type Input = u32;
        type Effect = &'static str;
        type Snapshot = u32;

        fn start(&mut self) -> Vec<Self::Effect> {
            vec!["ready"]
        }

        fn handle(&mut self, input: u32) -> Vec<Self::Effect> {
            self.count += input;
            Vec::new()
        }

        fn advance(&mut self, dt: Duration) -> Vec<Self::Effect> {
            self.since_ding += dt;
            let mut out = Vec::new();
            while self.since_ding >= Duration::from_secs(1) {
                self.since_ding -= Duration::from_secs(1);
                out.push("ding");
            }
            out
        }

        fn snapshot(&self) -> u32 {
            self.count
        }
    }

    fn metronome() -> Metronome {
        Metronome {
            count: 0,
            since_ding: Duration::ZERO,
        }
    }

    #[test]
    fn runner_reports_start_effects_and_records_initial_frame() {
        let (runner, effects) = HeadlessRunner::new(metronome());
        assert_eq!(effects, vec!["ready"]);
        assert_eq!(runner.timeline().len(), 1);
        assert_eq!(runner.timeline().latest().map(|f| f.state), Some(0));
    }

    #[test]
    fn runner_advances_in_slices_and_stamps_frames() {
        let (mut runner, _) = HeadlessRunner::new(metronome());
        runner.run([2, 3]);
        let dings = runner.advance(Duration::from_millis(2500), Duration::from_millis(100));
        assert_eq!(dings, vec!["ding", "ding"]);
        assert_eq!(runner.elapsed(), Duration::from_millis(2500));

        let last = runner.timeline().latest().expect("frame recorded");
        assert_eq!(last.at_ms, 2500);
        assert_eq!(last.state, 5);
    }

    #[test]
    fn zero_step_advances_in_one_slice() {
        let (mut runner, _) = HeadlessRunner::new(metronome());
        let dings = runner.advance(Duration::from_millis(3000), Duration::ZERO);
        assert_eq!(dings.len(), 3);
    }

    #[test]
    fn timeline_state_at_picks_latest_frame_not_after_time() {
        let mut timeline = Timeline::new();
        timeline.record(Duration::ZERO, 'a');
        timeline.record(Duration::from_millis(100), 'b');
        timeline.record(Duration::from_millis(300), 'c');

        assert_eq!(timeline.state_at(Duration::from_millis(50)), Some(&'a'));
        assert_eq!(timeline.state_at(Duration::from_millis(100)), Some(&'b'));
        assert_eq!(timeline.state_at(Duration::from_millis(299)), Some(&'b'));
        assert_eq!(timeline.state_at(Duration::from_secs(9)), Some(&'c'));
    }
}
