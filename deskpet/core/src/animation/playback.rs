//! Frame Scheduler
//!
//! Owns the currently playing animation: its resolved frame list, the
//! cursor into it, the loop counter and the tick cadence. The scheduler
//! is passive; the engine's frame pump asks [`Playback::due`] whether a
//! step is owed and then calls [`Playback::step`]. Wall-clock gating via
//! [`Instant`] keeps frame pacing independent of the pump interval.

use std::time::{Duration, Instant};

use super::{AnimationSpec, FrameRef};
use crate::state::PetState;

/// Result of advancing the scheduler by one frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Advanced to the frame at this index
    Frame(usize),
    /// The configured loops finished; hold the last frame and hand the
    /// optional successor to the caller
    Completed { next: Option<PetState> },
    /// Nothing is playing or ticking is stopped
    Stopped,
}

/// Playback position within one animation
#[derive(Debug)]
pub struct Playback {
    spec: Option<AnimationSpec>,
    frames: Vec<FrameRef>,
    frame_index: usize,
    loops_done: u32,
    interval: Option<Duration>,
    last_tick: Instant,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self {
            spec: None,
            frames: Vec::new(),
            frame_index: 0,
            loops_done: 0,
            interval: None,
            last_tick: Instant::now(),
        }
    }

    /// Load an animation and rewind to its first frame (ticking stays off
    /// until [`Playback::start_ticking`])
    pub fn begin(&mut self, spec: AnimationSpec) {
        let mut frames = spec.frames();
        if spec.reverse_playback {
            frames.reverse();
        }
        self.frames = frames;
        self.spec = Some(spec);
        self.frame_index = 0;
        self.loops_done = 0;
        self.interval = None;
    }

    /// Start stepping at the given cadence
    pub fn start_ticking(&mut self, interval: Duration) {
        self.interval = Some(interval);
        self.last_tick = Instant::now();
    }

    /// Stop stepping; the current frame stays on screen
    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// The spec currently loaded, if any
    pub fn spec(&self) -> Option<&AnimationSpec> {
        self.spec.as_ref()
    }

    /// The frame the cursor points at
    pub fn current_frame(&self) -> Option<&FrameRef> {
        self.frames.get(self.frame_index)
    }

    /// Whether enough wall time has passed for the next step
    pub fn due(&self) -> bool {
        match self.interval {
            Some(interval) => self.last_tick.elapsed() >= interval,
            None => false,
        }
    }

    /// Advance one frame.
    ///
    /// On wraparound the loop counter increments; once it reaches the
    /// spec's completion target the scheduler stops itself, holds the
    /// last frame and reports the successor.
    pub fn step(&mut self) -> StepOutcome {
        let Some(spec) = &self.spec else {
            return StepOutcome::Stopped;
        };
        if self.interval.is_none() || self.frames.is_empty() {
            return StepOutcome::Stopped;
        }
        self.last_tick = Instant::now();

        let next_index = self.frame_index + 1;
        if next_index < self.frames.len() {
            self.frame_index = next_index;
            return StepOutcome::Frame(self.frame_index);
        }

        self.loops_done += 1;
        if let Some(target) = spec.loops.completion_target() {
            if self.loops_done >= target {
                self.interval = None;
                return StepOutcome::Completed {
                    next: spec.next_state,
                };
            }
        }
        self.frame_index = 0;
        StepOutcome::Frame(0)
    }

    /// Loops completed since [`Playback::begin`]
    #[cfg(test)]
    pub fn loops_done(&self) -> u32 {
        self.loops_done
    }

    /// Pretend the last step happened long enough ago for the next one
    #[cfg(test)]
    pub fn force_due(&mut self) {
        if let Some(interval) = self.interval {
            self.last_tick = Instant::now() - interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn three_frame_loop() -> AnimationSpec {
        AnimationSpec::looping("sprites/idle/", "idle_", 3, 10)
    }

    #[test]
    fn begin_rewinds_to_frame_zero() {
        let mut playback = Playback::new();
        playback.begin(three_frame_loop());
        assert_eq!(
            playback.current_frame().unwrap().path,
            "sprites/idle/idle_0.png"
        );
        assert!(!playback.due());
    }

    #[test]
    fn reversed_spec_plays_frames_backwards() {
        let mut playback = Playback::new();
        playback.begin(
            AnimationSpec::oneshot("sprites/sleep/", "sleep_", 4, 10)
                .advancing_to(PetState::Idle)
                .reversed(),
        );
        assert_eq!(
            playback.current_frame().unwrap().path,
            "sprites/sleep/sleep_3.png"
        );
        playback.start_ticking(Duration::from_millis(10));
        playback.force_due();
        assert_eq!(playback.step(), StepOutcome::Frame(1));
        assert_eq!(
            playback.current_frame().unwrap().path,
            "sprites/sleep/sleep_2.png"
        );
    }

    #[test]
    fn infinite_loop_wraps_without_completing() {
        let mut playback = Playback::new();
        playback.begin(three_frame_loop());
        playback.start_ticking(Duration::from_millis(10));
        for expected in [1, 2, 0, 1, 2, 0] {
            assert_eq!(playback.step(), StepOutcome::Frame(expected));
        }
        assert_eq!(playback.loops_done(), 2);
    }

    #[test]
    fn oneshot_completes_with_successor_and_holds() {
        let mut playback = Playback::new();
        playback.begin(
            AnimationSpec::oneshot("sprites/walk/begin/", "begin_", 4, 10)
                .advancing_to(PetState::Walk),
        );
        playback.start_ticking(Duration::from_millis(10));
        assert_eq!(playback.step(), StepOutcome::Frame(1));
        assert_eq!(playback.step(), StepOutcome::Frame(2));
        assert_eq!(playback.step(), StepOutcome::Frame(3));
        assert_eq!(
            playback.step(),
            StepOutcome::Completed {
                next: Some(PetState::Walk)
            }
        );
        // Held on the last frame, no longer ticking.
        assert_eq!(
            playback.current_frame().unwrap().path,
            "sprites/walk/begin/begin_3.png"
        );
        assert!(!playback.due());
        assert_eq!(playback.step(), StepOutcome::Stopped);
    }

    #[test]
    fn repeat_runs_the_configured_number_of_loops() {
        let mut playback = Playback::new();
        playback.begin(
            AnimationSpec::repeating("sprites/happy/loop/", "loop_", 2, 10, 3)
                .advancing_to(PetState::Idle),
        );
        playback.start_ticking(Duration::from_millis(10));
        let mut steps = 0;
        loop {
            match playback.step() {
                StepOutcome::Frame(_) => steps += 1,
                StepOutcome::Completed { next } => {
                    assert_eq!(next, Some(PetState::Idle));
                    break;
                }
                StepOutcome::Stopped => panic!("stopped before completing"),
            }
        }
        // 2 frames x 3 loops, minus the initial frame shown by begin().
        assert_eq!(steps, 5);
        assert_eq!(playback.loops_done(), 3);
    }

    #[test]
    fn due_respects_the_interval() {
        let mut playback = Playback::new();
        playback.begin(three_frame_loop());
        playback.start_ticking(Duration::from_millis(50));
        assert!(!playback.due());
        playback.force_due();
        assert!(playback.due());
        playback.step();
        assert!(!playback.due());
    }

    #[test]
    fn stop_holds_the_current_frame() {
        let mut playback = Playback::new();
        playback.begin(three_frame_loop());
        playback.start_ticking(Duration::from_millis(10));
        playback.step();
        playback.stop();
        assert!(!playback.due());
        assert_eq!(playback.step(), StepOutcome::Stopped);
        assert_eq!(
            playback.current_frame().unwrap().path,
            "sprites/idle/idle_1.png"
        );
    }
}
