//! Animation Catalog
//!
//! Static mapping from [`PetState`] to its animation: an ordered frame
//! sequence, per-frame duration, loop behavior and optional successor
//! state. The catalog describes WHAT to play; the render surface decides
//! how to blit the referenced assets.
//!
//! The table is read-only after construction. When the engine needs a
//! per-entry tweak (the celebration loop forcing its way back to idle,
//! or a fall resolving into a Pomodoro phase), it clones the spec and
//! patches the clone; the shared catalog is never mutated.

mod playback;

pub use playback::{Playback, StepOutcome};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::state::PetState;

/// Upper bound on synchronous transition chaining before the engine
/// declares the catalog misconfigured.
pub const MAX_TRANSITION_HOPS: usize = 10;

/// Reference to a single frame asset, resolved by the render surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRef {
    /// Asset path, e.g. `sprites/idle/idle_0.png`
    pub path: String,
}

/// How many times an animation plays before it completes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    /// Loop forever; only an external event ends the animation
    Infinite,
    /// Play once, then hold the last frame or advance to the successor
    Once,
    /// Play the sequence N times, then hold or advance
    Repeat(u32),
}

impl LoopMode {
    /// Completed-loop count at which the animation is done (None = never)
    pub const fn completion_target(self) -> Option<u32> {
        match self {
            LoopMode::Infinite => None,
            LoopMode::Once => Some(1),
            LoopMode::Repeat(n) => Some(n),
        }
    }
}

/// Per-state animation description
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSpec {
    /// Directory holding this animation's frames
    pub frames_dir: String,
    /// Frame filename prefix; frames are `{prefix}{index}.png`
    pub prefix: String,
    /// Number of frames
    pub frame_count: usize,
    /// Display time per frame in milliseconds
    pub frame_duration_ms: u64,
    /// Loop behavior
    pub loops: LoopMode,
    /// State to enter once the configured loops complete
    pub next_state: Option<PetState>,
    /// Play the frame sequence back to front
    pub reverse_playback: bool,
    /// Mirror every frame horizontally
    pub flip_horizontal: bool,
}

impl AnimationSpec {
    /// An endlessly looping animation
    pub fn looping(
        frames_dir: impl Into<String>,
        prefix: impl Into<String>,
        frame_count: usize,
        frame_duration_ms: u64,
    ) -> Self {
        Self {
            frames_dir: frames_dir.into(),
            prefix: prefix.into(),
            frame_count,
            frame_duration_ms,
            loops: LoopMode::Infinite,
            next_state: None,
            reverse_playback: false,
            flip_horizontal: false,
        }
    }

    /// A play-once animation (holds its last frame unless a successor is set)
    pub fn oneshot(
        frames_dir: impl Into<String>,
        prefix: impl Into<String>,
        frame_count: usize,
        frame_duration_ms: u64,
    ) -> Self {
        Self {
            loops: LoopMode::Once,
            ..Self::looping(frames_dir, prefix, frame_count, frame_duration_ms)
        }
    }

    /// An animation that plays a fixed number of times
    pub fn repeating(
        frames_dir: impl Into<String>,
        prefix: impl Into<String>,
        frame_count: usize,
        frame_duration_ms: u64,
        times: u32,
    ) -> Self {
        Self {
            loops: LoopMode::Repeat(times),
            ..Self::looping(frames_dir, prefix, frame_count, frame_duration_ms)
        }
    }

    /// Set the successor state entered on completion
    #[must_use]
    pub fn advancing_to(mut self, next: PetState) -> Self {
        self.next_state = Some(next);
        self
    }

    /// Play the frames back to front (reusing another state's art)
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.reverse_playback = true;
        self
    }

    /// Frame references in catalog order (before any reversal)
    pub fn frames(&self) -> Vec<FrameRef> {
        (0..self.frame_count)
            .map(|i| FrameRef {
                path: format!("{}{}{}.png", self.frames_dir, self.prefix, i),
            })
            .collect()
    }
}

/// The full state-to-animation table
#[derive(Clone, Debug)]
pub struct AnimationCatalog {
    specs: HashMap<PetState, AnimationSpec>,
    fallback: FrameRef,
}

impl AnimationCatalog {
    /// Build the standard catalog covering every [`PetState`]
    pub fn standard() -> Self {
        use PetState::*;

        let mut specs = HashMap::new();

        // Baseline poses
        specs.insert(Idle, AnimationSpec::looping("sprites/idle/", "idle_", 3, 125));
        specs.insert(Sleep, AnimationSpec::oneshot("sprites/sleep/", "sleep_", 11, 125));
        specs.insert(Stand, AnimationSpec::oneshot("sprites/stand/", "stand_", 1, 200));
        specs.insert(Catch, AnimationSpec::looping("sprites/catch/", "catch_", 2, 167));

        // Sleep bridges (reuse the sleep art, played backwards)
        specs.insert(
            Awakening,
            AnimationSpec::oneshot("sprites/sleep/", "sleep_", 4, 150)
                .advancing_to(Idle)
                .reversed(),
        );
        specs.insert(
            IdleToStand,
            AnimationSpec::oneshot("sprites/idle_to_stand/", "T_", 9, 125).advancing_to(Stand),
        );
        specs.insert(
            StandToIdle,
            AnimationSpec::oneshot("sprites/idle_to_stand/", "T_", 9, 150)
                .advancing_to(Idle)
                .reversed(),
        );

        // Dancing
        specs.insert(Dance, AnimationSpec::looping("sprites/dance/loop/", "loop_", 8, 125));
        specs.insert(
            StandToDance,
            AnimationSpec::oneshot("sprites/dance/begin/", "dance_", 6, 125).advancing_to(Dance),
        );
        specs.insert(
            DanceToStand,
            AnimationSpec::oneshot("sprites/dance/end/", "end_", 6, 125).advancing_to(Stand),
        );

        // Walking
        specs.insert(
            WalkBegin,
            AnimationSpec::oneshot("sprites/walk/begin/", "begin_", 4, 250).advancing_to(Walk),
        );
        specs.insert(Walk, AnimationSpec::looping("sprites/walk/loop/", "loop_", 8, 167));
        specs.insert(
            WalkEnd,
            AnimationSpec::oneshot("sprites/walk/end/", "end_", 5, 250).advancing_to(Idle),
        );

        // Falling (short frame time keeps the descent smooth)
        specs.insert(Fall, AnimationSpec::looping("sprites/fall/", "fall_", 2, 33));
        specs.insert(
            FallEnd,
            AnimationSpec::oneshot("sprites/fall/end/", "end_", 4, 167).advancing_to(Idle),
        );

        // Celebration
        specs.insert(
            HappyBegin,
            AnimationSpec::oneshot("sprites/happy/begin/", "begin_", 6, 125).advancing_to(HappyLoop),
        );
        specs.insert(HappyLoop, AnimationSpec::looping("sprites/happy/loop/", "loop_", 8, 125));

        // Health reminders
        specs.insert(Break, AnimationSpec::looping("sprites/break/", "break_", 1, 125));
        specs.insert(
            Drink,
            AnimationSpec::oneshot("sprites/drink/begin/", "begin_", 3, 125).advancing_to(DrinkLoop),
        );
        // The drink loop ends on the reminder timer, not on loop completion
        specs.insert(DrinkLoop, AnimationSpec::looping("sprites/drink/loop/", "loop_", 2, 125));

        // Pomodoro
        specs.insert(TomatoWorking, AnimationSpec::looping("sprites/tomato/", "tomato_", 4, 125));
        specs.insert(
            TomatoBreak,
            AnimationSpec::oneshot("sprites/tomato_break/", "tomato_", 8, 125)
                .advancing_to(TomatoResting),
        );
        specs.insert(TomatoResting, AnimationSpec::looping("sprites/break/", "break_", 1, 125));
        specs.insert(
            TomatoCompleted,
            AnimationSpec::repeating("sprites/happy/loop/", "loop_", 8, 125, 10).advancing_to(Idle),
        );
        specs.insert(
            IdleToTomato,
            AnimationSpec::oneshot("sprites/idle_to_stand/", "T_", 9, 125)
                .advancing_to(TomatoWorking),
        );

        // Drag variants shown while a mode would otherwise hide the cursor grab
        specs.insert(TomatoDrag, AnimationSpec::looping("sprites/tomato/", "tomato_", 4, 125));
        specs.insert(BreakDrag, AnimationSpec::looping("sprites/break/", "break_", 1, 125));
        specs.insert(HappyDrag, AnimationSpec::looping("sprites/happy/loop/", "loop_", 8, 125));

        let fallback = specs
            .get(&Idle)
            .map(|spec| FrameRef {
                path: format!("{}{}0.png", spec.frames_dir, spec.prefix),
            })
            .unwrap_or(FrameRef {
                path: "sprites/idle/idle_0.png".to_string(),
            });

        Self { specs, fallback }
    }

    /// Look up a state's animation
    pub fn get(&self, state: PetState) -> Option<&AnimationSpec> {
        self.specs.get(&state)
    }

    /// Cached substitute frame used when a surface rejects an asset
    pub fn fallback_frame(&self) -> &FrameRef {
        &self.fallback
    }

    /// Check the catalog for fatal configuration defects.
    ///
    /// Every state must have an entry, every named successor must exist,
    /// and following successors of finite animations must settle within
    /// [`MAX_TRANSITION_HOPS`]; a cycle here would otherwise recurse
    /// forever inside the engine's synchronous chaining.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for state in PetState::ALL {
            let spec = self
                .specs
                .get(&state)
                .ok_or(CatalogError::MissingEntry(state))?;
            if let Some(next) = spec.next_state {
                if !self.specs.contains_key(&next) {
                    return Err(CatalogError::MissingSuccessor { state, next });
                }
            }
        }

        for start in PetState::ALL {
            let mut state = start;
            let mut hops = 0;
            loop {
                let spec = &self.specs[&state];
                let auto_advances =
                    spec.loops.completion_target().is_some() && spec.next_state.is_some();
                if !auto_advances {
                    break;
                }
                state = spec.next_state.unwrap_or(state);
                hops += 1;
                if hops > MAX_TRANSITION_HOPS {
                    return Err(CatalogError::UnterminatedChain {
                        state: start,
                        max_hops: MAX_TRANSITION_HOPS,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_catalog_is_complete_and_valid() {
        let catalog = AnimationCatalog::standard();
        assert_eq!(catalog.validate(), Ok(()));
        for state in PetState::ALL {
            assert!(catalog.get(state).is_some(), "{state:?} missing");
        }
    }

    #[test]
    fn frame_paths_follow_dir_prefix_index() {
        let catalog = AnimationCatalog::standard();
        let idle = catalog.get(PetState::Idle).unwrap();
        let frames = idle.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].path, "sprites/idle/idle_0.png");
        assert_eq!(frames[2].path, "sprites/idle/idle_2.png");
    }

    #[test]
    fn fallback_is_first_idle_frame() {
        let catalog = AnimationCatalog::standard();
        assert_eq!(catalog.fallback_frame().path, "sprites/idle/idle_0.png");
    }

    #[test]
    fn finite_transition_entries_agree_with_state_successors() {
        let catalog = AnimationCatalog::standard();
        for state in PetState::ALL {
            if !state.is_transition() {
                continue;
            }
            let spec = catalog.get(state).unwrap();
            assert_eq!(
                spec.next_state,
                state.end_state(),
                "{state:?} catalog successor diverges"
            );
        }
    }

    #[test]
    fn cycle_is_rejected() {
        let mut catalog = AnimationCatalog::standard();
        // Wire two one-shot animations into a loop.
        catalog
            .specs
            .insert(
                PetState::IdleToStand,
                AnimationSpec::oneshot("sprites/idle_to_stand/", "T_", 9, 125)
                    .advancing_to(PetState::StandToIdle),
            );
        catalog
            .specs
            .insert(
                PetState::StandToIdle,
                AnimationSpec::oneshot("sprites/idle_to_stand/", "T_", 9, 150)
                    .advancing_to(PetState::IdleToStand),
            );
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::UnterminatedChain { .. })
        ));
    }

    #[test]
    fn completion_targets() {
        assert_eq!(LoopMode::Infinite.completion_target(), None);
        assert_eq!(LoopMode::Once.completion_target(), Some(1));
        assert_eq!(LoopMode::Repeat(10).completion_target(), Some(10));
    }
}
