//! Pet State Machine Vocabulary
//!
//! States fall into two groups:
//!
//! 1. **Core states**: the pet can remain in them indefinitely absent a
//!    triggering event (idle, sleeping, dancing, the Pomodoro phases, ...).
//! 2. **Transition states**: one-shot animations that bridge two core
//!    states and auto-advance to a successor once their configured loops
//!    complete (waking up, sitting down, starting to walk, ...).
//!
//! The successor map is a total function over transition states; following
//! it always reaches a core state in a bounded number of hops. The engine
//! relies on that bound when it chains transitions synchronously.

use serde::{Deserialize, Serialize};

/// Every state the pet can be in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PetState {
    // Core states
    /// Default resting state, breathing/blinking loop
    Idle,
    /// Entered after a period without interaction
    Sleep,
    /// Attentive standing pose, entered from Idle on click
    Stand,
    /// Held by the mouse mid-drag
    Catch,
    /// Celebration loop
    HappyLoop,
    /// Rest-reminder display
    Break,
    /// Hydration-reminder intro
    Drink,
    /// Hydration-reminder loop
    DrinkLoop,
    /// Walking across the screen
    Walk,
    /// Airborne, no platform underneath
    Fall,
    /// Dancing to detected music
    Dance,
    /// Pomodoro work phase
    TomatoWorking,
    /// Pomodoro work-to-rest bridge animation
    TomatoBreak,
    /// Pomodoro rest phase
    TomatoResting,
    /// All Pomodoro cycles finished, celebration plays
    TomatoCompleted,
    /// Dragged while the Pomodoro lock is active (work phase art)
    TomatoDrag,
    /// Dragged while the Pomodoro lock is active (rest phase art)
    BreakDrag,
    /// Dragged during the celebration loop
    HappyDrag,

    // Transition states
    /// Sleep -> Idle
    Awakening,
    /// Idle -> Stand
    IdleToStand,
    /// Stand -> Idle
    StandToIdle,
    /// Stand -> Dance
    StandToDance,
    /// Dance -> Stand
    DanceToStand,
    /// Idle -> Walk
    WalkBegin,
    /// Walk -> Idle
    WalkEnd,
    /// Fall -> Idle
    FallEnd,
    /// Stand -> HappyLoop
    HappyBegin,
    /// Any state -> TomatoWorking
    IdleToTomato,
}

impl PetState {
    /// All states, for catalog completeness checks
    pub const ALL: [PetState; 28] = [
        PetState::Idle,
        PetState::Sleep,
        PetState::Stand,
        PetState::Catch,
        PetState::HappyLoop,
        PetState::Break,
        PetState::Drink,
        PetState::DrinkLoop,
        PetState::Walk,
        PetState::Fall,
        PetState::Dance,
        PetState::TomatoWorking,
        PetState::TomatoBreak,
        PetState::TomatoResting,
        PetState::TomatoCompleted,
        PetState::TomatoDrag,
        PetState::BreakDrag,
        PetState::HappyDrag,
        PetState::Awakening,
        PetState::IdleToStand,
        PetState::StandToIdle,
        PetState::StandToDance,
        PetState::DanceToStand,
        PetState::WalkBegin,
        PetState::WalkEnd,
        PetState::FallEnd,
        PetState::HappyBegin,
        PetState::IdleToTomato,
    ];

    /// Whether the pet can remain in this state indefinitely
    pub const fn is_core(self) -> bool {
        matches!(
            self,
            PetState::Idle
                | PetState::Sleep
                | PetState::Stand
                | PetState::Walk
                | PetState::Dance
                | PetState::Fall
                | PetState::Catch
                | PetState::HappyLoop
                | PetState::TomatoWorking
                | PetState::TomatoBreak
                | PetState::TomatoResting
                | PetState::TomatoCompleted
                | PetState::Break
                | PetState::Drink
                | PetState::DrinkLoop
                | PetState::TomatoDrag
                | PetState::BreakDrag
                | PetState::HappyDrag
        )
    }

    /// Whether this is a one-shot bridge animation
    pub const fn is_transition(self) -> bool {
        !self.is_core()
    }

    /// The state a bridge animation settles into once it finishes.
    ///
    /// Defined for every transition state, and additionally for the few
    /// core states whose animation carries an automatic follow-up
    /// (drink intro -> drink loop, drag variants -> their phase state).
    pub const fn end_state(self) -> Option<PetState> {
        match self {
            PetState::Awakening => Some(PetState::Idle),
            PetState::IdleToStand => Some(PetState::Stand),
            PetState::StandToIdle => Some(PetState::Idle),
            PetState::StandToDance => Some(PetState::Dance),
            PetState::DanceToStand => Some(PetState::Stand),
            PetState::WalkBegin => Some(PetState::Walk),
            PetState::WalkEnd => Some(PetState::Idle),
            PetState::FallEnd => Some(PetState::Idle),
            PetState::HappyBegin => Some(PetState::HappyLoop),
            PetState::IdleToTomato => Some(PetState::TomatoWorking),
            PetState::TomatoBreak => Some(PetState::TomatoResting),
            PetState::Break => Some(PetState::Idle),
            PetState::Drink => Some(PetState::DrinkLoop),
            PetState::DrinkLoop => Some(PetState::Idle),
            PetState::TomatoDrag => Some(PetState::TomatoWorking),
            PetState::BreakDrag => Some(PetState::TomatoBreak),
            PetState::HappyDrag => Some(PetState::HappyLoop),
            _ => None,
        }
    }

    /// Whether this state belongs to the walking animation family
    pub const fn is_walk_family(self) -> bool {
        matches!(
            self,
            PetState::Walk | PetState::WalkBegin | PetState::WalkEnd
        )
    }
}

/// Horizontal movement direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}
