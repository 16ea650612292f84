//! # deskpet-core
//!
//! Engine for an animated desktop companion. The pet sits on the
//! taskbar (or a registered application window), plays sprite
//! animations for everything it does, falls when nothing supports it,
//! naps when ignored, dances to music, nags you to drink water and take
//! breaks, and runs a Pomodoro cycle during which it locks itself down
//! and refuses distraction.
//!
//! The crate is platform-agnostic: rendering, window enumeration and
//! audio detection sit behind the traits in [`surface`], and the whole
//! engine is driven single-threaded from [`driver`]. The binary ships
//! with in-memory implementations; a GUI front end supplies real ones.
//!
//! ## Layout
//!
//! - [`state`]: the state machine vocabulary and successor map
//! - [`animation`]: the state-to-animation catalog and frame scheduler
//! - [`engine`]: the [`engine::Pet`] core tying everything together
//! - [`platform`]: landing surfaces derived from the desktop layout
//! - [`reminder`] / [`tomato`]: health reminders and the Pomodoro timer
//! - [`driver`]: the tokio cadence loop

pub mod animation;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod platform;
pub mod reminder;
pub mod state;
pub mod surface;
pub mod tomato;

pub use animation::{AnimationCatalog, AnimationSpec, FrameRef, LoopMode};
pub use config::{BreakConfig, FallConfig, WalkConfig, WaterConfig};
pub use engine::Pet;
pub use error::{CatalogError, SurfaceError};
pub use events::{MouseButton, MousePress};
pub use geometry::{Point, Rect, Size};
pub use state::{Direction, PetState};
pub use surface::{Capability, RenderSurface, WindowInfo, WindowProbe};
pub use tomato::{TomatoSettings, TomatoState, TomatoTimer};
