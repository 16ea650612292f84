//! Input Events
//!
//! Mouse input forwarded from the render surface. The surface is a dumb
//! window: it reports what happened and where, and the engine decides
//! what it means.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Mouse button identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
}

/// A button press inside the pet window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MousePress {
    /// Which button went down
    pub button: MouseButton,
    /// Position relative to the window's top-left corner
    pub pos: Point,
    /// Position in desktop coordinates
    pub global: Point,
}
