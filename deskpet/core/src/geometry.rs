//! Screen Geometry Primitives
//!
//! Plain integer geometry shared by the physics tracker, the render
//! surface contract and the window probe. Coordinates are desktop
//! pixels with the origin at the top-left of the primary screen.

use serde::{Deserialize, Serialize};

/// A point in desktop coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a window or screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// X coordinate one past the right edge
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Y coordinate one past the bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Whether a horizontal span `[x, x + width)` overlaps this rectangle's span
    pub const fn overlaps_horizontally(&self, x: i32, width: i32) -> bool {
        x + width > self.x && x < self.right()
    }
}
