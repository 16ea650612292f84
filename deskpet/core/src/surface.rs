//! Host Boundaries
//!
//! The engine never talks to a windowing system, an OS window list or an
//! audio device directly. Three traits mark the seams:
//!
//! - [`RenderSurface`]: the pet's own window. Show a frame, move, resize,
//!   and the Pomodoro overlay widgets.
//! - [`WindowProbe`]: read-only view of the desktop. Top-level windows,
//!   the taskbar, the screen bounds.
//! - [`Capability`]: an optional collaborator that can be switched off
//!   (music detection, gesture recognition). Absent collaborators are
//!   simply `None`; the engine never assumes one exists.
//!
//! [`HeadlessSurface`] and [`FixedWindowProbe`] are in-memory
//! implementations used by the headless binary and the test suite.

use crate::animation::FrameRef;
use crate::error::SurfaceError;
use crate::geometry::{Point, Rect, Size};

/// A top-level window as reported by a probe
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowInfo {
    pub title: String,
    pub class_name: String,
    pub rect: Rect,
    pub visible: bool,
}

/// The pet's window, as seen from the engine
pub trait RenderSurface {
    /// Display a frame, optionally mirrored horizontally
    fn update_frame(&mut self, frame: &FrameRef, flip: bool) -> Result<(), SurfaceError>;

    /// Move the window's top-left corner
    fn move_to(&mut self, pos: Point);

    /// Current top-left corner
    fn position(&self) -> Point;

    /// Current window size
    fn size(&self) -> Size;

    /// Fix the window to the given size
    fn set_fixed_size(&mut self, size: Size);

    fn show_timer_overlay(&mut self);
    fn hide_timer_overlay(&mut self);
    fn show_progress_overlay(&mut self);
    fn hide_progress_overlay(&mut self);

    /// Update the countdown text, formatted `MM:SS`
    fn update_timer_display(&mut self, text: &str);

    /// Update the cycle counter, `current` of `total`
    fn update_progress_display(&mut self, current: u32, total: u32);
}

/// Read-only desktop introspection
pub trait WindowProbe {
    /// Visible top-level windows, topmost first
    fn top_level_windows(&self) -> Vec<WindowInfo>;

    /// The taskbar's bounds, if one exists
    fn taskbar_rect(&self) -> Option<Rect>;

    /// The primary screen's bounds
    fn screen_rect(&self) -> Rect;
}

/// An optional collaborator the engine can switch on and off
pub trait Capability {
    fn enable(&mut self);
    fn disable(&mut self);
    fn is_enabled(&self) -> bool;
}

/// In-memory surface recording everything the engine asked for
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    pos: Point,
    size: Size,
    /// Every frame shown, with its flip flag
    pub frames: Vec<(FrameRef, bool)>,
    pub timer_text: String,
    pub progress: (u32, u32),
    pub timer_overlay_visible: bool,
    pub progress_overlay_visible: bool,
    /// Frame paths this surface refuses to display
    pub reject_paths: Vec<String>,
}

impl HeadlessSurface {
    pub fn new(pos: Point, size: Size) -> Self {
        Self {
            pos,
            size,
            ..Self::default()
        }
    }

    /// Path of the most recently accepted frame
    pub fn last_frame_path(&self) -> Option<&str> {
        self.frames.last().map(|(frame, _)| frame.path.as_str())
    }
}

impl RenderSurface for HeadlessSurface {
    fn update_frame(&mut self, frame: &FrameRef, flip: bool) -> Result<(), SurfaceError> {
        if self.reject_paths.iter().any(|p| p == &frame.path) {
            return Err(SurfaceError::AssetUnavailable {
                path: frame.path.clone(),
            });
        }
        self.frames.push((frame.clone(), flip));
        Ok(())
    }

    fn move_to(&mut self, pos: Point) {
        self.pos = pos;
    }

    fn position(&self) -> Point {
        self.pos
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_fixed_size(&mut self, size: Size) {
        self.size = size;
    }

    fn show_timer_overlay(&mut self) {
        self.timer_overlay_visible = true;
    }

    fn hide_timer_overlay(&mut self) {
        self.timer_overlay_visible = false;
    }

    fn show_progress_overlay(&mut self) {
        self.progress_overlay_visible = true;
    }

    fn hide_progress_overlay(&mut self) {
        self.progress_overlay_visible = false;
    }

    fn update_timer_display(&mut self, text: &str) {
        self.timer_text = text.to_string();
    }

    fn update_progress_display(&mut self, current: u32, total: u32) {
        self.progress = (current, total);
    }
}

/// Probe returning a fixed desktop layout
#[derive(Clone, Debug, Default)]
pub struct FixedWindowProbe {
    pub windows: Vec<WindowInfo>,
    pub taskbar: Option<Rect>,
    pub screen: Rect,
}

impl FixedWindowProbe {
    pub fn new(screen: Rect) -> Self {
        Self {
            screen,
            ..Self::default()
        }
    }

    /// A screen with a full-width taskbar strip at the bottom
    pub fn with_taskbar(screen: Rect, taskbar_height: i32) -> Self {
        Self {
            windows: Vec::new(),
            taskbar: Some(Rect::new(
                screen.x,
                screen.bottom() - taskbar_height,
                screen.width,
                taskbar_height,
            )),
            screen,
        }
    }
}

impl WindowProbe for FixedWindowProbe {
    fn top_level_windows(&self) -> Vec<WindowInfo> {
        self.windows.clone()
    }

    fn taskbar_rect(&self) -> Option<Rect> {
        self.taskbar
    }

    fn screen_rect(&self) -> Rect {
        self.screen
    }
}

/// Minimal on/off collaborator for tests
#[derive(Clone, Copy, Debug, Default)]
pub struct ToggleCapability {
    enabled: bool,
}

impl Capability for ToggleCapability {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
