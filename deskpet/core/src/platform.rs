//! Landing Platforms
//!
//! Tracks the surfaces the pet can stand on: the taskbar, at most one
//! interactive application window, and a screen-bottom strip as the
//! fallback when neither exists. The tracker is rebuilt on a slow cadence
//! from a [`WindowProbe`] snapshot; between rebuilds the platform list is
//! treated as ground truth.

use tracing::debug;

use crate::geometry::{Point, Rect, Size};
use crate::surface::{WindowInfo, WindowProbe};

/// Vertical slack when deciding the pet is resting on a platform
pub const LANDING_TOLERANCE_PX: i32 = 5;

/// Windows smaller than this in either dimension never become platforms
pub const MIN_PLATFORM_WINDOW_SIZE: i32 = 50;

const SCREEN_BOTTOM_STRIP_PX: i32 = 10;

/// What kind of surface a platform is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformKind {
    Taskbar,
    Window,
    ScreenBottom,
}

/// A surface the pet can land on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
    /// Source window title, for [`PlatformKind::Window`] only
    pub title: Option<String>,
    /// The matched window was the topmost match in this rebuild
    pub is_top_window: bool,
}

/// A user-registered window the pet may stand on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowPattern {
    /// Substring matched against window titles, case-insensitive
    pub title: String,
    pub class_pattern: Option<String>,
}

/// The current set of landing surfaces
pub struct PlatformTracker {
    probe: Box<dyn WindowProbe>,
    platforms: Vec<Platform>,
    patterns: Vec<WindowPattern>,
}

impl PlatformTracker {
    pub fn new(probe: Box<dyn WindowProbe>) -> Self {
        let mut tracker = Self {
            probe,
            platforms: Vec::new(),
            patterns: Vec::new(),
        };
        tracker.rebuild();
        tracker
    }

    /// Refresh the platform list from a fresh desktop snapshot.
    ///
    /// Order matters for landing checks: the taskbar comes first, then
    /// the topmost window matching a registered pattern. With neither
    /// present, a thin strip along the screen bottom keeps the pet from
    /// falling out of view.
    pub fn rebuild(&mut self) {
        let mut platforms = Vec::new();

        if let Some(rect) = self.probe.taskbar_rect() {
            platforms.push(Platform {
                rect,
                kind: PlatformKind::Taskbar,
                title: None,
                is_top_window: false,
            });
        }

        if let Some(win) = self.topmost_match() {
            platforms.push(Platform {
                rect: Rect::new(win.rect.x, win.rect.y, win.rect.width, 1),
                kind: PlatformKind::Window,
                title: Some(win.title.clone()),
                is_top_window: true,
            });
        }

        if platforms.is_empty() {
            let screen = self.probe.screen_rect();
            platforms.push(Platform {
                rect: Rect::new(
                    screen.x,
                    screen.bottom() - SCREEN_BOTTOM_STRIP_PX,
                    screen.width,
                    SCREEN_BOTTOM_STRIP_PX,
                ),
                kind: PlatformKind::ScreenBottom,
                title: None,
                is_top_window: false,
            });
        }

        self.platforms = platforms;
    }

    fn topmost_match(&self) -> Option<WindowInfo> {
        self.probe
            .top_level_windows()
            .into_iter()
            .find(|win| self.matches_pattern(win) && Self::usable_as_platform(win))
    }

    fn matches_pattern(&self, win: &WindowInfo) -> bool {
        let title = win.title.to_lowercase();
        let class = win.class_name.to_lowercase();
        self.patterns.iter().any(|pattern| {
            title.contains(&pattern.title.to_lowercase())
                && pattern
                    .class_pattern
                    .as_ref()
                    .map_or(true, |p| class.contains(&p.to_lowercase()))
        })
    }

    fn usable_as_platform(win: &WindowInfo) -> bool {
        win.visible
            && win.rect.width > MIN_PLATFORM_WINDOW_SIZE
            && win.rect.height > MIN_PLATFORM_WINDOW_SIZE
    }

    /// The platform directly under a pet of the given size, if its feet
    /// are within [`LANDING_TOLERANCE_PX`] of the platform's top edge
    pub fn platform_under(&self, pos: Point, size: Size) -> Option<&Platform> {
        let feet = pos.y + size.height;
        self.platforms.iter().find(|p| {
            (p.rect.y - feet).abs() <= LANDING_TOLERANCE_PX
                && p.rect.overlaps_horizontally(pos.x, size.width)
        })
    }

    /// Current platforms, taskbar first
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Register a window-title pattern. Returns false when no visible
    /// window currently matches or the pattern is already registered.
    pub fn add_pattern(&mut self, title: impl Into<String>, class_pattern: Option<String>) -> bool {
        let title = title.into();
        let lowered = title.to_lowercase();
        if self
            .patterns
            .iter()
            .any(|p| p.title.to_lowercase() == lowered)
        {
            debug!(%title, "pattern already registered");
            return false;
        }
        let exists = self.probe.top_level_windows().iter().any(|win| {
            Self::usable_as_platform(win) && win.title.to_lowercase().contains(&lowered)
        });
        if !exists {
            debug!(%title, "no visible window matches pattern");
            return false;
        }
        self.patterns.push(WindowPattern {
            title,
            class_pattern,
        });
        self.rebuild();
        true
    }

    /// Remove a pattern by title, case-insensitive
    pub fn remove_pattern(&mut self, title: &str) {
        let lowered = title.to_lowercase();
        self.patterns.retain(|p| p.title.to_lowercase() != lowered);
        self.rebuild();
    }

    /// Drop all registered patterns
    pub fn clear_patterns(&mut self) {
        self.patterns.clear();
        self.rebuild();
    }

    /// Registered patterns
    pub fn patterns(&self) -> &[WindowPattern] {
        &self.patterns
    }

    /// Candidate windows a user could register, sorted by title.
    /// Excludes windows too small to stand on.
    pub fn visible_windows(&self) -> Vec<WindowInfo> {
        let mut windows: Vec<WindowInfo> = self
            .probe
            .top_level_windows()
            .into_iter()
            .filter(Self::usable_as_platform)
            .collect();
        windows.sort_by_key(|w| w.title.to_lowercase());
        windows
    }

    /// Screen bounds from the underlying probe
    pub fn screen(&self) -> Rect {
        self.probe.screen_rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FixedWindowProbe;
    use pretty_assertions::assert_eq;

    fn screen() -> Rect {
        Rect::new(0, 0, 800, 600)
    }

    fn window(title: &str, rect: Rect) -> WindowInfo {
        WindowInfo {
            title: title.to_string(),
            class_name: "AppFrame".to_string(),
            rect,
            visible: true,
        }
    }

    #[test]
    fn taskbar_becomes_a_platform() {
        let tracker =
            PlatformTracker::new(Box::new(FixedWindowProbe::with_taskbar(screen(), 40)));
        assert_eq!(tracker.platforms().len(), 1);
        assert_eq!(tracker.platforms()[0].kind, PlatformKind::Taskbar);
        assert_eq!(tracker.platforms()[0].rect, Rect::new(0, 560, 800, 40));
    }

    #[test]
    fn empty_desktop_falls_back_to_screen_bottom() {
        let tracker = PlatformTracker::new(Box::new(FixedWindowProbe::new(screen())));
        assert_eq!(tracker.platforms().len(), 1);
        assert_eq!(tracker.platforms()[0].kind, PlatformKind::ScreenBottom);
        assert_eq!(tracker.platforms()[0].rect, Rect::new(0, 590, 800, 10));
    }

    #[test]
    fn registered_pattern_turns_topmost_match_into_platform() {
        let mut probe = FixedWindowProbe::with_taskbar(screen(), 40);
        probe.windows = vec![
            window("Notes - editor", Rect::new(100, 100, 400, 300)),
            window("Editor two", Rect::new(50, 200, 400, 300)),
        ];
        let mut tracker = PlatformTracker::new(Box::new(probe));
        assert!(tracker.add_pattern("editor", None));

        let windows: Vec<&Platform> = tracker
            .platforms()
            .iter()
            .filter(|p| p.kind == PlatformKind::Window)
            .collect();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].title.as_deref(), Some("Notes - editor"));
        assert!(windows[0].is_top_window);
        // Only the top edge is standable.
        assert_eq!(windows[0].rect, Rect::new(100, 100, 400, 1));
    }

    #[test]
    fn add_pattern_rejects_duplicates_and_missing_windows() {
        let mut probe = FixedWindowProbe::with_taskbar(screen(), 40);
        probe.windows = vec![window("Music Player", Rect::new(0, 0, 300, 300))];
        let mut tracker = PlatformTracker::new(Box::new(probe));
        assert!(tracker.add_pattern("music", None));
        assert!(!tracker.add_pattern("MUSIC", None));
        assert!(!tracker.add_pattern("browser", None));
        assert_eq!(tracker.patterns().len(), 1);
    }

    #[test]
    fn tiny_windows_are_not_platforms() {
        let mut probe = FixedWindowProbe::new(screen());
        probe.windows = vec![window("tooltip", Rect::new(10, 10, 40, 20))];
        let mut tracker = PlatformTracker::new(Box::new(probe));
        assert!(!tracker.add_pattern("tooltip", None));
        assert!(tracker.visible_windows().is_empty());
    }

    #[test]
    fn platform_under_uses_tolerance_and_overlap() {
        let tracker =
            PlatformTracker::new(Box::new(FixedWindowProbe::with_taskbar(screen(), 40)));
        let size = Size::new(100, 100);
        // Feet exactly on the taskbar top edge (y = 560).
        assert!(tracker.platform_under(Point::new(50, 460), size).is_some());
        // Within tolerance.
        assert!(tracker.platform_under(Point::new(50, 456), size).is_some());
        assert!(tracker.platform_under(Point::new(50, 464), size).is_some());
        // Too far above.
        assert!(tracker.platform_under(Point::new(50, 440), size).is_none());
        // No horizontal overlap.
        assert!(tracker.platform_under(Point::new(900, 460), size).is_none());
    }

    #[test]
    fn visible_windows_sorted_by_title() {
        let mut probe = FixedWindowProbe::new(screen());
        probe.windows = vec![
            window("zeta", Rect::new(0, 0, 200, 200)),
            window("Alpha", Rect::new(0, 0, 200, 200)),
        ];
        let tracker = PlatformTracker::new(Box::new(probe));
        let titles: Vec<String> = tracker
            .visible_windows()
            .into_iter()
            .map(|w| w.title)
            .collect();
        assert_eq!(titles, vec!["Alpha".to_string(), "zeta".to_string()]);
    }
}
