//! Behavior Configuration
//!
//! Owned, serializable settings for the optional behaviors: random
//! walking, gravity, and the two health reminders. These structs hold
//! configuration only; runtime bookkeeping (cooldown deadlines, elapsed
//! trackers) lives in the engine so a config can be snapshotted,
//! serialized or swapped without dragging clocks along.
//!
//! Setters clamp rather than reject: a caller asking for a zero walk
//! speed gets the minimum, not an error.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::state::Direction;

/// Random-walk behavior settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Whether spontaneous walks happen at all
    pub enabled: bool,
    /// Probability of starting a walk per eligible check
    pub chance: f64,
    /// Shortest spontaneous walk
    pub min_duration: Duration,
    /// Longest spontaneous walk
    pub max_duration: Duration,
    /// Horizontal speed in pixels per animation frame
    pub speed: i32,
    /// Direction of the current or next walk
    pub direction: Direction,
    /// Minimum gap between two walks
    pub cooldown: Duration,
    /// A caller-driven walk is in progress (suppresses the duration timeout)
    pub manual: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            chance: 0.3,
            min_duration: Duration::from_secs(5),
            max_duration: Duration::from_secs(60),
            speed: 5,
            direction: Direction::Right,
            cooldown: Duration::from_secs(5),
            manual: false,
        }
    }
}

impl WalkConfig {
    /// Set the per-check walk probability, clamped to `[0, 1]`
    pub fn set_chance(&mut self, chance: f64) {
        self.chance = chance.clamp(0.0, 1.0);
    }

    /// Set the walk duration range; the minimum is at least one second
    /// and the maximum never falls below the minimum
    pub fn set_duration_range(&mut self, min: Duration, max: Duration) {
        self.min_duration = min.max(Duration::from_secs(1));
        self.max_duration = max.max(self.min_duration);
    }

    /// Set the horizontal speed, at least one pixel per frame
    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed.max(1);
    }

    /// Set the inter-walk cooldown, at least one second
    pub fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown.max(Duration::from_secs(1));
    }
}

/// Gravity settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallConfig {
    /// Whether the pet falls when nothing supports it
    pub enabled: bool,
    /// Descent in pixels per physics step
    pub speed: i32,
}

impl Default for FallConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 10,
        }
    }
}

/// Rest-reminder settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakConfig {
    pub enabled: bool,
    /// Time between reminders
    pub interval: Duration,
    /// How long the reminder pose is held
    pub duration: Duration,
}

impl Default for BreakConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: Duration::from_secs(60 * 60),
            duration: Duration::from_secs(5 * 60),
        }
    }
}

/// Hydration-reminder settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterConfig {
    pub enabled: bool,
    /// Time between reminders
    pub interval: Duration,
    /// How long the reminder pose is held
    pub duration: Duration,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: Duration::from_secs(60 * 60),
            duration: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn walk_chance_is_clamped() {
        let mut cfg = WalkConfig::default();
        cfg.set_chance(1.7);
        assert_eq!(cfg.chance, 1.0);
        cfg.set_chance(-0.2);
        assert_eq!(cfg.chance, 0.0);
    }

    #[test]
    fn duration_range_keeps_max_above_min() {
        let mut cfg = WalkConfig::default();
        cfg.set_duration_range(Duration::from_secs(20), Duration::from_secs(4));
        assert_eq!(cfg.min_duration, Duration::from_secs(20));
        assert_eq!(cfg.max_duration, Duration::from_secs(20));

        cfg.set_duration_range(Duration::ZERO, Duration::from_secs(10));
        assert_eq!(cfg.min_duration, Duration::from_secs(1));
        assert_eq!(cfg.max_duration, Duration::from_secs(10));
    }

    #[test]
    fn speed_and_cooldown_floors() {
        let mut cfg = WalkConfig::default();
        cfg.set_speed(0);
        assert_eq!(cfg.speed, 1);
        cfg.set_cooldown(Duration::ZERO);
        assert_eq!(cfg.cooldown, Duration::from_secs(1));
    }

    #[test]
    fn reminders_default_disabled() {
        assert!(!BreakConfig::default().enabled);
        assert!(!WaterConfig::default().enabled);
        assert!(FallConfig::default().enabled);
    }
}
