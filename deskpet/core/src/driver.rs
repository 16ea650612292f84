//! Cadence Driver
//!
//! Owns the timing loop. All engine work happens on one task; the
//! intervals below only decide which cadence method runs next, so the
//! engine itself never needs locks.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::trace;

use crate::engine::Pet;
use crate::surface::RenderSurface;

/// Frame pump; well below the shortest frame duration (33ms)
pub const FRAME_PUMP: Duration = Duration::from_millis(10);
/// Automatic state transitions
pub const STATE_CHECK: Duration = Duration::from_millis(500);
/// Gravity checks
pub const PHYSICS: Duration = Duration::from_millis(33);
/// Landing platform refresh
pub const PLATFORM_REFRESH: Duration = Duration::from_secs(1);
/// Rest reminder and Pomodoro countdown
pub const SECONDLY: Duration = Duration::from_secs(1);
/// Hydration reminder
pub const WATER_CHECK: Duration = Duration::from_secs(60);

/// Drive the pet forever. Runs until the surrounding task is cancelled.
pub async fn run<S: RenderSurface>(pet: &mut Pet<S>) {
    let mut frames = interval(FRAME_PUMP);
    let mut state_checks = interval(STATE_CHECK);
    let mut physics = interval(PHYSICS);
    let mut platforms = interval(PLATFORM_REFRESH);
    let mut secondly = interval(SECONDLY);
    let mut water = interval(WATER_CHECK);

    // A stalled tick is stale work, not a backlog to drain.
    for iv in [
        &mut frames,
        &mut state_checks,
        &mut physics,
        &mut platforms,
        &mut secondly,
        &mut water,
    ] {
        iv.set_missed_tick_behavior(MissedTickBehavior::Skip);
    }

    loop {
        tokio::select! {
            _ = frames.tick() => {
                pet.pump_animation();
                pet.poll_deferred();
            }
            _ = state_checks.tick() => {
                trace!("state check");
                pet.check_state_transitions();
            }
            _ = physics.tick() => {
                pet.check_falling();
            }
            _ = platforms.tick() => {
                pet.rebuild_platforms();
            }
            _ = secondly.tick() => {
                pet.check_break_time();
                pet.tick_tomato();
            }
            _ = water.tick() => {
                pet.check_water_time();
            }
        }
    }
}
