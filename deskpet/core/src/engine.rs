//! Pet Engine
//!
//! Single-threaded core tying everything together: the state machine,
//! the frame scheduler, gravity, walking, health reminders and the
//! Pomodoro lock. All mutation happens through the public cadence
//! methods ([`Pet::pump_animation`], [`Pet::check_state_transitions`],
//! [`Pet::check_falling`], ...) and the input handlers; the async driver
//! only decides when to call them.
//!
//! State changes may chain synchronously (a one-frame transition whose
//! successor is itself a transition). The chain depth is capped at
//! [`MAX_TRANSITION_HOPS`]; a validated catalog never reaches the cap.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::animation::{AnimationCatalog, LoopMode, Playback, StepOutcome, MAX_TRANSITION_HOPS};
use crate::config::{BreakConfig, FallConfig, WalkConfig, WaterConfig};
use crate::error::CatalogError;
use crate::events::{MouseButton, MousePress};
use crate::geometry::Point;
use crate::platform::{PlatformKind, PlatformTracker};
use crate::reminder::{ReminderItem, ReminderKind, ReminderQueue};
use crate::state::{Direction, PetState};
use crate::surface::{Capability, RenderSurface, WindowInfo, WindowProbe};
use crate::tomato::{TomatoEvent, TomatoSettings, TomatoState, TomatoTimer};

/// Height of the click-through strip at the window bottom
pub const TRANSPARENT_STRIP_PX: i32 = 20;

/// Fraction of the window height (from the top) that grabs on click
pub const CATCH_ZONE_RATIO: f64 = 0.60;

/// Cooldown applied before the next spontaneous walk after an
/// interruption ends
pub const WALK_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Pause between two queued reminders so the pet visibly idles between
pub const REMINDER_GAP: Duration = Duration::from_secs(1);

/// Idle time without interaction before the pet falls asleep
pub const IDLE_TO_SLEEP_AFTER: Duration = Duration::from_secs(10);

/// Time in the standing pose before the pet sits back down
pub const STAND_TO_IDLE_AFTER: Duration = Duration::from_secs(5);

const FALL_STEP_MS: u64 = 33;

/// Feature flags captured before the Pomodoro lock engages
#[derive(Clone, Copy, Debug)]
struct FeatureSnapshot {
    walk_enabled: bool,
    walk_manual: bool,
    break_enabled: bool,
    water_enabled: bool,
    gesture_enabled: bool,
    music_enabled: bool,
}

/// The desktop pet
pub struct Pet<S: RenderSurface> {
    surface: S,
    catalog: AnimationCatalog,
    playback: Playback,
    state: PetState,

    music_playing: bool,
    music_detection_enabled: bool,

    walk_cfg: WalkConfig,
    fall_cfg: FallConfig,
    break_cfg: BreakConfig,
    water_cfg: WaterConfig,

    next_walk_at: Instant,
    walk_started_at: Instant,
    walk_duration: Duration,

    last_interaction: Instant,
    last_state_change: Instant,
    last_break: Instant,
    last_water: Instant,

    platforms: PlatformTracker,

    reminders: ReminderQueue,
    reminder_finish_at: Option<Instant>,
    reminder_resume_at: Option<Instant>,

    tomato: TomatoTimer,
    tomato_lock: bool,
    pre_tomato: Option<FeatureSnapshot>,
    pending_tomato: Option<TomatoState>,

    drag_offset: Point,

    music_detector: Option<Box<dyn Capability>>,
    gesture_detector: Option<Box<dyn Capability>>,
}

impl<S: RenderSurface> Pet<S> {
    /// Build a pet on the given surface, validating the animation
    /// catalog up front
    pub fn new(surface: S, probe: Box<dyn WindowProbe>) -> Result<Self, CatalogError> {
        let catalog = AnimationCatalog::standard();
        catalog.validate()?;
        let now = Instant::now();
        let mut pet = Self {
            surface,
            catalog,
            playback: Playback::new(),
            state: PetState::Idle,
            music_playing: false,
            music_detection_enabled: true,
            walk_cfg: WalkConfig::default(),
            fall_cfg: FallConfig::default(),
            break_cfg: BreakConfig::default(),
            water_cfg: WaterConfig::default(),
            next_walk_at: now,
            walk_started_at: now,
            walk_duration: Duration::ZERO,
            last_interaction: now,
            last_state_change: now,
            last_break: now,
            last_water: now,
            platforms: PlatformTracker::new(probe),
            reminders: ReminderQueue::new(),
            reminder_finish_at: None,
            reminder_resume_at: None,
            tomato: TomatoTimer::default(),
            tomato_lock: false,
            pre_tomato: None,
            pending_tomato: None,
            drag_offset: Point::default(),
            music_detector: None,
            gesture_detector: None,
        };
        pet.set_state(PetState::Idle);
        Ok(pet)
    }

    pub fn state(&self) -> PetState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // ---- state machine ----

    /// Enter a new state and start its animation
    pub fn set_state(&mut self, state: PetState) {
        self.set_state_inner(state, 0);
    }

    fn set_state_inner(&mut self, new_state: PetState, depth: usize) {
        if depth >= MAX_TRANSITION_HOPS {
            error!(?new_state, limit = MAX_TRANSITION_HOPS, "transition chain too deep, refusing");
            return;
        }
        debug!(from = ?self.state, to = ?new_state, "state change");
        let old_state = self.state;
        self.state = new_state;

        // A fall that interrupted the Pomodoro lock resolves back into
        // the phase that was active when the pet was picked up.
        let mut next_override = None;
        if new_state == PetState::FallEnd && self.tomato_lock {
            if let Some(resume) = self.pending_tomato.take() {
                next_override = Some(Self::tomato_pet_state(resume));
            }
        }

        if new_state == PetState::Stand {
            self.last_state_change = Instant::now();
            if self.walk_cfg.enabled && !self.tomato_lock {
                self.next_walk_at = Instant::now() + WALK_RETRY_DELAY;
            }
            if self.music_playing {
                self.set_state_inner(PetState::StandToDance, depth + 1);
                return;
            }
        }

        if old_state == PetState::Awakening
            && new_state == PetState::Idle
            && self.music_playing
        {
            self.set_state_inner(PetState::IdleToStand, depth + 1);
            return;
        }

        if matches!(new_state, PetState::Idle | PetState::Stand) {
            self.last_interaction = Instant::now();
        }

        self.playback.stop();

        let mut spec = match self.catalog.get(new_state) {
            Some(spec) => spec.clone(),
            None => {
                warn!(?new_state, "no animation entry, showing fallback frame");
                if let Err(err) = self
                    .surface
                    .update_frame(self.catalog.fallback_frame(), false)
                {
                    error!(error = %err, "fallback frame rejected");
                }
                return;
            }
        };
        if let Some(next) = next_override {
            spec.next_state = Some(next);
        }
        let frame_count = spec.frame_count;
        let duration_ms = spec.frame_duration_ms;
        let loops = spec.loops;
        let chained_next = spec.next_state;
        self.playback.begin(spec);
        self.push_current_frame(false);

        if (frame_count > 1 && duration_ms > 0) || new_state == PetState::Fall {
            let ms = if duration_ms > 0 { duration_ms } else { FALL_STEP_MS };
            self.playback.start_ticking(Duration::from_millis(ms));
        } else if loops == LoopMode::Once {
            // Single-frame transition; nothing to animate, advance now.
            if let Some(next) = chained_next {
                self.set_state_inner(next, depth + 1);
            }
        }
    }

    fn push_current_frame(&mut self, flip: bool) {
        let Some(frame) = self.playback.current_frame() else {
            return;
        };
        if let Err(err) = self.surface.update_frame(frame, flip) {
            warn!(error = %err, "frame rejected, substituting fallback");
            if let Err(err) = self.surface.update_frame(self.catalog.fallback_frame(), flip) {
                error!(error = %err, "fallback frame rejected");
            }
        }
    }

    const fn tomato_pet_state(state: TomatoState) -> PetState {
        match state {
            TomatoState::Working => PetState::TomatoWorking,
            TomatoState::Resting => PetState::TomatoResting,
            TomatoState::Completed => PetState::TomatoCompleted,
            TomatoState::Idle => PetState::Idle,
        }
    }

    // ---- frame pump ----

    /// Advance the animation if its next frame is due. Driven at a
    /// cadence well below the shortest frame duration.
    pub fn pump_animation(&mut self) {
        if self.playback.due() {
            self.tick_animation();
        }
    }

    /// Unconditionally advance one animation step
    pub fn tick_animation(&mut self) {
        if self.state == PetState::Fall {
            self.fall_step();
            return;
        }
        match self.playback.step() {
            StepOutcome::Completed { next: Some(next) } => self.set_state(next),
            StepOutcome::Completed { next: None } | StepOutcome::Stopped => {}
            StepOutcome::Frame(_) => {
                let mut flip = self
                    .playback
                    .spec()
                    .is_some_and(|spec| spec.flip_horizontal);
                if self.state.is_walk_family() {
                    flip = self.walk_cfg.direction == Direction::Left;
                    if self.state == PetState::Walk && self.walk_step() {
                        return;
                    }
                }
                self.push_current_frame(flip);
            }
        }
    }

    /// Move one walking step; returns true when the screen edge ended
    /// the walk
    fn walk_step(&mut self) -> bool {
        let pos = self.surface.position();
        let size = self.surface.size();
        let screen = self.platforms.screen();
        let new_x = match self.walk_cfg.direction {
            Direction::Left => pos.x - self.walk_cfg.speed,
            Direction::Right => pos.x + self.walk_cfg.speed,
        };
        let hit_edge = match self.walk_cfg.direction {
            Direction::Right => new_x > screen.right() - size.width,
            Direction::Left => new_x < screen.x,
        };
        if hit_edge {
            self.set_state(PetState::WalkEnd);
            return true;
        }
        self.surface.move_to(Point::new(new_x, pos.y));
        false
    }

    // ---- gravity ----

    fn fall_step(&mut self) {
        let pos = self.surface.position();
        let size = self.surface.size();
        let new_y = pos.y + self.fall_cfg.speed;

        // Landing test against the band the pet crosses this step.
        let mut landing_y = None;
        for platform in self.platforms.platforms() {
            if new_y + size.height >= platform.rect.y
                && pos.y + size.height < platform.rect.y
                && platform.rect.overlaps_horizontally(pos.x, size.width)
            {
                landing_y = Some(platform.rect.y - size.height);
                break;
            }
        }
        if let Some(y) = landing_y {
            self.surface.move_to(Point::new(pos.x, y));
            self.finish_fall();
            return;
        }

        let screen = self.platforms.screen();
        if new_y + size.height > screen.bottom() {
            self.surface
                .move_to(Point::new(pos.x, screen.bottom() - size.height));
            self.finish_fall();
            return;
        }

        self.surface.move_to(Point::new(pos.x, new_y));
    }

    fn finish_fall(&mut self) {
        if self.tomato_lock {
            self.resume_tomato_state();
        } else {
            self.set_state(PetState::FallEnd);
        }
    }

    fn resume_tomato_state(&mut self) {
        self.set_state(Self::tomato_pet_state(self.tomato.state()));
    }

    /// Fall check for the moment the pet is dropped: still in Catch, so
    /// the periodic check's Catch exclusion does not apply. Enters Fall
    /// and returns true when there is no platform under the feet.
    fn drop_starts_fall(&mut self) -> bool {
        if !self.fall_cfg.enabled {
            return false;
        }
        let pos = self.surface.position();
        let size = self.surface.size();
        if self.platforms.platform_under(pos, size).is_some() {
            return false;
        }
        self.set_state(PetState::Fall);
        true
    }

    /// Start or resolve falling. Returns true while the pet is airborne.
    pub fn check_falling(&mut self) -> bool {
        if !self.fall_cfg.enabled {
            return false;
        }
        let pos = self.surface.position();
        let size = self.surface.size();
        let landing_y = self
            .platforms
            .platform_under(pos, size)
            .map(|p| p.rect.y - size.height);

        if self.state == PetState::Fall {
            if let Some(y) = landing_y {
                // Rest exactly atop the platform, not within the
                // tolerance band.
                self.surface.move_to(Point::new(pos.x, y));
                self.finish_fall();
                return false;
            }
            return true;
        }

        if landing_y.is_none() && self.state != PetState::Catch {
            // Let exit animations finish before gravity takes over.
            let exempt = matches!(
                self.state,
                PetState::StandToIdle
                    | PetState::WalkEnd
                    | PetState::DanceToStand
                    | PetState::Awakening
                    | PetState::FallEnd
            );
            if !exempt {
                self.set_state(PetState::Fall);
                return true;
            }
        }
        false
    }

    // ---- periodic checks ----

    /// Time-based automatic transitions: music resumption, gravity,
    /// spontaneous walks, idle/stand timeouts, hydration
    pub fn check_state_transitions(&mut self) {
        if self.state == PetState::Fall {
            return;
        }

        let music_excluded = matches!(
            self.state,
            PetState::Fall
                | PetState::Catch
                | PetState::TomatoWorking
                | PetState::TomatoResting
                | PetState::TomatoBreak
                | PetState::Break
                | PetState::Drink
                | PetState::DrinkLoop
                | PetState::Dance
                | PetState::StandToDance
                | PetState::IdleToStand
        );
        if self.music_detection_enabled && self.music_playing && !music_excluded {
            match self.state {
                PetState::Stand => {
                    self.set_state(PetState::StandToDance);
                    return;
                }
                PetState::Idle => {
                    self.set_state(PetState::IdleToStand);
                    return;
                }
                state if state.is_walk_family() => {
                    self.set_state(PetState::StandToDance);
                    return;
                }
                _ => {}
            }
        }

        self.check_falling();

        if !self.walk_cfg.manual {
            if self.walk_cfg.enabled
                && matches!(self.state, PetState::Idle | PetState::Sleep)
            {
                let now = Instant::now();
                if now >= self.next_walk_at
                    && rand::thread_rng().gen_bool(self.walk_cfg.chance.clamp(0.0, 1.0))
                {
                    if self.state == PetState::Sleep {
                        self.set_state(PetState::Awakening);
                        return;
                    }
                    let mut rng = rand::thread_rng();
                    let direction = if rng.gen_bool(0.5) {
                        Direction::Left
                    } else {
                        Direction::Right
                    };
                    let secs = rng.gen_range(
                        self.walk_cfg.min_duration.as_secs_f64()
                            ..=self.walk_cfg.max_duration.as_secs_f64(),
                    );
                    self.walk_duration = Duration::from_secs_f64(secs);
                    self.walk_started_at = now;
                    self.walk_cfg.direction = direction;
                    self.walk_cfg.manual = false;
                    info!(?direction, seconds = secs, "starting spontaneous walk");
                    self.set_state(PetState::WalkBegin);
                    return;
                }
            } else if self.state == PetState::Walk
                && self.walk_started_at.elapsed() >= self.walk_duration
            {
                self.stop_walking();
                return;
            }
        }

        match self.state {
            PetState::Idle if self.last_interaction.elapsed() > IDLE_TO_SLEEP_AFTER => {
                self.set_state(PetState::Sleep);
            }
            PetState::Stand if self.last_state_change.elapsed() > STAND_TO_IDLE_AFTER => {
                self.set_state(PetState::StandToIdle);
            }
            _ => {}
        }

        self.check_water_time();
    }

    /// Refresh the landing surfaces from the window probe
    pub fn rebuild_platforms(&mut self) {
        self.platforms.rebuild();
    }

    // ---- mouse input ----

    pub fn handle_mouse_press(&mut self, press: MousePress) {
        let pos = self.surface.position();
        let size = self.surface.size();
        let drag_area_height = size.height - TRANSPARENT_STRIP_PX;
        let catch_zone_end = (f64::from(size.height) * CATCH_ZONE_RATIO) as i32;

        self.drag_offset = Point::new(press.global.x - pos.x, press.global.y - pos.y);

        if self.tomato_lock {
            // Only dragging is allowed while locked.
            if press.button == MouseButton::Left && press.pos.y < catch_zone_end {
                self.set_state(PetState::Catch);
            }
            return;
        }

        self.last_interaction = Instant::now();

        if self.state == PetState::Fall {
            if press.pos.y < drag_area_height {
                self.set_state(PetState::Catch);
            }
            return;
        }

        if press.pos.y >= drag_area_height {
            // Click-through strip.
            return;
        }
        if press.pos.y < catch_zone_end {
            self.set_state(PetState::Catch);
        } else {
            match self.state {
                PetState::Sleep => self.set_state(PetState::Awakening),
                PetState::Idle => self.set_state(PetState::IdleToStand),
                PetState::Stand => self.set_state(PetState::StandToIdle),
                PetState::Walk | PetState::WalkBegin => self.set_state(PetState::WalkEnd),
                _ => {}
            }
        }
    }

    pub fn handle_mouse_move(&mut self, global: Point, left_held: bool) {
        if !left_held {
            return;
        }
        self.last_interaction = Instant::now();
        self.surface.move_to(Point::new(
            global.x - self.drag_offset.x,
            global.y - self.drag_offset.y,
        ));
    }

    pub fn handle_mouse_release(&mut self, button: MouseButton) {
        if self.tomato_lock {
            if button == MouseButton::Left && self.state == PetState::Catch {
                if self.drop_starts_fall() {
                    // Resume the Pomodoro phase once the fall lands.
                    self.pending_tomato = Some(self.tomato.state());
                } else {
                    self.resume_tomato_state();
                }
            }
            return;
        }

        if button == MouseButton::Left && self.state == PetState::Catch {
            self.last_interaction = Instant::now();
            if self.drop_starts_fall() {
                return;
            }
            let pos = self.surface.position();
            let size = self.surface.size();
            let on_background_window = self
                .platforms
                .platform_under(pos, size)
                .is_some_and(|p| p.kind == PlatformKind::Window && !p.is_top_window);
            if on_background_window {
                self.set_state(PetState::Idle);
                return;
            }
            if self.music_detection_enabled && self.music_playing {
                self.set_state(PetState::IdleToStand);
            } else {
                self.set_state(PetState::Idle);
            }
        }
    }

    /// Press at a desktop coordinate, used by gesture recognition
    pub fn handle_press_at(&mut self, global: Point) {
        let pos = self.surface.position();
        let size = self.surface.size();
        let inside = global.x >= pos.x
            && global.x <= pos.x + size.width
            && global.y >= pos.y
            && global.y <= pos.y + size.height;
        if !inside {
            return;
        }
        let rel = Point::new(global.x - pos.x, global.y - pos.y);
        self.drag_offset = rel;
        self.last_interaction = Instant::now();

        let on_background_window = self
            .platforms
            .platform_under(pos, size)
            .is_some_and(|p| p.kind == PlatformKind::Window && !p.is_top_window);
        if on_background_window {
            return;
        }

        if self.state == PetState::Fall {
            self.set_state(PetState::Catch);
            return;
        }

        let drag_area_height = size.height - TRANSPARENT_STRIP_PX;
        let catch_zone_end = (f64::from(size.height) * CATCH_ZONE_RATIO) as i32;
        if rel.y >= drag_area_height {
            return;
        }
        if rel.y < catch_zone_end {
            self.set_state(PetState::Catch);
        } else {
            match self.state {
                PetState::Sleep => self.set_state(PetState::Awakening),
                PetState::Idle => self.set_state(PetState::IdleToStand),
                PetState::Stand => self.set_state(PetState::StandToIdle),
                PetState::Walk | PetState::WalkBegin => self.set_state(PetState::WalkEnd),
                _ => {}
            }
        }
    }

    // ---- walking ----

    pub fn walk_config(&self) -> &WalkConfig {
        &self.walk_cfg
    }

    pub fn walk_config_mut(&mut self) -> &mut WalkConfig {
        &mut self.walk_cfg
    }

    pub fn fall_config_mut(&mut self) -> &mut FallConfig {
        &mut self.fall_cfg
    }

    /// Steer a walk, honoring the inter-walk cooldown. Starts a walk
    /// from idle or standing; mid-walk it only changes direction.
    pub fn set_walk_direction(&mut self, direction: Direction) {
        if self.tomato_lock {
            return;
        }
        let now = Instant::now();
        if now < self.next_walk_at {
            debug!("walk cooldown active");
            return;
        }
        if self.state == PetState::Walk {
            self.walk_cfg.direction = direction;
            self.walk_cfg.manual = true;
            return;
        }
        if matches!(self.state, PetState::Idle | PetState::Stand) {
            self.walk_cfg.direction = direction;
            self.walk_cfg.manual = true;
            self.walk_started_at = now;
            self.set_state(PetState::WalkBegin);
        }
    }

    /// Start walking immediately, skipping the cooldown
    pub fn start_walking(&mut self, direction: Direction) {
        self.walk_cfg.direction = direction;
        self.walk_cfg.manual = true;
        self.walk_started_at = Instant::now();
        self.set_state(PetState::WalkBegin);
    }

    /// End the current walk and arm the cooldown
    pub fn stop_walking(&mut self) {
        if matches!(self.state, PetState::Walk | PetState::WalkBegin) {
            self.set_state(PetState::WalkEnd);
            self.next_walk_at = Instant::now() + self.walk_cfg.cooldown;
            self.walk_cfg.manual = false;
        }
    }

    // ---- health reminders ----

    pub fn set_break_enabled(&mut self, enabled: bool) {
        self.break_cfg.enabled = enabled;
        if enabled {
            self.last_break = Instant::now();
        }
    }

    pub fn set_break_interval(&mut self, interval: Duration) {
        self.break_cfg.interval = interval;
        self.last_break = Instant::now();
    }

    pub fn set_break_duration(&mut self, duration: Duration) {
        self.break_cfg.duration = duration;
    }

    pub fn set_water_enabled(&mut self, enabled: bool) {
        self.water_cfg.enabled = enabled;
        if enabled {
            self.last_water = Instant::now();
        }
    }

    pub fn set_water_interval(&mut self, interval: Duration) {
        self.water_cfg.interval = interval;
        if self.water_cfg.enabled {
            self.last_water = Instant::now();
        }
    }

    pub fn set_water_duration(&mut self, duration: Duration) {
        self.water_cfg.duration = duration;
    }

    /// Queue a rest reminder when the interval has elapsed. Driven on a
    /// one-second cadence.
    pub fn check_break_time(&mut self) {
        if !self.break_cfg.enabled {
            return;
        }
        if self.last_break.elapsed() >= self.break_cfg.interval
            && !matches!(self.state, PetState::Break | PetState::TomatoResting)
        {
            self.last_break = Instant::now();
            self.enqueue_reminder(ReminderItem {
                kind: ReminderKind::Break,
                target: PetState::Break,
                duration: self.break_cfg.duration,
            });
        }
    }

    /// Queue a hydration reminder when the interval has elapsed
    pub fn check_water_time(&mut self) {
        if !self.water_cfg.enabled {
            return;
        }
        if self.last_water.elapsed() >= self.water_cfg.interval {
            self.last_water = Instant::now();
            self.enqueue_reminder(ReminderItem {
                kind: ReminderKind::Water,
                target: PetState::Drink,
                duration: self.water_cfg.duration,
            });
        }
    }

    fn enqueue_reminder(&mut self, item: ReminderItem) {
        info!(kind = ?item.kind, "reminder queued");
        self.reminders.enqueue(item);
        if !self.reminders.is_active() {
            self.process_next_reminder();
        }
    }

    fn process_next_reminder(&mut self) {
        let Some(item) = self.reminders.pop_next() else {
            self.reminders.set_active(false);
            return;
        };
        self.reminders.set_active(true);
        self.reminder_finish_at = Some(Instant::now() + item.duration);
        self.set_state(item.target);
    }

    fn finish_reminder(&mut self) {
        self.set_state(PetState::Idle);
        if self.walk_cfg.enabled && !self.tomato_lock {
            self.next_walk_at = Instant::now() + WALK_RETRY_DELAY;
        }
        self.reminder_resume_at = Some(Instant::now() + REMINDER_GAP);
    }

    /// Fire due one-shot deadlines (reminder end, inter-reminder gap).
    /// Driven from the frame pump.
    pub fn poll_deferred(&mut self) {
        if let Some(at) = self.reminder_finish_at {
            if Instant::now() >= at {
                self.reminder_finish_at = None;
                self.finish_reminder();
            }
        }
        if let Some(at) = self.reminder_resume_at {
            if Instant::now() >= at {
                self.reminder_resume_at = None;
                self.process_next_reminder();
            }
        }
    }

    // ---- music ----

    pub fn set_music_detector(&mut self, detector: Box<dyn Capability>) {
        self.music_detector = Some(detector);
    }

    pub fn set_gesture_detector(&mut self, detector: Box<dyn Capability>) {
        self.gesture_detector = Some(detector);
    }

    pub fn set_music_detection_enabled(&mut self, enabled: bool) {
        self.music_detection_enabled = enabled;
        if let Some(detector) = &mut self.music_detector {
            if enabled {
                detector.enable();
            } else {
                detector.disable();
            }
        }
        if !enabled && self.state == PetState::Dance {
            self.set_state(PetState::DanceToStand);
        }
    }

    /// React to a change in detected music playback
    pub fn update_music_state(&mut self, playing: bool) {
        if !self.music_detection_enabled {
            return;
        }
        // Mid-fall or mid-drag only the flag updates.
        if matches!(self.state, PetState::Fall | PetState::Catch) {
            self.music_playing = playing;
            return;
        }
        let excluded = matches!(
            self.state,
            PetState::TomatoWorking
                | PetState::TomatoBreak
                | PetState::TomatoResting
                | PetState::Break
                | PetState::Drink
                | PetState::DrinkLoop
        );
        self.music_playing = playing;

        if playing {
            if !excluded {
                match self.state {
                    PetState::Idle => self.set_state(PetState::IdleToStand),
                    PetState::Sleep => self.set_state(PetState::Awakening),
                    PetState::Stand => self.set_state(PetState::StandToDance),
                    state if state.is_walk_family() => {
                        self.set_state(PetState::StandToDance);
                    }
                    _ => {}
                }
            }
        } else if self.state == PetState::Dance {
            if self.walk_cfg.enabled && !self.tomato_lock {
                self.next_walk_at = Instant::now() + WALK_RETRY_DELAY;
            }
            self.set_state(PetState::DanceToStand);
        }
    }

    // ---- Pomodoro ----

    pub fn is_tomato_locked(&self) -> bool {
        self.tomato_lock
    }

    pub fn tomato_state(&self) -> TomatoState {
        self.tomato.state()
    }

    pub fn tomato_settings(&self) -> TomatoSettings {
        self.tomato.settings()
    }

    pub fn tomato_progress(&self) -> (u32, u32) {
        self.tomato.progress()
    }

    pub fn tomato_formatted_time(&self) -> String {
        self.tomato.formatted_time()
    }

    pub fn configure_tomato(&mut self, settings: TomatoSettings) {
        let events = self.tomato.configure(settings);
        self.apply_tomato_events(&events);
    }

    /// Start the Pomodoro cycle, snapshotting and disabling the optional
    /// behaviors for the duration of the lock
    pub fn start_tomato(&mut self) {
        self.save_pre_tomato();
        self.enter_tomato_lock();
        let events = self.tomato.start();
        self.apply_tomato_events(&events);
        self.surface.show_timer_overlay();
    }

    pub fn pause_tomato(&mut self) {
        self.tomato.pause();
    }

    pub fn resume_tomato(&mut self) {
        self.tomato.resume();
    }

    /// Abandon the cycle; the lock releases and the saved feature flags
    /// come back
    pub fn reset_tomato(&mut self) {
        let events = self.tomato.reset();
        self.apply_tomato_events(&events);
    }

    /// Advance the Pomodoro countdown one second
    pub fn tick_tomato(&mut self) {
        let events = self.tomato.tick();
        self.apply_tomato_events(&events);
    }

    fn apply_tomato_events(&mut self, events: &[TomatoEvent]) {
        for event in events {
            match *event {
                TomatoEvent::StateChanged(state) => self.on_tomato_state_changed(state),
                TomatoEvent::TimeUpdated(_) => {
                    let text = self.tomato.formatted_time();
                    self.surface.update_timer_display(&text);
                }
                TomatoEvent::TomatoCompleted => {
                    let (current, total) = self.tomato.progress();
                    self.surface.update_progress_display(current, total);
                    self.surface.show_progress_overlay();
                }
                TomatoEvent::AllCompleted => {
                    self.set_state(PetState::TomatoCompleted);
                }
            }
        }
    }

    fn on_tomato_state_changed(&mut self, state: TomatoState) {
        match state {
            TomatoState::Working | TomatoState::Resting => {
                if !self.tomato_lock {
                    self.save_pre_tomato();
                    self.enter_tomato_lock();
                }
                self.set_state(Self::tomato_pet_state(state));
            }
            TomatoState::Completed | TomatoState::Idle => {
                self.exit_tomato_lock();
                self.set_state(Self::tomato_pet_state(state));
                self.surface.hide_timer_overlay();
                self.surface.hide_progress_overlay();
            }
        }
    }

    fn save_pre_tomato(&mut self) {
        self.pre_tomato = Some(FeatureSnapshot {
            walk_enabled: self.walk_cfg.enabled,
            walk_manual: self.walk_cfg.manual,
            break_enabled: self.break_cfg.enabled,
            water_enabled: self.water_cfg.enabled,
            gesture_enabled: self
                .gesture_detector
                .as_ref()
                .is_some_and(|d| d.is_enabled()),
            music_enabled: self
                .music_detector
                .as_ref()
                .is_some_and(|d| d.is_enabled()),
        });
    }

    fn enter_tomato_lock(&mut self) {
        self.walk_cfg.enabled = false;
        self.break_cfg.enabled = false;
        self.water_cfg.enabled = false;
        if let Some(detector) = &mut self.gesture_detector {
            detector.disable();
        }
        if let Some(detector) = &mut self.music_detector {
            detector.disable();
        }
        if self.state == PetState::Dance {
            self.set_state(PetState::DanceToStand);
        }
        if matches!(self.state, PetState::Walk | PetState::WalkBegin) {
            self.stop_walking();
        }
        self.tomato_lock = true;
        info!("pomodoro lock engaged");
    }

    fn exit_tomato_lock(&mut self) {
        let Some(snapshot) = self.pre_tomato.take() else {
            return;
        };
        self.walk_cfg.enabled = snapshot.walk_enabled;
        self.walk_cfg.manual = snapshot.walk_manual;
        if self.walk_cfg.enabled {
            self.next_walk_at = Instant::now() + WALK_RETRY_DELAY;
        }
        self.break_cfg.enabled = snapshot.break_enabled;
        self.water_cfg.enabled = snapshot.water_enabled;
        if snapshot.gesture_enabled {
            if let Some(detector) = &mut self.gesture_detector {
                detector.enable();
            }
        }
        if snapshot.music_enabled {
            if let Some(detector) = &mut self.music_detector {
                detector.enable();
            }
        }
        self.tomato_lock = false;
        info!("pomodoro lock released");
    }

    // ---- landing platforms ----

    pub fn platform_tracker(&self) -> &PlatformTracker {
        &self.platforms
    }

    pub fn add_window_pattern(
        &mut self,
        title: impl Into<String>,
        class_pattern: Option<String>,
    ) -> bool {
        self.platforms.add_pattern(title, class_pattern)
    }

    pub fn remove_window_pattern(&mut self, title: &str) {
        self.platforms.remove_pattern(title);
    }

    pub fn clear_window_patterns(&mut self) {
        self.platforms.clear_patterns();
    }

    pub fn visible_windows(&self) -> Vec<WindowInfo> {
        self.platforms.visible_windows()
    }
}
