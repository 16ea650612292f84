//! Pomodoro Timer
//!
//! A work/rest cycle counter ticked once per second by the driver. The
//! timer never touches the pet directly; every mutation returns the
//! [`TomatoEvent`]s it produced and the engine dispatches them. That
//! keeps the timer a plain state machine with no back-reference into
//! the engine.

use serde::{Deserialize, Serialize};

/// Phase of the Pomodoro cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TomatoState {
    Idle,
    Working,
    Resting,
    Completed,
}

/// Something the timer wants the engine to react to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TomatoEvent {
    /// The phase changed
    StateChanged(TomatoState),
    /// One second elapsed; remaining seconds in the current phase
    TimeUpdated(u64),
    /// A work or rest period finished; progress displays should refresh
    TomatoCompleted,
    /// Every configured cycle is done
    AllCompleted,
}

/// Pomodoro settings as a plain value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomatoSettings {
    pub work_minutes: u32,
    pub rest_minutes: u32,
    pub total_tomatoes: u32,
}

impl Default for TomatoSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            rest_minutes: 5,
            total_tomatoes: 4,
        }
    }
}

/// The Pomodoro state machine
#[derive(Debug)]
pub struct TomatoTimer {
    settings: TomatoSettings,
    state: TomatoState,
    current_tomato: u32,
    completed_tomatoes: u32,
    remaining_seconds: u64,
    running: bool,
    paused: bool,
}

impl Default for TomatoTimer {
    fn default() -> Self {
        Self::new(TomatoSettings::default())
    }
}

impl TomatoTimer {
    pub fn new(settings: TomatoSettings) -> Self {
        Self {
            settings,
            state: TomatoState::Idle,
            current_tomato: 0,
            completed_tomatoes: 0,
            remaining_seconds: 0,
            running: false,
            paused: false,
        }
    }

    /// Replace the settings and reset to idle
    pub fn configure(&mut self, settings: TomatoSettings) -> Vec<TomatoEvent> {
        self.settings = settings;
        self.reset()
    }

    /// Begin the first work period. A no-op unless idle.
    pub fn start(&mut self) -> Vec<TomatoEvent> {
        if self.state != TomatoState::Idle {
            return Vec::new();
        }
        self.current_tomato = 0;
        self.completed_tomatoes = 0;
        let mut events = self.start_work_period();
        events.push(TomatoEvent::TomatoCompleted);
        events
    }

    /// Freeze the countdown
    pub fn pause(&mut self) {
        if self.running && !self.paused {
            self.running = false;
            self.paused = true;
        }
    }

    /// Continue a paused countdown
    pub fn resume(&mut self) {
        if self.paused {
            self.running = true;
            self.paused = false;
        }
    }

    /// Abandon the cycle and return to idle
    pub fn reset(&mut self) -> Vec<TomatoEvent> {
        self.state = TomatoState::Idle;
        self.current_tomato = 0;
        self.completed_tomatoes = 0;
        self.remaining_seconds = 0;
        self.running = false;
        self.paused = false;
        vec![TomatoEvent::StateChanged(self.state)]
    }

    fn start_work_period(&mut self) -> Vec<TomatoEvent> {
        self.state = TomatoState::Working;
        self.remaining_seconds = u64::from(self.settings.work_minutes) * 60;
        self.running = true;
        vec![TomatoEvent::StateChanged(self.state)]
    }

    fn start_rest_period(&mut self) -> Vec<TomatoEvent> {
        self.state = TomatoState::Resting;
        self.remaining_seconds = u64::from(self.settings.rest_minutes) * 60;
        self.running = true;
        vec![TomatoEvent::StateChanged(self.state)]
    }

    /// Advance one second. Called by the driver on its secondly cadence;
    /// does nothing while idle, paused or completed.
    pub fn tick(&mut self) -> Vec<TomatoEvent> {
        if !self.running || self.remaining_seconds == 0 {
            return Vec::new();
        }
        self.remaining_seconds -= 1;
        let mut events = vec![TomatoEvent::TimeUpdated(self.remaining_seconds)];
        if self.remaining_seconds > 0 {
            return events;
        }

        match self.state {
            TomatoState::Working => {
                self.current_tomato += 1;
                if self.current_tomato >= self.settings.total_tomatoes {
                    self.running = false;
                    self.state = TomatoState::Completed;
                    self.completed_tomatoes = self.settings.total_tomatoes;
                    events.push(TomatoEvent::StateChanged(self.state));
                    events.push(TomatoEvent::AllCompleted);
                } else {
                    events.extend(self.start_rest_period());
                    events.push(TomatoEvent::TomatoCompleted);
                }
            }
            TomatoState::Resting => {
                self.completed_tomatoes = self.current_tomato;
                events.extend(self.start_work_period());
                events.push(TomatoEvent::TomatoCompleted);
            }
            TomatoState::Idle | TomatoState::Completed => {}
        }
        events
    }

    pub fn state(&self) -> TomatoState {
        self.state
    }

    pub fn settings(&self) -> TomatoSettings {
        self.settings
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Remaining time in the current phase, formatted `MM:SS`
    pub fn formatted_time(&self) -> String {
        let minutes = self.remaining_seconds / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{minutes:02}:{seconds:02}")
    }

    /// `(current, total)` for the progress display. During rest the
    /// just-finished cycle is shown, not the upcoming one.
    pub fn progress(&self) -> (u32, u32) {
        match self.state {
            TomatoState::Idle => (0, self.settings.total_tomatoes),
            TomatoState::Resting => (self.current_tomato, self.settings.total_tomatoes),
            _ => (self.current_tomato + 1, self.settings.total_tomatoes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn short_timer() -> TomatoTimer {
        // One-minute periods keep the tick loops small.
        TomatoTimer::new(TomatoSettings {
            work_minutes: 1,
            rest_minutes: 1,
            total_tomatoes: 2,
        })
    }

    fn drain(timer: &mut TomatoTimer, seconds: u64) -> Vec<TomatoEvent> {
        let mut last = Vec::new();
        for _ in 0..seconds {
            last = timer.tick();
        }
        last
    }

    #[test]
    fn start_only_from_idle() {
        let mut timer = short_timer();
        let events = timer.start();
        assert_eq!(events[0], TomatoEvent::StateChanged(TomatoState::Working));
        assert_eq!(timer.state(), TomatoState::Working);
        assert!(timer.start().is_empty());
    }

    #[test]
    fn work_rolls_into_rest_then_work() {
        let mut timer = short_timer();
        timer.start();
        let events = drain(&mut timer, 60);
        assert!(events.contains(&TomatoEvent::StateChanged(TomatoState::Resting)));
        assert!(events.contains(&TomatoEvent::TomatoCompleted));
        assert_eq!(timer.progress(), (1, 2));

        let events = drain(&mut timer, 60);
        assert!(events.contains(&TomatoEvent::StateChanged(TomatoState::Working)));
        assert_eq!(timer.progress(), (2, 2));
    }

    #[test]
    fn final_work_period_completes_everything() {
        let mut timer = short_timer();
        timer.start();
        drain(&mut timer, 120); // first work + rest
        let events = drain(&mut timer, 60); // second (final) work
        assert!(events.contains(&TomatoEvent::StateChanged(TomatoState::Completed)));
        assert!(events.contains(&TomatoEvent::AllCompleted));
        assert_eq!(timer.state(), TomatoState::Completed);
        // The completed timer no longer ticks.
        assert!(timer.tick().is_empty());
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut timer = short_timer();
        timer.start();
        timer.tick();
        let frozen = timer.formatted_time();
        timer.pause();
        timer.pause();
        assert!(timer.tick().is_empty());
        assert_eq!(timer.formatted_time(), frozen);
        timer.resume();
        timer.resume();
        assert_eq!(timer.tick(), vec![TomatoEvent::TimeUpdated(58)]);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut timer = short_timer();
        timer.start();
        drain(&mut timer, 30);
        let events = timer.reset();
        assert_eq!(events, vec![TomatoEvent::StateChanged(TomatoState::Idle)]);
        assert_eq!(timer.progress(), (0, 2));
        assert_eq!(timer.formatted_time(), "00:00");
    }

    #[test]
    fn formatted_time_pads_to_two_digits() {
        let mut timer = TomatoTimer::new(TomatoSettings {
            work_minutes: 25,
            ..TomatoSettings::default()
        });
        timer.start();
        assert_eq!(timer.formatted_time(), "25:00");
        timer.tick();
        assert_eq!(timer.formatted_time(), "24:59");
    }
}
