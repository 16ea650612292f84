//! Reminder Queue
//!
//! Health reminders can fire while another reminder is still showing.
//! Instead of fighting over the pet, they line up: hydration reminders
//! jump to the front of the queue, rest reminders join the back, and at
//! most one reminder is active at a time. The engine drains the queue,
//! inserting a short grace pause between consecutive reminders so the
//! pet visibly returns to idle in between.

use std::collections::VecDeque;
use std::time::Duration;

use crate::state::PetState;

/// Which reminder fired
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReminderKind {
    Break,
    Water,
}

/// A reminder waiting to be shown
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReminderItem {
    pub kind: ReminderKind,
    /// State the pet enters while the reminder shows
    pub target: PetState,
    /// How long the reminder pose is held
    pub duration: Duration,
}

/// FIFO of pending reminders with priority insertion for water
#[derive(Debug, Default)]
pub struct ReminderQueue {
    queue: VecDeque<ReminderItem>,
    active: bool,
}

impl ReminderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reminder. Water goes to the front; everything else waits
    /// its turn.
    pub fn enqueue(&mut self, item: ReminderItem) {
        match item.kind {
            ReminderKind::Water => self.queue.push_front(item),
            ReminderKind::Break => self.queue.push_back(item),
        }
    }

    /// Take the next reminder to show
    pub fn pop_next(&mut self) -> Option<ReminderItem> {
        self.queue.pop_front()
    }

    /// Whether a reminder is currently showing
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Pending reminders, not counting the active one
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop everything queued and clear the active flag
    pub fn clear(&mut self) {
        self.queue.clear();
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn break_item() -> ReminderItem {
        ReminderItem {
            kind: ReminderKind::Break,
            target: PetState::Break,
            duration: Duration::from_secs(300),
        }
    }

    fn water_item() -> ReminderItem {
        ReminderItem {
            kind: ReminderKind::Water,
            target: PetState::Drink,
            duration: Duration::from_secs(60),
        }
    }

    #[test]
    fn water_preempts_queued_breaks() {
        let mut queue = ReminderQueue::new();
        queue.enqueue(break_item());
        queue.enqueue(break_item());
        queue.enqueue(water_item());
        assert_eq!(queue.pop_next().unwrap().kind, ReminderKind::Water);
        assert_eq!(queue.pop_next().unwrap().kind, ReminderKind::Break);
        assert_eq!(queue.pop_next().unwrap().kind, ReminderKind::Break);
        assert_eq!(queue.pop_next(), None);
    }

    #[test]
    fn breaks_keep_arrival_order() {
        let mut queue = ReminderQueue::new();
        let mut first = break_item();
        first.duration = Duration::from_secs(1);
        queue.enqueue(first.clone());
        queue.enqueue(break_item());
        assert_eq!(queue.pop_next(), Some(first));
    }

    #[test]
    fn clear_resets_active() {
        let mut queue = ReminderQueue::new();
        queue.enqueue(water_item());
        queue.set_active(true);
        queue.clear();
        assert!(!queue.is_active());
        assert_eq!(queue.pending(), 0);
    }
}
