//! Bounded FIFO of timestamped control events plus an idle-time tracker.
//!
//! `poll` produces, `do_events` drains. The queue also remembers when it
//! last saw user activity so the UI can time out back to its default view.
//!
//! Overflow policy: **reject new**. A full queue keeps its contents and
//! order intact and `push` returns `Error::QueueFull`.

use heapless::Deque;

use crate::config::EVENT_QUEUE_CAPACITY;
use crate::error::Error;

/// Kind of control an event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlType {
    Switch,
    Pot,
}

/// One control event.
///
/// For `ControlType::Switch` the payload is:
/// ```text
/// 0                 fresh press
/// >= LONG_PRESS_MS  long / very long press notification (elapsed ms)
/// held_ms + 1       release, with the total hold duration
/// ```
/// Other control types define their own payload; always branch on
/// `control` before reading `data`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event {
    pub control: ControlType,
    pub id: u8,
    pub data: u32,
}

impl Event {
    pub const fn switch(id: u8, data: u32) -> Self {
        Self {
            control: ControlType::Switch,
            id,
            data,
        }
    }
}

/// Single-producer, single-consumer event FIFO.
pub struct EventQueue {
    events: Deque<Event, EVENT_QUEUE_CAPACITY>,
    last_activity_ms: u32,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
            last_activity_ms: 0,
        }
    }

    /// Append `event` and reset the idle time.
    ///
    /// A full queue rejects the event; activity is still recorded.
    pub fn push(&mut self, event: Event, now_ms: u32) -> Result<(), Error> {
        self.touch(now_ms);
        self.events.push_back(event).map_err(|_| Error::QueueFull)
    }

    /// Remove and return the oldest event.
    pub fn pull(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn available(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Record activity without queuing an event.
    pub fn touch(&mut self, now_ms: u32) {
        self.last_activity_ms = now_ms;
    }

    /// Milliseconds since the last push or touch.
    pub fn idle_time(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_activity_ms)
    }

    /// Drop every pending event.
    pub fn flush(&mut self) {
        self.events.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
