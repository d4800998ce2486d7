//! Millisecond tick counter shared by the switch bank and event queue.

/// Monotonic millisecond clock advanced once per `poll` tick.
///
/// Wraps after ~49 days; all consumers compute differences with
/// `wrapping_sub`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock {
    ms: u32,
}

impl SystemClock {
    pub const fn new() -> Self {
        Self { ms: 0 }
    }

    /// Advance by one tick (1 ms at `TICK_HZ`).
    pub fn tick(&mut self) {
        self.ms = self.ms.wrapping_add(1);
    }

    /// Milliseconds since boot.
    pub fn milliseconds(&self) -> u32 {
        self.ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero_and_ticks() {
        let mut clock = SystemClock::new();
        assert_eq!(clock.milliseconds(), 0);
        clock.tick();
        clock.tick();
        assert_eq!(clock.milliseconds(), 2);
    }

    #[test]
    fn clock_wraps() {
        let mut clock = SystemClock { ms: u32::MAX };
        clock.tick();
        assert_eq!(clock.milliseconds(), 0);
    }
}
