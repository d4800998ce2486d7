//! Front-panel switch debouncing and press timing.
//!
//! Four momentary switches (active-low with pull-up):
//!   - MODE   - cycle views / quality / blend parameter, long: load
//!   - WRITE  - playback mode / calibration, long: save
//!   - FREEZE - freeze, long: reverse
//!   - BYPASS - bypass, long: infinite reverb
//!
//! Each switch is sampled once per tick into an 8-bit history register.
//! The debounced level only changes when the whole window agrees, so a
//! chattering contact never produces a logical transition.

use core::ops::{Index, IndexMut};

use crate::config::{
    DEBOUNCE_ALL_PRESSED, DEBOUNCE_ALL_RELEASED, LONG_PRESS_MS, NUM_SWITCHES, VERY_LONG_PRESS_MS,
};
use embedded_hal::digital::InputPin;

/// Physical switches, in front-panel order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SwitchId {
    Mode = 0,
    Write = 1,
    Freeze = 2,
    Bypass = 3,
}

impl SwitchId {
    pub const ALL: [SwitchId; NUM_SWITCHES] = [
        SwitchId::Mode,
        SwitchId::Write,
        SwitchId::Freeze,
        SwitchId::Bypass,
    ];

    /// Map an event control id back to a switch. Out-of-range ids are `None`.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Logical press state of a switch.
///
/// Only ever advances Released → Pressed → LongPressed → VeryLongPressed,
/// then back to Released on release or reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchState {
    #[default]
    Released,
    Pressed,
    LongPressed,
    VeryLongPressed,
}

/// Debounce and press-duration tracker for one switch.
#[derive(Clone, Copy, Debug)]
pub struct Switch {
    /// Raw samples, newest in bit 0. `1` = high = released.
    history: u8,
    /// Debounced physical level.
    down: bool,
    state: SwitchState,
    /// Tick of the debounced press, 0 when not pressed.
    press_start: u32,
    just_pressed: bool,
    released: bool,
    held_ms: u32,
}

impl Switch {
    pub const fn new() -> Self {
        Self {
            history: DEBOUNCE_ALL_RELEASED,
            down: false,
            state: SwitchState::Released,
            press_start: 0,
            just_pressed: false,
            released: false,
            held_ms: 0,
        }
    }

    /// Feed one raw sample. `raw_high == false` means the contact is closed.
    pub fn sample(&mut self, raw_high: bool, now_ms: u32) {
        self.history = (self.history << 1) | raw_high as u8;

        if self.history == DEBOUNCE_ALL_PRESSED && !self.down {
            self.down = true;
            self.press_start = now_ms;
            self.state = SwitchState::Pressed;
            self.just_pressed = true;
        } else if self.history == DEBOUNCE_ALL_RELEASED && self.down {
            self.down = false;
            // A switch reset while held stays silent on release.
            if self.state != SwitchState::Released {
                self.held_ms = now_ms.wrapping_sub(self.press_start);
                self.released = true;
            }
            self.press_start = 0;
            self.state = SwitchState::Released;
            self.just_pressed = false;
        }
    }

    /// Advance Pressed → LongPressed → VeryLongPressed once the hold
    /// thresholds are crossed. Returns the elapsed hold time when a
    /// transition fired; each transition fires at most once per press.
    pub fn promote(&mut self, now_ms: u32) -> Option<u32> {
        if !self.down || self.press_start == 0 {
            return None;
        }

        let elapsed = now_ms.wrapping_sub(self.press_start);
        match self.state {
            SwitchState::Pressed if elapsed > LONG_PRESS_MS => {
                self.state = SwitchState::LongPressed;
                Some(elapsed)
            }
            SwitchState::LongPressed if elapsed > VERY_LONG_PRESS_MS => {
                self.state = SwitchState::VeryLongPressed;
                Some(elapsed)
            }
            _ => None,
        }
    }

    /// Debounced press edge, pending until captured.
    pub fn just_pressed(&self) -> bool {
        self.just_pressed
    }

    /// Clear the press edge; hold tracking continues.
    pub fn capture_as_handled(&mut self) {
        self.just_pressed = false;
    }

    /// Debounced physical level.
    pub fn is_pressed(&self) -> bool {
        self.down
    }

    /// Debounced release edge of a tracked press, pending until `reset`.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Duration of the press that ended with the pending release.
    pub fn held_ms(&self) -> u32 {
        self.held_ms
    }

    pub fn press_start_time(&self) -> u32 {
        self.press_start
    }

    pub fn state(&self) -> SwitchState {
        self.state
    }

    /// Force to Released and clear timers and edges. The debounced level
    /// is kept, so a switch reset while held produces no further events
    /// until it is physically released and pressed again.
    pub fn reset(&mut self) {
        self.state = SwitchState::Released;
        self.press_start = 0;
        self.just_pressed = false;
        self.released = false;
        self.held_ms = 0;
    }
}

impl Default for Switch {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-tick raw reads of the front-panel switches.
pub trait SwitchSampler {
    /// Electrical level of `id`: `true` = high (released), `false` = pressed.
    fn is_high(&mut self, id: SwitchId) -> bool;
}

/// Any set of four `embedded-hal` input pins, in `SwitchId` order.
/// A failed read counts as released.
impl<P: InputPin> SwitchSampler for [P; NUM_SWITCHES] {
    fn is_high(&mut self, id: SwitchId) -> bool {
        self[id.index()].is_high().unwrap_or(true)
    }
}

/// The four front-panel switches and their sampler.
pub struct SwitchBank<P> {
    pins: P,
    switches: [Switch; NUM_SWITCHES],
}

impl<P: SwitchSampler> SwitchBank<P> {
    pub fn new(pins: P) -> Self {
        Self {
            pins,
            switches: [Switch::new(); NUM_SWITCHES],
        }
    }

    /// Sample every switch once.
    pub fn scan(&mut self, now_ms: u32) {
        for id in SwitchId::ALL {
            let level = self.pins.is_high(id);
            self.switches[id.index()].sample(level, now_ms);
        }
    }

    /// Undebounced read, for boot-time checks before any scan has run.
    pub fn pressed_immediate(&mut self, id: SwitchId) -> bool {
        !self.pins.is_high(id)
    }

    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }

    pub fn into_pins(self) -> P {
        self.pins
    }
}

impl<P> Index<SwitchId> for SwitchBank<P> {
    type Output = Switch;

    fn index(&self, id: SwitchId) -> &Switch {
        &self.switches[id.index()]
    }
}

impl<P> IndexMut<SwitchId> for SwitchBank<P> {
    fn index_mut(&mut self, id: SwitchId) -> &mut Switch {
        &mut self.switches[id.index()]
    }
}
