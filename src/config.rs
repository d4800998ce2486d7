//! Panel-wide constants and compile-time configuration.
//!
//! Timing parameters, queue sizing and preset geometry live here so they
//! can be tuned in one place for a given board.

// Timing

/// Rate at which `UiController::poll` is called (Hz). One tick = 1 ms.
pub const TICK_HZ: u64 = 1000;

/// Hold duration after which a press counts as a long press (ms).
pub const LONG_PRESS_MS: u32 = 1000;

/// Hold duration after which a press counts as a very long press (ms).
pub const VERY_LONG_PRESS_MS: u32 = 1500;

/// Idle time after which the Panic pattern is cleared (ms).
pub const PANIC_TIMEOUT_MS: u32 = 1000;

/// Idle time after which transient views fall back to the VU meter (ms).
pub const UI_TIMEOUT_MS: u32 = 3000;

// Switches
//
// Front-panel order, matching `SwitchId`:
//
//   Mode    → parameter / view selection
//   Write   → save, calibration, playback mode
//   Freeze  → freeze / reverse
//   Bypass  → bypass / infinite reverb

/// Number of front-panel switches.
pub const NUM_SWITCHES: usize = 4;

/// Debounce history value once every sample in the window read pressed.
/// The history is a `u8`, so the window is 8 ticks (8 ms at 1 kHz).
pub const DEBOUNCE_ALL_PRESSED: u8 = 0x00;

/// Debounce history value once every sample in the window read released.
pub const DEBOUNCE_ALL_RELEASED: u8 = 0xFF;

// Event queue

/// Capacity of the UI event queue.
pub const EVENT_QUEUE_CAPACITY: usize = 16;

// Engine parameters

/// Number of selectable grain quality settings.
pub const NUM_QUALITY_LEVELS: u8 = 4;

// Presets

/// Number of preset banks.
pub const NUM_PRESET_BANKS: u8 = 3;

/// Number of preset slots per bank (one per status LED).
pub const PRESET_SLOTS: u8 = 4;

// LEDs

/// Number of bicolour status LEDs.
pub const NUM_STATUS_LEDS: usize = 4;
