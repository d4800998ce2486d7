//! Front-panel control core for a granular audio module.
//!
//! Four switches, four bicolour status LEDs and a freeze LED drive the
//! engine through a small mode state machine:
//!
//! ```text
//! tick ─► poll()       clock, debounce, press/hold/release events, LEDs
//!      └► do_events()  dispatch events by mode, idle timeouts
//! ```
//!
//! Everything here is `no_std` and runs on the host for tests:
//! `cargo test`. The embassy tick loop lives behind the `embedded`
//! feature; the firmware supplies the engine, settings, ADC/calibration
//! and LED driver through the traits in [`engine`], [`settings`],
//! [`controls`] and [`leds`].

#![cfg_attr(not(test), no_std)]

// ═══════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════

pub mod clock;
pub mod config;
pub mod controls;
pub mod engine;
pub mod error;
pub mod event_queue;
pub mod leds;
pub mod settings;
pub mod switches;
pub mod ui;

#[cfg(feature = "embedded")]
pub mod task;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use engine::{AudioEngine, EngineParameters, LevelMeter};
pub use error::Error;
pub use event_queue::{ControlType, Event, EventQueue};
pub use leds::{LedFrame, LedRenderer};
pub use settings::{PresetLocation, RamSettings, Settings};
pub use switches::{SwitchId, SwitchSampler};
pub use ui::{Collaborators, UiController, UiMode};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
