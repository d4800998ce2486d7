//! Unified error type for the panel core.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for on-target logging when the `defmt`
//! feature is enabled.

/// Top-level error type used across the crate.
///
/// None of these escape `UiController::poll` or `UiController::do_events`:
/// they are logged and turned into state (Panic) or a dropped event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Events
    /// The event queue is full; the new event was rejected.
    QueueFull,

    // Persistence
    /// Writing settings or presets to storage failed.
    Storage,

    // Calibration
    /// The second calibration step produced out-of-range readings.
    Calibration,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::QueueFull => f.write_str("event queue full"),
            Error::Storage => f.write_str("storage write failed"),
            Error::Calibration => f.write_str("calibration failed"),
        }
    }
}
