//! Knob / CV side of the panel: ADC readings, gate inputs, blend knob
//! pickup and input calibration.
//!
//! Calibration math and ADC scanning belong to the board; the panel only
//! sequences the two calibration steps and reports failure as Panic.

use crate::error::Error;

pub trait ControlInputs {
    /// Raw 8-bit reading of ADC channel `channel` (pots first, then CVs).
    fn adc_value(&self, channel: u8) -> u8;

    /// Level of gate input `index`.
    fn gate(&self, index: u8) -> bool;

    /// The blend knob moved since the last call.
    fn blend_knob_touched(&mut self) -> bool;

    /// Let the blend knob take over the current parameter immediately
    /// instead of waiting for pickup.
    fn unlock_blend_knob(&mut self);

    /// First calibration step: V/Oct input at C1.
    fn calibrate_c1(&mut self);

    /// Record CV input offsets with nothing patched.
    fn calibrate_offsets(&mut self);

    /// Second calibration step: V/Oct input at C3.
    /// Fails with `Error::Calibration` when the readings are out of range.
    fn calibrate_c3(&mut self) -> Result<(), Error>;
}
