//! Status LED frame computed by the panel each tick.
//!
//! Four bicolour (red/green) status LEDs plus the freeze LED. The panel
//! fills a `LedFrame`; the board's renderer owns PWM and transport.

use crate::config::NUM_STATUS_LEDS;

/// Width of one LED segment in the VU bar.
const BAR_SEGMENT: i32 = 8192;

/// Bar level from which the top LED shows red.
const BAR_CLIP_LEVEL: u16 = 31000;

/// Dynamic range shown by the bar: 8 octaves (~48 dB), in log2 Q8.
const BAR_RANGE_Q8: u32 = 8 * 256;

/// One bicolour status LED.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusLed {
    pub red: u8,
    pub green: u8,
}

impl StatusLed {
    pub const OFF: StatusLed = StatusLed { red: 0, green: 0 };

    pub fn is_off(&self) -> bool {
        self.red == 0 && self.green == 0
    }
}

/// Complete LED state for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedFrame {
    pub status: [StatusLed; NUM_STATUS_LEDS],
    pub freeze: bool,
    /// `false` blanks the status LEDs (engine bypassed).
    pub enabled: bool,
}

impl LedFrame {
    pub const fn new() -> Self {
        Self {
            status: [StatusLed::OFF; NUM_STATUS_LEDS],
            freeze: false,
            enabled: true,
        }
    }

    /// Out-of-range indices are ignored.
    pub fn set_status(&mut self, index: usize, red: u8, green: u8) {
        if let Some(led) = self.status.get_mut(index) {
            *led = StatusLed { red, green };
        }
    }

    /// Both colours at the same intensity.
    pub fn set_intensity(&mut self, index: usize, value: u8) {
        self.set_status(index, value, value);
    }

    /// Fill the status LEDs as a green bar for `level` (`0..=32767`),
    /// the top LED turning red near full scale.
    pub fn paint_bar(&mut self, level: u16) {
        let level = i32::from(level.min(32767));
        for i in 0..NUM_STATUS_LEDS {
            let lit = (level - i as i32 * BAR_SEGMENT).clamp(0, BAR_SEGMENT);
            let green = (lit * 255 / BAR_SEGMENT) as u8;
            self.set_status(i, 0, green);
        }
        if level >= i32::from(BAR_CLIP_LEVEL) {
            self.set_status(NUM_STATUS_LEDS - 1, 255, 0);
        }
    }
}

impl Default for LedFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a linear peak (`0..=32767`) to a bar level on a dB scale.
///
/// Uses an integer log2 with an 8-bit linear mantissa, which is accurate
/// to a fraction of a dB - plenty for four LEDs.
pub fn peak_to_bar_level(peak: u16) -> u16 {
    let peak = peak.min(32767);
    if peak == 0 {
        return 0;
    }

    let msb = 15 - peak.leading_zeros();
    let mantissa = ((u32::from(peak) << (15 - msb)) >> 7) & 0xFF;
    let log2_q8 = msb * 256 + mantissa;

    let floor = 15 * 256 - BAR_RANGE_Q8;
    let above = log2_q8.saturating_sub(floor).min(BAR_RANGE_Q8);
    (above * 32767 / BAR_RANGE_Q8) as u16
}

/// Sink for computed frames.
pub trait LedRenderer {
    /// Commit one frame.
    fn write(&mut self, frame: &LedFrame);
}

/// Latest-frame buffer, read by a PWM driver or inspected in tests.
impl LedRenderer for LedFrame {
    fn write(&mut self, frame: &LedFrame) {
        *self = *frame;
    }
}

impl<T: LedRenderer + ?Sized> LedRenderer for &mut T {
    fn write(&mut self, frame: &LedFrame) {
        (**self).write(frame);
    }
}
