//! Mode → LED appearance.
//!
//! Pure function of the UI mode, a snapshot of engine state and the tick
//! clock. Animation timing is derived from the clock bits:
//!
//! ```text
//! blink  (clock & 127) > 64     ~8 Hz, 50% duty
//! flash  (clock & 511) < 16     short pulse every ~0.5 s
//! fade   squared triangle of clock >> 1
//! ```

use super::UiMode;
use crate::config::NUM_STATUS_LEDS;
use crate::leds::{peak_to_bar_level, LedFrame};
use crate::settings::PresetLocation;

/// Engine and panel state the painter needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelView {
    pub bypass: bool,
    pub frozen: bool,
    pub reversed: bool,
    pub quality: u8,
    pub playback_mode: u8,
    pub blend_parameter: u8,
    pub peak: u16,
    pub location: PresetLocation,
}

/// `0..=127` ramps up, `128..=255` ramps down (wrapping like the 8-bit
/// arithmetic the animation was tuned on).
fn triangle(x: u8) -> u8 {
    if x <= 127 {
        x << 1
    } else {
        255u8.wrapping_sub(x << 1)
    }
}

pub fn paint(mode: UiMode, view: &PanelView, clock: u32) -> LedFrame {
    let mut frame = LedFrame::new();
    let blink = (clock & 127) > 64;
    let flash = (clock & 511) < 16;
    let fade = triangle((clock >> 1) as u8);
    let fade = ((u16::from(fade) * u16::from(fade)) >> 8) as u8;

    frame.enabled = !view.bypass;

    match mode {
        UiMode::Splash => splash(&mut frame, clock),

        UiMode::VuMeter => {
            if view.bypass {
                frame.paint_bar(0);
            } else {
                frame.paint_bar(peak_to_bar_level(view.peak));
            }
        }

        UiMode::Quality => frame.set_status(view.quality as usize, 255, 0),

        UiMode::Blending => frame.set_status(view.blend_parameter as usize, 0, 255),

        UiMode::PlaybackMode => {
            let red = 128 + (fade >> 1);
            let green = 255 - (fade >> 1);
            if blink {
                // Dark half of the blink.
            } else if usize::from(view.playback_mode) < NUM_STATUS_LEDS {
                frame.set_status(view.playback_mode as usize, red, green);
            } else {
                for i in 0..NUM_STATUS_LEDS {
                    frame.set_status(i, red, green);
                }
                frame.set_status((view.playback_mode & 3) as usize, 0, 0);
            }
        }

        UiMode::Load | UiMode::Save => preset_location(&mut frame, view.location, fade, flash),

        UiMode::Saving => frame.set_status(view.location.slot as usize, 255, 0),

        UiMode::Calibration1 => {
            let on = if blink { 255 } else { 0 };
            frame.set_intensity(0, on);
            frame.set_intensity(1, on);
        }

        UiMode::Calibration2 => {
            let on = if blink { 255 } else { 0 };
            for i in 0..NUM_STATUS_LEDS {
                frame.set_intensity(i, on);
            }
        }

        UiMode::Panic => {
            for i in 0..NUM_STATUS_LEDS {
                frame.set_status(i, 255, 0);
            }
        }

        UiMode::BlendMeter => {}
    }

    frame.freeze = view.frozen ^ (view.reversed && flash);
    frame
}

/// One LED at a time fading in and out, rotating every 256 ms.
fn splash(frame: &mut LedFrame, clock: u32) {
    let index = (((clock >> 8) + 1) & 3) as usize;
    let fade = triangle((clock >> 2) as u8);
    frame.set_intensity(NUM_STATUS_LEDS - 1 - index, fade);
}

/// Bank colour breathing on every LED, current slot flashing.
fn preset_location(frame: &mut LedFrame, location: PresetLocation, fade: u8, flash: bool) {
    let red = if location.bank & 1 != 0 { 0 } else { 255 };
    let green = if location.bank & 3 != 0 { 255 } else { 0 };
    for i in 0..NUM_STATUS_LEDS {
        frame.set_status(i, fade & red, fade & green);
    }
    if flash {
        frame.set_status(location.slot as usize, red, green);
    } else {
        frame.set_status(location.slot as usize, 0, 0);
    }
}
