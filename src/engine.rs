//! Audio engine contract as seen from the front panel.
//!
//! The granular processor itself lives elsewhere; the panel only flips its
//! switches and parameters. `EngineParameters` is a plain parameter block
//! implementing the contract, suitable for sharing with an audio task or
//! for host tests.

use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicU16, Ordering};

/// Processing algorithm selected with the Write switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PlaybackMode {
    #[default]
    Granular = 0,
    StretchAndPitch = 1,
    LoopingDelay = 2,
    Spectral = 3,
    Oliverb = 4,
    Resonestor = 5,
}

impl PlaybackMode {
    pub const COUNT: u8 = 6;

    /// Out-of-range values wrap, so a corrupted saved byte still maps to a mode.
    pub fn from_index(index: u8) -> Self {
        match index % Self::COUNT {
            0 => PlaybackMode::Granular,
            1 => PlaybackMode::StretchAndPitch,
            2 => PlaybackMode::LoopingDelay,
            3 => PlaybackMode::Spectral,
            4 => PlaybackMode::Oliverb,
            _ => PlaybackMode::Resonestor,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Self {
        if self.index() == 0 {
            Self::from_index(Self::COUNT - 1)
        } else {
            Self::from_index(self.index() - 1)
        }
    }
}

/// Parameter controlled by the blend knob.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BlendParameter {
    #[default]
    DryWet = 0,
    StereoSpread = 1,
    Feedback = 2,
    Reverb = 3,
}

impl BlendParameter {
    pub const COUNT: usize = 4;

    pub const ALL: [BlendParameter; Self::COUNT] = [
        BlendParameter::DryWet,
        BlendParameter::StereoSpread,
        BlendParameter::Feedback,
        BlendParameter::Reverb,
    ];

    /// Only the low two bits are significant.
    pub fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 3) as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::from_bits(self as u8 + 1)
    }
}

/// Blend values are `0.0..=1.0` in the engine and one byte in storage.
pub fn blend_to_byte(value: f32) -> u8 {
    (value * 255.0) as u8
}

pub fn blend_from_byte(byte: u8) -> f32 {
    f32::from(byte) / 255.0
}

/// Engine snapshot stored in a preset slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Preset {
    pub quality: u8,
    pub playback_mode: PlaybackMode,
    pub blend_value: [u8; BlendParameter::COUNT],
    pub freeze: bool,
    pub reverse: bool,
}

/// Everything the panel reads from or writes to the audio engine.
pub trait AudioEngine {
    fn bypass(&self) -> bool;
    fn set_bypass(&mut self, bypass: bool);

    fn frozen(&self) -> bool;
    fn set_freeze(&mut self, freeze: bool);

    fn reversed(&self) -> bool;
    fn set_reverse(&mut self, reverse: bool);

    /// Latched infinite-reverb tail, held while Bypass is down.
    fn inf_reverb(&self) -> bool;
    fn set_inf_reverb(&mut self, enabled: bool);

    /// Mute output, used around blocking flash writes.
    fn set_silence(&mut self, silence: bool);

    fn quality(&self) -> u8;
    fn set_quality(&mut self, quality: u8);

    fn playback_mode(&self) -> PlaybackMode;
    fn set_playback_mode(&mut self, mode: PlaybackMode);

    fn blend_parameter(&self) -> BlendParameter;
    fn set_blend_parameter(&mut self, parameter: BlendParameter);

    fn blend_value(&self, parameter: BlendParameter) -> f32;
    fn set_blend_value(&mut self, parameter: BlendParameter, value: f32);

    fn export_preset(&self, preset: &mut Preset);
    fn load_preset(&mut self, preset: &Preset);

    fn toggle_bypass(&mut self) {
        let bypass = self.bypass();
        self.set_bypass(!bypass);
    }

    fn toggle_freeze(&mut self) {
        let frozen = self.frozen();
        self.set_freeze(!frozen);
    }

    fn toggle_reverse(&mut self) {
        let reversed = self.reversed();
        self.set_reverse(!reversed);
    }
}

/// Engine muted for as long as the guard lives.
///
/// Audio comes back on drop, whatever happened in between.
pub struct Silenced<'a, E: AudioEngine + ?Sized> {
    engine: &'a mut E,
}

impl<'a, E: AudioEngine + ?Sized> Silenced<'a, E> {
    pub fn new(engine: &'a mut E) -> Self {
        engine.set_silence(true);
        Self { engine }
    }
}

impl<E: AudioEngine + ?Sized> Deref for Silenced<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.engine
    }
}

impl<E: AudioEngine + ?Sized> DerefMut for Silenced<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.engine
    }
}

impl<E: AudioEngine + ?Sized> Drop for Silenced<'_, E> {
    fn drop(&mut self) {
        self.engine.set_silence(false);
    }
}

/// Plain parameter block implementing `AudioEngine`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineParameters {
    bypass: bool,
    freeze: bool,
    reverse: bool,
    inf_reverb: bool,
    silence: bool,
    quality: u8,
    playback_mode: PlaybackMode,
    blend_parameter: BlendParameter,
    blend_value: [f32; BlendParameter::COUNT],
}

impl EngineParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn silenced(&self) -> bool {
        self.silence
    }
}

impl AudioEngine for EngineParameters {
    fn bypass(&self) -> bool {
        self.bypass
    }

    fn set_bypass(&mut self, bypass: bool) {
        self.bypass = bypass;
    }

    fn frozen(&self) -> bool {
        self.freeze
    }

    fn set_freeze(&mut self, freeze: bool) {
        self.freeze = freeze;
    }

    fn reversed(&self) -> bool {
        self.reverse
    }

    fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    fn inf_reverb(&self) -> bool {
        self.inf_reverb
    }

    fn set_inf_reverb(&mut self, enabled: bool) {
        self.inf_reverb = enabled;
    }

    fn set_silence(&mut self, silence: bool) {
        self.silence = silence;
    }

    fn quality(&self) -> u8 {
        self.quality
    }

    fn set_quality(&mut self, quality: u8) {
        self.quality = quality;
    }

    fn playback_mode(&self) -> PlaybackMode {
        self.playback_mode
    }

    fn set_playback_mode(&mut self, mode: PlaybackMode) {
        self.playback_mode = mode;
    }

    fn blend_parameter(&self) -> BlendParameter {
        self.blend_parameter
    }

    fn set_blend_parameter(&mut self, parameter: BlendParameter) {
        self.blend_parameter = parameter;
    }

    fn blend_value(&self, parameter: BlendParameter) -> f32 {
        self.blend_value[parameter.index()]
    }

    fn set_blend_value(&mut self, parameter: BlendParameter, value: f32) {
        self.blend_value[parameter.index()] = value.clamp(0.0, 1.0);
    }

    fn export_preset(&self, preset: &mut Preset) {
        preset.quality = self.quality;
        preset.playback_mode = self.playback_mode;
        for parameter in BlendParameter::ALL {
            preset.blend_value[parameter.index()] = blend_to_byte(self.blend_value(parameter));
        }
        preset.freeze = self.freeze;
        preset.reverse = self.reverse;
    }

    fn load_preset(&mut self, preset: &Preset) {
        self.quality = preset.quality & 3;
        self.playback_mode = preset.playback_mode;
        for parameter in BlendParameter::ALL {
            self.blend_value[parameter.index()] =
                blend_from_byte(preset.blend_value[parameter.index()]);
        }
        self.freeze = preset.freeze;
        self.reverse = preset.reverse;
    }
}

/// Output level source for the VU meter.
pub trait LevelMeter {
    /// Current peak, `0..=32767`.
    fn peak(&self) -> u16;
}

/// Peak written by the audio interrupt, read by the panel.
impl LevelMeter for AtomicU16 {
    fn peak(&self) -> u16 {
        self.load(Ordering::Relaxed)
    }
}

impl<T: LevelMeter + ?Sized> LevelMeter for &T {
    fn peak(&self) -> u16 {
        (**self).peak()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_mode_wraps_both_ways() {
        assert_eq!(PlaybackMode::Resonestor.next(), PlaybackMode::Granular);
        assert_eq!(PlaybackMode::Granular.previous(), PlaybackMode::Resonestor);
        assert_eq!(PlaybackMode::Spectral.next(), PlaybackMode::Oliverb);
        assert_eq!(PlaybackMode::from_index(6), PlaybackMode::Granular);
        assert_eq!(PlaybackMode::from_index(255), PlaybackMode::from_index(255 % 6));
    }

    #[test]
    fn blend_parameter_wraps_on_two_bits() {
        assert_eq!(BlendParameter::Reverb.next(), BlendParameter::DryWet);
        assert_eq!(BlendParameter::from_bits(0xFE), BlendParameter::Feedback);
    }

    #[test]
    fn blend_byte_conversion_saturates() {
        assert_eq!(blend_to_byte(1.0), 255);
        assert_eq!(blend_to_byte(0.0), 0);
        assert_eq!(blend_to_byte(2.0), 255);
        assert_eq!(blend_from_byte(255), 1.0);
    }

    #[test]
    fn silence_guard_restores_audio() {
        let mut engine = EngineParameters::new();
        {
            let mut silenced = Silenced::new(&mut engine);
            assert!(silenced.silenced());
            silenced.set_quality(2);
        }
        assert!(!engine.silenced());
        assert_eq!(engine.quality(), 2);
    }

    #[test]
    fn preset_export_then_load_restores_parameters() {
        let mut engine = EngineParameters::new();
        engine.set_quality(3);
        engine.set_playback_mode(PlaybackMode::Spectral);
        engine.set_blend_value(BlendParameter::Feedback, 1.0);
        engine.set_freeze(true);

        let mut preset = Preset::default();
        engine.export_preset(&mut preset);
        assert_eq!(preset.blend_value[BlendParameter::Feedback.index()], 255);

        let mut other = EngineParameters::new();
        other.load_preset(&preset);
        assert_eq!(other.quality(), 3);
        assert_eq!(other.playback_mode(), PlaybackMode::Spectral);
        assert_eq!(other.blend_value(BlendParameter::Feedback), 1.0);
        assert!(other.frozen());
        assert!(!other.reversed());
    }

    #[test]
    fn toggles_flip_state() {
        let mut engine = EngineParameters::new();
        engine.toggle_bypass();
        engine.toggle_freeze();
        engine.toggle_reverse();
        assert!(engine.bypass() && engine.frozen() && engine.reversed());
        engine.toggle_bypass();
        assert!(!engine.bypass());
    }

    #[test]
    fn atomic_peak_is_a_meter() {
        let peak = AtomicU16::new(1234);
        assert_eq!(peak.peak(), 1234);
        let handle = &peak;
        peak.store(42, Ordering::Relaxed);
        assert_eq!(handle.peak(), 42);
    }
}
