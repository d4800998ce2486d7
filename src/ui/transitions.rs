//! Release handling as a pure transition table.
//!
//! `on_release` maps (current mode, switch, press length) to the mode to
//! enter and the side effect to run. The controller applies the action
//! first, then the mode change.

use super::UiMode;
use crate::config::LONG_PRESS_MS;
use crate::switches::SwitchId;

/// Press length bucket of a switch event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    Short,
    Long,
}

impl PressKind {
    /// Classify a switch event payload (held notification or release).
    pub fn from_event_data(data: u32) -> Self {
        if data >= LONG_PRESS_MS {
            PressKind::Long
        } else {
            PressKind::Short
        }
    }
}

/// Side effect requested by a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    None,
    EnableInfReverb,
    ToggleBypass,
    ToggleReverse,
    ToggleFreeze,
    /// Next blend parameter, then save state.
    NextBlendParameter,
    /// Next quality level, then save state.
    NextQuality,
    /// Previous playback mode, then save state.
    PreviousPlaybackMode,
    /// Next playback mode, then save state.
    NextPlaybackMode,
    NextPresetLocation,
    /// Import the preset at the current location, step to the next slot
    /// of the bank.
    LoadPreset,
    /// C1 + offsets; enters Calibration2.
    CalibrateFirstStep,
    /// C3; enters VuMeter on success, Panic on failure.
    CalibrateSecondStep,
    /// Export to the current location under silence, commit, step on.
    SavePreset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    /// Mode to enter after the action; `None` keeps the current one
    /// (or whatever the action chose).
    pub next: Option<UiMode>,
    pub action: Action,
}

impl Transition {
    const fn stay(action: Action) -> Self {
        Self { next: None, action }
    }

    const fn to(mode: UiMode) -> Self {
        Self {
            next: Some(mode),
            action: Action::None,
        }
    }

    const fn then(action: Action, mode: UiMode) -> Self {
        Self {
            next: Some(mode),
            action,
        }
    }
}

pub fn on_release(mode: UiMode, switch: SwitchId, kind: PressKind) -> Transition {
    match (switch, kind) {
        (SwitchId::Bypass, PressKind::Long) => Transition::stay(Action::EnableInfReverb),
        (SwitchId::Bypass, PressKind::Short) => Transition::stay(Action::ToggleBypass),

        (SwitchId::Freeze, PressKind::Long) => Transition::stay(Action::ToggleReverse),
        (SwitchId::Freeze, PressKind::Short) => Transition::stay(Action::ToggleFreeze),

        (SwitchId::Mode, PressKind::Long) => {
            if mode == UiMode::Quality {
                Transition::to(UiMode::VuMeter)
            } else {
                Transition::to(UiMode::Load)
            }
        }
        (SwitchId::Mode, PressKind::Short) => on_mode_short(mode),

        (SwitchId::Write, PressKind::Long) => Transition::to(UiMode::Save),
        (SwitchId::Write, PressKind::Short) => on_write_short(mode),
    }
}

fn on_mode_short(mode: UiMode) -> Transition {
    match mode {
        UiMode::VuMeter | UiMode::BlendMeter => Transition::to(UiMode::Quality),
        UiMode::Blending => Transition::stay(Action::NextBlendParameter),
        UiMode::Quality => Transition::stay(Action::NextQuality),
        UiMode::PlaybackMode => Transition::stay(Action::PreviousPlaybackMode),
        UiMode::Save => Transition::stay(Action::NextPresetLocation),
        UiMode::Load => Transition::then(Action::LoadPreset, UiMode::VuMeter),
        _ => Transition::to(UiMode::VuMeter),
    }
}

fn on_write_short(mode: UiMode) -> Transition {
    match mode {
        UiMode::Calibration1 => Transition::stay(Action::CalibrateFirstStep),
        UiMode::Calibration2 => Transition::stay(Action::CalibrateSecondStep),
        UiMode::Save => Transition::then(Action::SavePreset, UiMode::VuMeter),
        UiMode::Load => Transition::stay(Action::NextPresetLocation),
        UiMode::PlaybackMode => Transition::stay(Action::NextPlaybackMode),
        _ => Transition::to(UiMode::PlaybackMode),
    }
}
