//! Persistent panel state and preset slots.
//!
//! Flash layout is the board's business; the panel only needs a small
//! saved-state record, a grid of preset slots, and a way to commit each.
//! `RamSettings` keeps everything in memory and counts commits, for hosts
//! and boards without persistence.

use crate::config::{NUM_PRESET_BANKS, PRESET_SLOTS};
use crate::engine::{BlendParameter, Preset};
use crate::error::Error;

/// Panel settings persisted across power cycles.
///
/// Values are stored raw; `UiController::new` sanitizes them before
/// handing them to the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SavedState {
    pub blend_parameter: u8,
    pub quality: u8,
    pub playback_mode: u8,
    pub blend_value: [u8; BlendParameter::COUNT],
}

/// Address of a preset slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PresetLocation {
    pub bank: u8,
    pub slot: u8,
}

impl PresetLocation {
    pub const fn new(bank: u8, slot: u8) -> Self {
        Self { bank, slot }
    }

    /// Next slot, carrying into the next bank and wrapping after the last.
    pub fn next(self) -> Self {
        if self.slot + 1 < PRESET_SLOTS {
            Self::new(self.bank, self.slot + 1)
        } else {
            Self::new((self.bank + 1) % NUM_PRESET_BANKS, 0)
        }
    }

    /// Next slot within the same bank.
    pub fn next_slot_in_bank(self) -> Self {
        Self::new(self.bank, (self.slot + 1) % PRESET_SLOTS)
    }

    fn flat_index(self) -> usize {
        let bank = (self.bank % NUM_PRESET_BANKS) as usize;
        let slot = (self.slot % PRESET_SLOTS) as usize;
        bank * PRESET_SLOTS as usize + slot
    }
}

/// Storage contract used by the panel.
pub trait Settings {
    fn state(&self) -> &SavedState;
    fn state_mut(&mut self) -> &mut SavedState;

    /// Commit the saved state (and any calibration data) to storage.
    fn save(&mut self) -> Result<(), Error>;

    fn preset(&self, location: PresetLocation) -> &Preset;
    fn preset_mut(&mut self, location: PresetLocation) -> &mut Preset;

    /// Commit all preset slots to storage. May block for an erase cycle.
    fn save_presets(&mut self) -> Result<(), Error>;

    /// Slot selected after `location` when stepping through presets.
    fn next_preset_location(&self, location: PresetLocation) -> PresetLocation {
        location.next()
    }
}

const NUM_PRESETS: usize = NUM_PRESET_BANKS as usize * PRESET_SLOTS as usize;

/// Volatile `Settings` implementation.
#[derive(Clone, Debug, Default)]
pub struct RamSettings {
    state: SavedState,
    presets: [Preset; NUM_PRESETS],
    saves: u32,
    preset_saves: u32,
    fail_writes: bool,
}

impl RamSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SavedState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Successful `save` calls so far.
    pub fn saves(&self) -> u32 {
        self.saves
    }

    /// Successful `save_presets` calls so far.
    pub fn preset_saves(&self) -> u32 {
        self.preset_saves
    }

    /// Make every subsequent commit fail with `Error::Storage`.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl Settings for RamSettings {
    fn state(&self) -> &SavedState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SavedState {
        &mut self.state
    }

    fn save(&mut self) -> Result<(), Error> {
        if self.fail_writes {
            return Err(Error::Storage);
        }
        self.saves += 1;
        Ok(())
    }

    fn preset(&self, location: PresetLocation) -> &Preset {
        &self.presets[location.flat_index()]
    }

    fn preset_mut(&mut self, location: PresetLocation) -> &mut Preset {
        &mut self.presets[location.flat_index()]
    }

    fn save_presets(&mut self) -> Result<(), Error> {
        if self.fail_writes {
            return Err(Error::Storage);
        }
        self.preset_saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_steps_through_every_slot_then_wraps() {
        let mut location = PresetLocation::default();
        for _ in 0..NUM_PRESETS {
            location = location.next();
        }
        assert_eq!(location, PresetLocation::new(0, 0));
    }

    #[test]
    fn location_carries_into_next_bank() {
        assert_eq!(PresetLocation::new(0, 3).next(), PresetLocation::new(1, 0));
        assert_eq!(
            PresetLocation::new(NUM_PRESET_BANKS - 1, PRESET_SLOTS - 1).next(),
            PresetLocation::new(0, 0)
        );
        assert_eq!(PresetLocation::new(1, 1).next(), PresetLocation::new(1, 2));
    }

    #[test]
    fn slot_in_bank_wraps_without_carry() {
        assert_eq!(
            PresetLocation::new(2, 3).next_slot_in_bank(),
            PresetLocation::new(2, 0)
        );
    }

    #[test]
    fn presets_are_addressed_independently() {
        let mut settings = RamSettings::new();
        settings.preset_mut(PresetLocation::new(1, 2)).quality = 3;
        assert_eq!(settings.preset(PresetLocation::new(1, 2)).quality, 3);
        assert_eq!(settings.preset(PresetLocation::new(2, 1)).quality, 0);
    }

    #[test]
    fn failing_writes_are_reported_and_not_counted() {
        let mut settings = RamSettings::new();
        settings.save().unwrap();
        settings.set_fail_writes(true);
        assert_eq!(settings.save(), Err(Error::Storage));
        assert_eq!(settings.save_presets(), Err(Error::Storage));
        assert_eq!(settings.saves(), 1);
        assert_eq!(settings.preset_saves(), 0);
    }
}
