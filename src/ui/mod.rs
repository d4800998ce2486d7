//! User interface subsystem - front-panel switches + status LEDs.
//!
//! `UiController` runs two passes per tick:
//!
//! - **poll**: advance the clock, debounce the switches, turn press /
//!   hold / release transitions into queued events, repaint the LEDs.
//! - **do_events**: drain the queue against the current mode, drive the
//!   engine and settings, apply idle timeouts.
//!
//! ## Components
//!
//! - **Transitions**: pure release table, see [`transitions`]
//! - **Paint**: mode → LED frame, see [`paint`]
//! - **Factory test**: request byte decoding, see [`factory`]

pub mod factory;
pub mod paint;
pub mod transitions;


use crate::clock::SystemClock;
use crate::config::{LONG_PRESS_MS, NUM_QUALITY_LEVELS, PANIC_TIMEOUT_MS, UI_TIMEOUT_MS};
use crate::controls::ControlInputs;
use crate::engine::{
    blend_from_byte, blend_to_byte, AudioEngine, BlendParameter, LevelMeter, PlaybackMode, Silenced,
};
use crate::event_queue::{ControlType, Event, EventQueue};
use crate::leds::LedRenderer;
use crate::settings::{PresetLocation, Settings};
use crate::switches::{SwitchBank, SwitchId, SwitchSampler};

use factory::FactoryCommand;
use paint::PanelView;
use transitions::{Action, PressKind, Transition};

/// Views (modes) the panel can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiMode {
    /// Boot animation, until the first input or the idle timeout.
    Splash,
    /// Default view - output level bar.
    VuMeter,
    /// Blend knob feedback (dark).
    BlendMeter,
    /// Grain quality selection.
    Quality,
    /// Blend parameter selection.
    Blending,
    /// Playback algorithm selection.
    PlaybackMode,
    /// Pick a preset slot to load.
    Load,
    /// Pick a preset slot to save to.
    Save,
    /// Preset write in progress.
    Saving,
    /// Calibration failed. Cleared by the idle timeout.
    Panic,
    /// Waiting for C1 on the V/Oct input.
    Calibration1,
    /// Waiting for C3 on the V/Oct input.
    Calibration2,
}

/// Handles to everything outside the panel core.
///
/// Owned by the controller; pick handle types (references, `&'static`
/// atomics, parameter blocks) that outlive it.
pub struct Collaborators<E, S, C, M, L> {
    pub engine: E,
    pub settings: S,
    pub controls: C,
    pub meter: M,
    pub leds: L,
}

/// Front-panel state machine.
pub struct UiController<P, E, S, C, M, L> {
    switches: SwitchBank<P>,
    queue: EventQueue,
    clock: SystemClock,
    io: Collaborators<E, S, C, M, L>,
    mode: UiMode,
    /// Release events still to swallow. Decremented once per swallowed event.
    ignore_releases: u8,
    location: PresetLocation,
}

impl<P, E, S, C, M, L> UiController<P, E, S, C, M, L>
where
    P: SwitchSampler,
    E: AudioEngine,
    S: Settings,
    C: ControlInputs,
    M: LevelMeter,
    L: LedRenderer,
{
    /// Restore saved state into the engine and pick the boot mode.
    ///
    /// Holding Write at power-up enters calibration; the release of that
    /// same press is swallowed.
    pub fn new(pins: P, io: Collaborators<E, S, C, M, L>) -> Self {
        let mut ui = Self {
            switches: SwitchBank::new(pins),
            queue: EventQueue::new(),
            clock: SystemClock::new(),
            io,
            mode: UiMode::Splash,
            ignore_releases: 0,
            location: PresetLocation::default(),
        };

        ui.restore_state();

        if ui.switches.pressed_immediate(SwitchId::Write) {
            #[cfg(feature = "defmt")]
            defmt::info!("UI: Write held at boot, entering calibration");
            ui.mode = UiMode::Calibration1;
            ui.ignore_releases = 1;
        }

        ui
    }

    /// Sanitize the saved state and push it into the engine.
    fn restore_state(&mut self) {
        let state = *self.io.settings.state();
        let engine = &mut self.io.engine;

        engine.set_blend_parameter(BlendParameter::from_bits(state.blend_parameter));
        engine.set_quality(state.quality & 3);
        engine.set_playback_mode(PlaybackMode::from_index(state.playback_mode));
        for parameter in BlendParameter::ALL {
            engine.set_blend_value(parameter, blend_from_byte(state.blend_value[parameter.index()]));
        }
        self.io.controls.unlock_blend_knob();
    }

    /// Copy engine parameters into the saved state and commit it.
    fn save_state(&mut self) {
        let engine = &self.io.engine;
        let state = self.io.settings.state_mut();
        state.blend_parameter = engine.blend_parameter() as u8;
        state.quality = engine.quality();
        state.playback_mode = engine.playback_mode().index();
        for parameter in BlendParameter::ALL {
            state.blend_value[parameter.index()] = blend_to_byte(engine.blend_value(parameter));
        }

        if let Err(_e) = self.io.settings.save() {
            #[cfg(feature = "defmt")]
            defmt::warn!("UI: saving settings failed: {}", _e);
        }
    }

    // Poll

    /// Sampling pass, once per tick.
    pub fn poll(&mut self) {
        self.clock.tick();
        let now = self.clock.milliseconds();
        self.switches.scan(now);

        for id in SwitchId::ALL {
            let switch = &mut self.switches[id];

            if switch.just_pressed() {
                switch.capture_as_handled();
                enqueue(&mut self.queue, Event::switch(id as u8, 0), now);
                continue;
            }

            while let Some(elapsed) = switch.promote(now) {
                enqueue(&mut self.queue, Event::switch(id as u8, elapsed), now);
            }

            if switch.is_released() {
                let held = switch.held_ms();
                switch.reset();
                enqueue(
                    &mut self.queue,
                    Event::switch(id as u8, held.saturating_add(1)),
                    now,
                );
            }
        }

        self.paint_leds();
    }

    fn paint_leds(&mut self) {
        let engine = &self.io.engine;
        let view = PanelView {
            bypass: engine.bypass(),
            frozen: engine.frozen(),
            reversed: engine.reversed(),
            quality: engine.quality(),
            playback_mode: engine.playback_mode().index(),
            blend_parameter: engine.blend_parameter() as u8,
            peak: self.io.meter.peak(),
            location: self.location,
        };
        let frame = paint::paint(self.mode, &view, self.clock.milliseconds());
        self.io.leds.write(&frame);
    }

    // Events

    /// Dispatch pass: drain the queue, then apply idle rules.
    pub fn do_events(&mut self) {
        while let Some(event) = self.queue.pull() {
            if event.control != ControlType::Switch {
                continue;
            }
            let Some(switch) = SwitchId::from_index(event.id) else {
                continue;
            };

            if event.data == 0 {
                self.on_switch_pressed(switch);
            } else if event.data >= LONG_PRESS_MS
                && switch == SwitchId::Mode
                && self.switches[SwitchId::Write].is_pressed()
            {
                self.switches[SwitchId::Write].reset();
                self.on_secret_handshake();
            } else {
                self.on_switch_released(switch, event.data);
            }
        }

        let now = self.clock.milliseconds();

        if self.mode == UiMode::Panic && self.queue.idle_time(now) > PANIC_TIMEOUT_MS {
            self.queue.touch(now);
            self.set_mode(UiMode::VuMeter);
        }

        if matches!(
            self.mode,
            UiMode::VuMeter | UiMode::BlendMeter | UiMode::Blending
        ) && self.io.controls.blend_knob_touched()
        {
            self.queue.touch(now);
        }

        if self.queue.idle_time(now) > UI_TIMEOUT_MS
            && matches!(
                self.mode,
                UiMode::Blending
                    | UiMode::Quality
                    | UiMode::PlaybackMode
                    | UiMode::Save
                    | UiMode::Load
                    | UiMode::BlendMeter
                    | UiMode::Splash
            )
        {
            self.queue.touch(now);
            self.set_mode(UiMode::VuMeter);
        }

        if self.io.engine.inf_reverb() && !self.switches[SwitchId::Bypass].is_pressed() {
            self.io.engine.set_inf_reverb(false);
        }
    }

    /// Press hook. Presses carry no action yet; everything happens on hold
    /// or release.
    fn on_switch_pressed(&mut self, _switch: SwitchId) {}

    /// Mode held long while Write is down.
    fn on_secret_handshake(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("UI: secret handshake");
        self.set_mode(UiMode::PlaybackMode);
    }

    fn on_switch_released(&mut self, switch: SwitchId, data: u32) {
        if self.ignore_releases > 0 {
            self.ignore_releases -= 1;
            #[cfg(feature = "defmt")]
            defmt::debug!("UI: ignored release of {}", switch);
            return;
        }

        let transition = transitions::on_release(self.mode, switch, PressKind::from_event_data(data));
        self.apply(transition);
    }

    fn apply(&mut self, transition: Transition) {
        match transition.action {
            Action::None => {}
            Action::EnableInfReverb => self.io.engine.set_inf_reverb(true),
            Action::ToggleBypass => self.io.engine.toggle_bypass(),
            Action::ToggleReverse => self.io.engine.toggle_reverse(),
            Action::ToggleFreeze => self.io.engine.toggle_freeze(),
            Action::NextBlendParameter => {
                let parameter = self.io.engine.blend_parameter().next();
                self.io.engine.set_blend_parameter(parameter);
                self.save_state();
            }
            Action::NextQuality => {
                let quality = (self.io.engine.quality() + 1) % NUM_QUALITY_LEVELS;
                self.io.engine.set_quality(quality);
                self.save_state();
            }
            Action::PreviousPlaybackMode => {
                let mode = self.io.engine.playback_mode().previous();
                self.io.engine.set_playback_mode(mode);
                self.save_state();
            }
            Action::NextPlaybackMode => {
                let mode = self.io.engine.playback_mode().next();
                self.io.engine.set_playback_mode(mode);
                self.save_state();
            }
            Action::NextPresetLocation => {
                self.location = self.io.settings.next_preset_location(self.location);
            }
            Action::LoadPreset => self.load_preset(),
            Action::CalibrateFirstStep => self.calibrate_first_step(),
            Action::CalibrateSecondStep => self.calibrate_second_step(),
            Action::SavePreset => self.save_preset(),
        }

        if let Some(mode) = transition.next {
            self.set_mode(mode);
        }
    }

    fn set_mode(&mut self, mode: UiMode) {
        if self.mode != mode {
            #[cfg(feature = "defmt")]
            defmt::debug!("UI: {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    // Presets

    fn load_preset(&mut self) {
        self.io
            .engine
            .load_preset(self.io.settings.preset(self.location));
        self.location = self.location.next_slot_in_bank();
    }

    /// Blocking export + commit with the engine silenced. Audio is restored
    /// even when the commit fails.
    fn save_preset(&mut self) {
        self.set_mode(UiMode::Saving);
        let location = self.location;

        let result = {
            let engine = Silenced::new(&mut self.io.engine);
            engine.export_preset(self.io.settings.preset_mut(location));
            self.io.settings.save_presets()
        };

        match result {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("UI: preset saved to {}", location);
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("UI: preset save failed: {}", _e);
            }
        }

        self.location = self.io.settings.next_preset_location(location);
    }

    // Calibration

    fn calibrate_first_step(&mut self) {
        self.io.controls.calibrate_c1();
        self.io.controls.calibrate_offsets();
        self.set_mode(UiMode::Calibration2);
    }

    fn calibrate_second_step(&mut self) {
        match self.io.controls.calibrate_c3() {
            Ok(()) => {
                if let Err(_e) = self.io.settings.save() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("UI: saving calibration failed: {}", _e);
                }
                self.set_mode(UiMode::VuMeter);
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("UI: {}", _e);
                self.set_mode(UiMode::Panic);
            }
        }
    }

    // Factory test

    /// Answer one factory-test request byte. Commands without a readable
    /// result reply 0.
    pub fn handle_factory_testing_request(&mut self, request: u8) -> u8 {
        let Some((command, argument)) = FactoryCommand::decode(request) else {
            return 0;
        };

        match command {
            FactoryCommand::ReadPot | FactoryCommand::ReadCv => self.io.controls.adc_value(argument),
            FactoryCommand::ReadGate => {
                if argument <= 2 {
                    SwitchId::from_index(argument)
                        .map(|id| self.switches[id].is_pressed() as u8)
                        .unwrap_or(0)
                } else {
                    self.io.controls.gate(argument - 3) as u8
                }
            }
            FactoryCommand::SetBypass => {
                self.io.engine.set_bypass(argument != 0);
                0
            }
            FactoryCommand::Calibrate => {
                match argument {
                    0 => self.set_mode(UiMode::Calibration1),
                    1 => self.calibrate_first_step(),
                    _ => {
                        self.calibrate_second_step();
                        self.io.engine.set_blend_parameter(BlendParameter::DryWet);
                        self.save_state();
                    }
                }
                0
            }
        }
    }

    // Accessors

    /// Force the Panic pattern. Cleared by the idle timeout.
    pub fn panic(&mut self) {
        self.set_mode(UiMode::Panic);
    }

    /// Drop pending events without handling them.
    pub fn flush_events(&mut self) {
        self.queue.flush();
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn ignore_releases(&self) -> u8 {
        self.ignore_releases
    }

    pub fn preset_location(&self) -> PresetLocation {
        self.location
    }

    /// Milliseconds since boot, as counted by `poll`.
    pub fn now(&self) -> u32 {
        self.clock.milliseconds()
    }

    pub fn idle_time(&self) -> u32 {
        self.queue.idle_time(self.clock.milliseconds())
    }

    pub fn switches(&self) -> &SwitchBank<P> {
        &self.switches
    }

    pub fn switches_mut(&mut self) -> &mut SwitchBank<P> {
        &mut self.switches
    }

    pub fn engine(&self) -> &E {
        &self.io.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.io.engine
    }

    pub fn settings(&self) -> &S {
        &self.io.settings
    }

    pub fn settings_mut(&mut self) -> &mut S {
        &mut self.io.settings
    }

    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.io.controls
    }

    pub fn leds(&self) -> &L {
        &self.io.leds
    }

    /// Give the collaborator handles back.
    pub fn into_parts(self) -> (P, Collaborators<E, S, C, M, L>) {
        (self.switches.into_pins(), self.io)
    }
}

/// Queue `event`; a full queue drops it (reject-new) and logs.
fn enqueue(queue: &mut EventQueue, event: Event, now: u32) {
    if let Err(_e) = queue.push(event, now) {
        #[cfg(feature = "defmt")]
        defmt::warn!("UI: {}, dropped {}", _e, event);
    }
}
