//! Integration tests for the public panel API, with `embedded-hal` pins.

use core::cell::Cell;
use core::convert::Infallible;
use core::sync::atomic::AtomicU16;

use clouds_panel::controls::ControlInputs;
use clouds_panel::engine::PlaybackMode;
use clouds_panel::{
    AudioEngine, Collaborators, EngineParameters, Error, LedFrame, PresetLocation, RamSettings,
    Settings, SwitchId, UiController, UiMode,
};
use embedded_hal::digital::{ErrorType, InputPin};

/// Active-low pin reading a shared level.
struct Pin<'a>(&'a Cell<bool>);

impl ErrorType for Pin<'_> {
    type Error = Infallible;
}

impl InputPin for Pin<'_> {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

/// Knob side with nothing moving and calibration always passing.
#[derive(Default)]
struct QuietControls;

impl ControlInputs for QuietControls {
    fn adc_value(&self, channel: u8) -> u8 {
        channel
    }

    fn gate(&self, _index: u8) -> bool {
        false
    }

    fn blend_knob_touched(&mut self) -> bool {
        false
    }

    fn unlock_blend_knob(&mut self) {}

    fn calibrate_c1(&mut self) {}

    fn calibrate_offsets(&mut self) {}

    fn calibrate_c3(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

struct Bench {
    levels: [Cell<bool>; 4],
    peak: AtomicU16,
}

impl Bench {
    fn new() -> Self {
        Self {
            levels: [Cell::new(true), Cell::new(true), Cell::new(true), Cell::new(true)],
            peak: AtomicU16::new(0),
        }
    }

    fn panel(
        &self,
    ) -> UiController<[Pin<'_>; 4], EngineParameters, RamSettings, QuietControls, &AtomicU16, LedFrame>
    {
        let pins = [
            Pin(&self.levels[0]),
            Pin(&self.levels[1]),
            Pin(&self.levels[2]),
            Pin(&self.levels[3]),
        ];
        UiController::new(
            pins,
            Collaborators {
                engine: EngineParameters::new(),
                settings: RamSettings::new(),
                controls: QuietControls,
                meter: &self.peak,
                leds: LedFrame::new(),
            },
        )
    }

    fn hold(&self, id: SwitchId, pressed: bool) {
        self.levels[id.index()].set(!pressed);
    }
}

fn run<P, C>(
    ui: &mut UiController<P, EngineParameters, RamSettings, C, &AtomicU16, LedFrame>,
    ticks: u32,
) where
    P: clouds_panel::SwitchSampler,
    C: ControlInputs,
{
    for _ in 0..ticks {
        ui.poll();
        ui.do_events();
    }
}

#[test]
fn splash_then_quality_cycle() {
    let bench = Bench::new();
    let mut ui = bench.panel();
    assert_eq!(ui.mode(), UiMode::Splash);

    run(&mut ui, 3001);
    assert_eq!(ui.mode(), UiMode::VuMeter);

    bench.hold(SwitchId::Mode, true);
    run(&mut ui, 40);
    bench.hold(SwitchId::Mode, false);
    run(&mut ui, 8);
    assert_eq!(ui.mode(), UiMode::Quality);

    bench.hold(SwitchId::Mode, true);
    run(&mut ui, 40);
    bench.hold(SwitchId::Mode, false);
    run(&mut ui, 8);
    assert_eq!(ui.engine().quality(), 1);
    assert_eq!(ui.settings().state().quality, 1);
    assert_eq!(ui.settings().saves(), 1);
}

#[test]
fn save_preset_and_load_it_back() {
    let bench = Bench::new();
    let mut ui = bench.panel();
    ui.engine_mut().set_playback_mode(PlaybackMode::LoopingDelay);

    // Write long: Save.
    bench.hold(SwitchId::Write, true);
    run(&mut ui, 1200);
    bench.hold(SwitchId::Write, false);
    run(&mut ui, 8);
    assert_eq!(ui.mode(), UiMode::Save);

    // Write short: commit to (0, 0).
    bench.hold(SwitchId::Write, true);
    run(&mut ui, 40);
    bench.hold(SwitchId::Write, false);
    run(&mut ui, 8);
    assert_eq!(ui.mode(), UiMode::VuMeter);
    assert_eq!(ui.settings().preset_saves(), 1);
    assert_eq!(ui.preset_location(), PresetLocation::new(0, 1));
    assert_eq!(
        ui.settings().preset(PresetLocation::new(0, 0)).playback_mode,
        PlaybackMode::LoopingDelay
    );
    assert!(!ui.engine().silenced());
}

#[test]
fn meter_peak_lights_the_bar() {
    let bench = Bench::new();
    let mut ui = bench.panel();
    run(&mut ui, 3001);
    assert_eq!(ui.mode(), UiMode::VuMeter);

    // The frame painted on the switching tick is still the splash one.
    assert!(!ui.leds().status.iter().all(|led| led.is_off()));
    run(&mut ui, 1);
    assert!(ui.leds().status.iter().all(|led| led.is_off()));

    bench.peak.store(32767, core::sync::atomic::Ordering::Relaxed);
    run(&mut ui, 1);
    assert_eq!(ui.leds().status[3].red, 255);
    assert_eq!(ui.leds().status[0].green, 255);
}

#[test]
fn factory_reads_pot_through_controls() {
    let bench = Bench::new();
    let mut ui = bench.panel();
    assert_eq!(ui.handle_factory_testing_request(0b000_00101), 5);
    assert_eq!(ui.handle_factory_testing_request(0b011_00001), 0);
    assert!(ui.engine().bypass());
}
