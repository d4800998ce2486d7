//! 1 kHz panel tick loop for embassy firmware.
//!
//! [`panel_task`] is a plain generic `async fn`; embassy tasks cannot be
//! generic, so the board wraps it in a concrete task:
//!
//! ```ignore
//! static FACTORY: FactoryLink = FactoryLink::new();
//!
//! #[embassy_executor::task]
//! async fn ui_task(mut ui: Panel) {
//!     panel_task(&mut ui, &FACTORY).await
//! }
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Ticker};

use crate::config::TICK_HZ;
use crate::controls::ControlInputs;
use crate::engine::{AudioEngine, LevelMeter};
use crate::leds::LedRenderer;
use crate::settings::Settings;
use crate::switches::SwitchSampler;
use crate::ui::UiController;

/// Pending factory-test bytes in each direction.
const FACTORY_LINK_DEPTH: usize = 4;

/// Request / reply byte channels between the factory-test transport and
/// the panel.
pub struct FactoryLink {
    pub requests: Channel<CriticalSectionRawMutex, u8, FACTORY_LINK_DEPTH>,
    pub replies: Channel<CriticalSectionRawMutex, u8, FACTORY_LINK_DEPTH>,
}

impl FactoryLink {
    pub const fn new() -> Self {
        Self {
            requests: Channel::new(),
            replies: Channel::new(),
        }
    }
}

impl Default for FactoryLink {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `poll` + `do_events` every tick and answer at most one factory
/// request per tick. Never blocks on the link; a full reply channel drops
/// the reply.
pub async fn panel_task<P, E, S, C, M, L>(
    ui: &mut UiController<P, E, S, C, M, L>,
    link: &FactoryLink,
) -> !
where
    P: SwitchSampler,
    E: AudioEngine,
    S: Settings,
    C: ControlInputs,
    M: LevelMeter,
    L: LedRenderer,
{
    #[cfg(feature = "defmt")]
    defmt::info!("UI: panel task started, mode {}", ui.mode());

    let mut ticker = Ticker::every(Duration::from_hz(TICK_HZ));
    loop {
        ticker.next().await;

        ui.poll();
        ui.do_events();

        if let Ok(request) = link.requests.try_receive() {
            let reply = ui.handle_factory_testing_request(request);
            if link.replies.try_send(reply).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("UI: factory reply dropped");
            }
        }
    }
}
