//! Top-level control loop.
//!
//! One [`Application`] is built at process entry and owns the screen and
//! every device; nothing is reachable through globals.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::config::SOUND_MUTED_AT_BOOT;
use crate::diag::bus_scan::BusProbe;
use crate::diag::sensor::EnvSensor;
use crate::dispatch::{Action, ActionDispatcher, DemoRunner, MAIN_MENU};
use crate::exercises::{Clock, Storage, Transport};
use crate::ui::controller::MenuController;
use crate::ui::overlay::{MuteControl, ToggleOverlay};
use crate::ui::surface::Surface;
use crate::ui::{ButtonState, NavInput, Screen, TouchSource};

/// The concrete collaborators of one hardware target (or test rig).
pub trait Board {
    type Surface: Surface;
    type Touch: TouchSource;
    type Audio: MuteControl;
    type Nav: NavInput;
    type Buttons: ButtonState;
    type Probe: BusProbe;
    type Sensor: EnvSensor;
    type Storage: Storage;
    type Transport: Transport;
    type Servo: OutputPin;
    type Delay: DelayNs;
    type Clock: Clock;
    type Demos: DemoRunner<Self::Surface, Self::Touch, Self::Audio>;
}

/// Everything besides the screen that handlers may borrow.
pub struct Devices<B: Board> {
    pub nav: B::Nav,
    pub buttons: B::Buttons,
    pub probe: B::Probe,
    pub sensor: B::Sensor,
    pub storage: B::Storage,
    pub transport: B::Transport,
    pub servo: B::Servo,
    pub delay: B::Delay,
    pub clock: B::Clock,
    pub demos: B::Demos,
}

pub struct Application<B: Board> {
    screen: Screen<B::Surface, B::Touch, B::Audio>,
    devices: Devices<B>,
    menu: MenuController<'static>,
    dispatcher: ActionDispatcher<'static>,
}

impl<B: Board> Application<B> {
    /// Build the application; the sound overlay is placed in the
    /// bottom-right corner and synced to the audio path right away.
    pub fn new(surface: B::Surface, touch: B::Touch, audio: B::Audio, devices: Devices<B>) -> Self {
        let overlay = ToggleOverlay::bottom_right(surface.size(), SOUND_MUTED_AT_BOOT, audio);
        Self {
            screen: Screen::new(surface, touch, overlay),
            devices,
            menu: MenuController::new(&MAIN_MENU),
            dispatcher: ActionDispatcher::default(),
        }
    }

    pub fn screen(&mut self) -> &mut Screen<B::Surface, B::Touch, B::Audio> {
        &mut self.screen
    }

    pub fn devices(&mut self) -> &mut Devices<B> {
        &mut self.devices
    }

    /// One menu invocation followed by the selected handler, if any.
    ///
    /// The menu resumes where the previous invocation left its cursor.
    /// Handlers are bound to root rows only; a confirmation inside a
    /// submenu dispatches nothing.
    pub async fn step(&mut self) -> Option<Action> {
        let confirmed = self
            .menu
            .run(&mut self.screen, &mut self.devices.nav, &mut self.devices.delay)
            .await;
        if !confirmed {
            return None;
        }
        let Some(index) = self.menu.root_selection() else {
            warn!("Menu: no handler for submenu row {}", self.menu.current_position());
            return None;
        };
        self.dispatcher.dispatch(index, &mut self.screen, &mut self.devices).await
    }

    pub async fn run(&mut self) -> ! {
        info!("touchdeck: running");
        loop {
            self.step().await;
        }
    }
}
