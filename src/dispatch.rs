//! Main menu table and confirmed-selection dispatch.
//!
//! Every menu row maps to exactly one [`Action`] at the same index. The
//! selected handler owns the screen until it returns; control then always
//! goes back to the menu.

use core::fmt::{self, Write};

use crate::app::{Board, Devices};
use crate::config::{SD_TEST_REPEAT, SERVO_PULSE_COUNT};
use crate::diag::DiagnosticLoop;
use crate::exercises::{sd_write_test, servo_pulse_test, usb_transmit_test, Exercise};
use crate::error::Result;
use crate::ui::label::LabelWriter;
use crate::ui::menu::{Menu, MenuEntry};
use crate::ui::Screen;

/// Full-screen routines implemented outside this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Routine {
    Tetris,
    Pong,
    Gario,
    Calc,
    GraphicDemo,
    InputTest,
    TouchCalibrate,
}

/// Handler behind one main menu row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    External(Routine),
    Diagnostics,
    SdWrite,
    UsbTransmit,
    ServoPulse,
}

/// Runs the external routines (games, demos, touch calibration).
///
/// The runner gets the screen for the duration of the call, so the sound
/// overlay keeps working as long as it calls [`Screen::present`].
#[allow(async_fn_in_trait)]
pub trait DemoRunner<S, T, A> {
    async fn run(&mut self, routine: Routine, screen: &mut Screen<S, T, A>);
}

fn servo_label(w: &mut LabelWriter<'_>, pulses: u32) -> fmt::Result {
    write!(w, "Servo test ({} pulses)", pulses)
}

fn sd_label(w: &mut LabelWriter<'_>, repeat: u32) -> fmt::Result {
    write!(w, "SD write test (x{})", repeat)
}

const MAIN_ENTRIES: [MenuEntry<'static>; 11] = [
    MenuEntry::new("Tetris"),
    MenuEntry::new("Pong"),
    MenuEntry::new("Gario"),
    MenuEntry::new("Calc"),
    MenuEntry::new("Graphic demo"),
    MenuEntry::new("Input test"),
    MenuEntry::generated("SD write test", &sd_label, SD_TEST_REPEAT),
    MenuEntry::new("USB test"),
    MenuEntry::generated("Servo test", &servo_label, SERVO_PULSE_COUNT),
    MenuEntry::new("Touch calibrate"),
    MenuEntry::new("I2C Ping"),
];

/// Handlers, index-aligned with the rows of [`MAIN_MENU`].
pub const MAIN_ACTIONS: [Action; 11] = [
    Action::External(Routine::Tetris),
    Action::External(Routine::Pong),
    Action::External(Routine::Gario),
    Action::External(Routine::Calc),
    Action::External(Routine::GraphicDemo),
    Action::External(Routine::InputTest),
    Action::SdWrite,
    Action::UsbTransmit,
    Action::ServoPulse,
    Action::External(Routine::TouchCalibrate),
    Action::Diagnostics,
];

const _: () = assert!(MAIN_ENTRIES.len() == MAIN_ACTIONS.len());

pub const MAIN_MENU: Menu<'static> = Menu::new("Main Menu", &MAIN_ENTRIES);

/// Index to handler lookup plus invocation.
pub struct ActionDispatcher<'a> {
    actions: &'a [Action],
}

impl Default for ActionDispatcher<'static> {
    fn default() -> Self {
        Self::new(&MAIN_ACTIONS)
    }
}

impl<'a> ActionDispatcher<'a> {
    pub const fn new(actions: &'a [Action]) -> Self {
        Self { actions }
    }

    pub fn action_at(&self, index: usize) -> Option<Action> {
        self.actions.get(index).copied()
    }

    /// Run the handler registered at `index`; returns the action that ran.
    pub async fn dispatch<B: Board>(
        &self,
        index: usize,
        screen: &mut Screen<B::Surface, B::Touch, B::Audio>,
        devices: &mut Devices<B>,
    ) -> Option<Action> {
        let Some(action) = self.action_at(index) else {
            warn!("Dispatch: no handler at index {}", index);
            return None;
        };
        info!("Dispatch: {}", action);
        run_action(action, screen, devices).await;
        Some(action)
    }
}

async fn run_action<B: Board>(
    action: Action,
    screen: &mut Screen<B::Surface, B::Touch, B::Audio>,
    devices: &mut Devices<B>,
) {
    match action {
        Action::External(routine) => devices.demos.run(routine, screen).await,
        Action::Diagnostics => {
            let mut diag = DiagnosticLoop::new(&mut devices.probe, &mut devices.sensor);
            diag.run(screen, &mut devices.buttons, &mut devices.delay).await;
        }
        Action::SdWrite => {
            let result = sd_write_test(&mut devices.storage, &devices.clock).await;
            report(Exercise::SdWrite, &result, screen, devices).await;
        }
        Action::UsbTransmit => {
            let result =
                usb_transmit_test(&mut devices.transport, &devices.clock, &mut devices.delay)
                    .await;
            report(Exercise::UsbTransmit, &result, screen, devices).await;
        }
        Action::ServoPulse => {
            let result = servo_pulse_test(&mut devices.servo, &mut devices.delay).await;
            report(Exercise::ServoPulse, &result, screen, devices).await;
        }
    }
}

async fn report<B: Board, T>(
    exercise: Exercise,
    result: &Result<T>,
    screen: &mut Screen<B::Surface, B::Touch, B::Audio>,
    devices: &mut Devices<B>,
) {
    match result {
        Ok(_) => info!("{}: ok", exercise),
        Err(e) => warn!("{}: {}", exercise, e),
    }
    exercise.notice(result).show(screen, &mut devices.delay).await;
}
