//! GPIO button input with async debouncing.
//!
//! Onboard buttons (active-low with internal pull-up) drive menu
//! navigation:
//!   - UP / DOWN - move the cursor
//!   - RIGHT     - select
//!   - LEFT      - back / cancel
//!
//! Each onboard button is handled by an async task that waits for a GPIO
//! edge, debounces it, and sends a [`NavEvent`] to the menu channel. The
//! task also mirrors the debounced level so [`Keypad`] can answer level
//! queries. The external keypad is read directly from its pins.

use core::sync::atomic::{AtomicU8, Ordering};

use defmt::{info, warn};
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_time::{Duration, Timer};

use touchdeck::config::BUTTON_DEBOUNCE_MS;
use touchdeck::ui::{ButtonId, ButtonState, ButtonZone, NavEvent, NavInput};

pub const NAV_QUEUE_DEPTH: usize = 4;

pub type NavChannel = Channel<CriticalSectionRawMutex, NavEvent, NAV_QUEUE_DEPTH>;

/// Debounced onboard presses, consumed by the menu.
pub static NAV_EVENTS: NavChannel = Channel::new();

/// Debounced onboard levels, one bit per [`ButtonId`].
static ONBOARD_DOWN: AtomicU8 = AtomicU8::new(0);

fn bit(button: ButtonId) -> u8 {
    match button {
        ButtonId::Left => 1 << 0,
        ButtonId::Right => 1 << 1,
        ButtonId::Up => 1 << 2,
        ButtonId::Down => 1 << 3,
    }
}

/// Navigation meaning of an onboard button.
pub fn nav_event(button: ButtonId) -> NavEvent {
    match button {
        ButtonId::Up => NavEvent::Up,
        ButtonId::Down => NavEvent::Down,
        ButtonId::Right => NavEvent::Select,
        ButtonId::Left => NavEvent::Back,
    }
}

/// Run a single button polling loop.
///
/// Waits for the pin to go low (pressed), debounces, sends the event,
/// then waits for release before repeating. A full queue drops the press.
pub async fn button_task(
    pin: AnyPin,
    button: ButtonId,
    tx: Sender<'static, CriticalSectionRawMutex, NavEvent, NAV_QUEUE_DEPTH>,
) -> ! {
    let mut btn = Input::new(pin, Pull::Up);

    loop {
        btn.wait_for_falling_edge().await;
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        if btn.is_low() {
            ONBOARD_DOWN.fetch_or(bit(button), Ordering::AcqRel);
            let event = nav_event(button);
            info!("Button: {}", event);
            if tx.try_send(event).is_err() {
                warn!("Button: nav queue full, dropped {}", event);
            }

            // Wait for release to avoid repeat triggers.
            btn.wait_for_rising_edge().await;
            Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
            ONBOARD_DOWN.fetch_and(!bit(button), Ordering::AcqRel);
        }
    }
}

/// [`NavInput`] fed by the button tasks.
pub struct ChannelNav {
    rx: Receiver<'static, CriticalSectionRawMutex, NavEvent, NAV_QUEUE_DEPTH>,
}

impl ChannelNav {
    pub fn new(channel: &'static NavChannel) -> Self {
        Self {
            rx: channel.receiver(),
        }
    }
}

impl NavInput for ChannelNav {
    fn poll_nav(&mut self) -> Option<NavEvent> {
        self.rx.try_receive().ok()
    }
}

/// External keypad pins, active-low.
pub struct ExternalPins {
    pub left: Input<'static>,
    pub right: Input<'static>,
    pub up: Input<'static>,
    pub down: Input<'static>,
}

/// [`ButtonState`] over both zones.
pub struct Keypad {
    external: ExternalPins,
}

impl Keypad {
    pub fn new(external: ExternalPins) -> Self {
        Self { external }
    }
}

impl ButtonState for Keypad {
    fn is_pressed(&mut self, zone: ButtonZone, button: ButtonId) -> bool {
        match zone {
            ButtonZone::Onboard => ONBOARD_DOWN.load(Ordering::Acquire) & bit(button) != 0,
            ButtonZone::External => {
                let pins = &self.external;
                let pin = match button {
                    ButtonId::Left => &pins.left,
                    ButtonId::Right => &pins.right,
                    ButtonId::Up => &pins.up,
                    ButtonId::Down => &pins.down,
                };
                pin.is_low()
            }
        }
    }
}

/// Configure an external keypad pin.
pub fn keypad_pin(pin: AnyPin) -> Input<'static> {
    Input::new(pin, Pull::Up)
}
