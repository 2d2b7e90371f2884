//! User interface subsystem - TFT surface, touch overlay and navigation keys.
//!
//! Whoever currently runs (menu, diagnostics, an external demo) owns the
//! [`Screen`] exclusively and calls [`Screen::present`] at its suspension
//! points. `present` is the render/input dispatch pass: it drains touch
//! events, routes taps to the sound overlay and flushes the frame, so the
//! overlay reacts no matter which handler is active.
//!
//! ## Components
//!
//! - **Surface**: text/bitmap drawing seam over `embedded-graphics`
//! - **Menu**: model, label generators and the selection controller
//! - **Overlay**: persistent mute toggle bound to the audio collaborator
//! - **Notice**: timed modal message box

pub mod assets;
pub mod controller;
pub mod input_logic;
pub mod label;
pub mod menu;
pub mod notice;
pub mod overlay;
pub mod surface;

use embedded_graphics::geometry::Point;

use crate::config::TOUCH_EVENTS_PER_PASS;
use overlay::{MuteControl, ToggleOverlay};
use surface::Surface;

/// Navigation key events (after debouncing).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavEvent {
    Up,
    Down,
    /// Confirm gesture.
    Select,
    /// Leave a submenu; at the root menu this is the cancel gesture.
    Back,
}

/// Source of navigation events, polled once per menu pass.
pub trait NavInput {
    fn poll_nav(&mut self) -> Option<NavEvent>;
}

/// Logical input zones of the button driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonZone {
    /// Buttons on the main board.
    Onboard,
    /// Buttons on the external keypad connector.
    External,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Left,
    Right,
    Up,
    Down,
}

/// Level query for a logical button.
pub trait ButtonState {
    fn is_pressed(&mut self, zone: ButtonZone, button: ButtonId) -> bool;
}

/// Kind of touch gesture reported by the touch controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchAction {
    /// Finger down (tap).
    Touch,
    /// Finger lifted.
    Untouch,
    /// Finger moved while down.
    Move,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub point: Point,
}

impl TouchEvent {
    pub const fn new(action: TouchAction, x: i32, y: i32) -> Self {
        Self {
            action,
            point: Point::new(x, y),
        }
    }
}

/// Source of touch events, drained during every render/input pass.
#[allow(async_fn_in_trait)]
pub trait TouchSource {
    async fn poll_touch(&mut self) -> Option<TouchEvent>;
}

/// The display plus everything that lives on it independent of the active
/// handler.
pub struct Screen<S, T, A> {
    surface: S,
    touch: T,
    overlay: ToggleOverlay<A>,
}

impl<S, T, A> Screen<S, T, A>
where
    S: Surface,
    T: TouchSource,
    A: MuteControl,
{
    pub fn new(surface: S, touch: T, overlay: ToggleOverlay<A>) -> Self {
        Self {
            surface,
            touch,
            overlay,
        }
    }

    pub fn surface(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn overlay(&self) -> &ToggleOverlay<A> {
        &self.overlay
    }

    /// Start a new frame: clear the surface.
    pub fn begin_frame(&mut self) {
        self.surface.clear();
    }

    /// One render/input dispatch pass.
    ///
    /// Up to [`TOUCH_EVENTS_PER_PASS`] pending touch events are handed to the overlay with the surface already
    /// borrowed here; the overlay draws through that borrow and never
    /// acquires the display on its own.
    pub async fn present(&mut self) {
        for _ in 0..TOUCH_EVENTS_PER_PASS {
            let Some(event) = self.touch.poll_touch().await else {
                break;
            };
            trace!("touch {} at ({}, {})", event.action, event.point.x, event.point.y);
            self.overlay.dispatch(event, &mut self.surface);
        }
        self.overlay.draw(&mut self.surface);
        self.surface.flush();
    }
}
