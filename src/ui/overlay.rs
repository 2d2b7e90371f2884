//! Persistent sound on/off overlay.
//!
//! The overlay sits above whatever handler owns the screen and reacts to a
//! tap synchronously: flip state, swap glyph, push the new state to the
//! audio collaborator, all before the touch dispatch returns.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::{ContainsPoint, Rectangle};

use super::assets::{Bitmap, SOUND_MUTED, SOUND_ON};
use super::surface::Surface;
use super::{TouchAction, TouchEvent};
use crate::config::OVERLAY_GLYPH_SIZE;

/// External mute control (speaker amplifier, codec, ...).
pub trait MuteControl {
    fn set_muted(&mut self, muted: bool);
}

pub struct ToggleOverlay<A> {
    origin: Point,
    muted: bool,
    glyph: &'static Bitmap,
    audio: A,
}

fn glyph_for(muted: bool) -> &'static Bitmap {
    if muted {
        &SOUND_MUTED
    } else {
        &SOUND_ON
    }
}

impl<A: MuteControl> ToggleOverlay<A> {
    /// Place the overlay at `origin` with the given initial state.
    ///
    /// The glyph is chosen from `muted` and the state is pushed to `audio`
    /// right away, so display and audio agree from the first frame.
    pub fn new(origin: Point, muted: bool, mut audio: A) -> Self {
        audio.set_muted(muted);
        Self {
            origin,
            muted,
            glyph: glyph_for(muted),
            audio,
        }
    }

    /// Place the overlay in the bottom-right corner of a screen of `screen` size.
    pub fn bottom_right(screen: Size, muted: bool, audio: A) -> Self {
        let origin = Point::new(
            screen.width.saturating_sub(OVERLAY_GLYPH_SIZE) as i32,
            screen.height.saturating_sub(OVERLAY_GLYPH_SIZE) as i32,
        );
        Self::new(origin, muted, audio)
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn glyph(&self) -> &'static Bitmap {
        self.glyph
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(self.origin, Size::new(self.glyph.width, self.glyph.height))
    }

    /// Route a touch event to the overlay if it lands inside its bounds.
    /// Returns `true` when the event was consumed.
    pub fn dispatch<S: Surface>(&mut self, event: TouchEvent, surface: &mut S) -> bool {
        if !self.bounds().contains(event.point) {
            return false;
        }
        self.action(event.action, surface);
        true
    }

    /// React to a gesture. Only a tap changes state.
    ///
    /// `surface` is the caller's borrow of the display; the overlay draws
    /// through it and never acquires the display itself.
    pub fn action<S: Surface>(&mut self, action: TouchAction, surface: &mut S) {
        match action {
            TouchAction::Touch => {
                self.muted = !self.muted;
                self.glyph = glyph_for(self.muted);
                surface.draw_bitmap(self.origin, self.glyph);
                self.audio.set_muted(self.muted);
                info!("Overlay: muted={}", self.muted);
            }
            TouchAction::Untouch | TouchAction::Move => {}
        }
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        surface.draw_bitmap(self.origin, self.glyph);
    }
}
