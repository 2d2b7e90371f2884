//! Timed modal notice.
//!
//! While a notice is up the render/input pass keeps running, so the sound
//! overlay stays tappable.

use embedded_graphics::geometry::Point;
use embedded_hal_async::delay::DelayNs;

use super::overlay::MuteControl;
use super::surface::{Font, Surface};
use super::{Screen, TouchSource};
use crate::config::{NOTICE_DURATION_MS, NOTICE_FRAME_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Notice<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub duration_ms: u32,
}

impl<'a> Notice<'a> {
    pub const fn new(title: &'a str, message: &'a str) -> Self {
        Self {
            title,
            message,
            duration_ms: NOTICE_DURATION_MS,
        }
    }

    pub const fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    fn render<S: Surface>(&self, surface: &mut S) {
        let size = surface.size();
        let large = Font::Large;
        let small = Font::Small;
        let center = |text: &str, font: Font| {
            let width = text.len() as i32 * font.char_width();
            (size.width as i32 - width).max(0) / 2
        };

        let y = size.height as i32 / 2 - large.line_height();
        surface.draw_text(
            Point::new(center(self.title, large), y),
            self.title,
            large,
        );
        surface.draw_text(
            Point::new(center(self.message, small), y + large.line_height() + 4),
            self.message,
            small,
        );
    }

    /// Keep the notice on screen for its duration, one frame at a time.
    pub async fn show<S, T, A, D>(&self, screen: &mut Screen<S, T, A>, delay: &mut D)
    where
        S: Surface,
        T: TouchSource,
        A: MuteControl,
        D: DelayNs,
    {
        debug!("Notice: {}", self.title);
        let mut elapsed = 0u32;
        loop {
            screen.begin_frame();
            self.render(screen.surface());
            screen.present().await;
            if elapsed >= self.duration_ms {
                break;
            }
            let slice = NOTICE_FRAME_MS.min(self.duration_ms - elapsed);
            delay.delay_ms(slice).await;
            elapsed += slice;
        }
    }
}
