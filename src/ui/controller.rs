//! Menu selection protocol.
//!
//! Each pass renders the visible window, runs the screen's render/input
//! dispatch, then consumes at most one navigation event. Between passes the
//! controller yields for one frame period.

use core::fmt::Write;

use embedded_graphics::geometry::Point;
use embedded_hal_async::delay::DelayNs;
use heapless::String;

use super::menu::{Menu, MenuModel, MenuStep};
use super::overlay::MuteControl;
use super::surface::{Font, Surface};
use super::{NavInput, Screen, TouchSource};
use crate::config::{LABEL_CAPACITY, MENU_FRAME_MS};

/// Cursor marker plus label.
type Row = String<{ LABEL_CAPACITY + 2 }>;

pub struct MenuController<'a> {
    model: MenuModel<'a>,
}

impl<'a> MenuController<'a> {
    pub fn new(root: &'a Menu<'a>) -> Self {
        Self {
            model: MenuModel::new(root),
        }
    }

    pub fn model(&self) -> &MenuModel<'a> {
        &self.model
    }

    /// Cursor of the last pass, always within `[0, count)` of the current
    /// menu once [`run`](Self::run) returned `true`.
    pub fn current_position(&self) -> usize {
        self.model.cursor()
    }

    /// Confirmed row of the root menu, or `None` when the cursor sits in a
    /// submenu.
    pub fn root_selection(&self) -> Option<usize> {
        (self.model.depth() == 0).then(|| self.model.cursor())
    }

    /// Run the selection protocol until an entry is confirmed (`true`) or
    /// Back is pressed at the root menu (`false`).
    ///
    /// The cursor and submenu stack carry over from the previous run.
    pub async fn run<S, T, A, N, D>(
        &mut self,
        screen: &mut Screen<S, T, A>,
        nav: &mut N,
        delay: &mut D,
    ) -> bool
    where
        S: Surface,
        T: TouchSource,
        A: MuteControl,
        N: NavInput,
        D: DelayNs,
    {
        self.model.rearm();
        loop {
            screen.begin_frame();
            self.render(screen.surface());
            screen.present().await;

            if let Some(event) = nav.poll_nav() {
                match self.model.apply(event) {
                    MenuStep::Confirmed => {
                        info!("Menu: confirmed entry {}", self.model.cursor());
                        return true;
                    }
                    MenuStep::Cancelled => {
                        info!("Menu: cancelled");
                        return false;
                    }
                    _ => {}
                }
            }

            delay.delay_ms(MENU_FRAME_MS).await;
        }
    }

    /// Draw the title and the visible entries, marking the cursor row.
    pub fn render<S: Surface>(&self, surface: &mut S) {
        let title_height = Font::Large.line_height();
        let row_height = Font::Small.line_height() + 2;
        surface.draw_text(Point::zero(), self.model.menu().title, Font::Large);

        let mut y = title_height + row_height / 2;
        for (index, entry) in self.model.visible() {
            // Scoped to this row; never shared between entries or frames.
            let mut buf = [0u8; LABEL_CAPACITY];
            let label = entry.resolve(&mut buf);

            let mut row = Row::new();
            let marker = if index == self.model.cursor() { '>' } else { ' ' };
            let _ = write!(row, "{} {}", marker, label);
            surface.draw_text(Point::new(0, y), &row, Font::Small);
            y += row_height;
        }
    }
}
