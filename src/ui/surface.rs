//! Drawing seam between the control loop and the display driver.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_8X13};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use heapless::{String, Vec};

use super::assets::Bitmap;

/// Text sizes available to the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// 6 px wide cells, used for dense grids and menu rows.
    Small,
    /// 8 px wide cells, used for titles and readings.
    Large,
}

impl Font {
    fn mono(self) -> &'static MonoFont<'static> {
        match self {
            Font::Small => &FONT_6X10,
            Font::Large => &FONT_8X13,
        }
    }

    /// Height of one text line in pixels.
    pub fn line_height(self) -> i32 {
        self.mono().character_size.height as i32
    }

    /// Width of one character cell in pixels.
    pub fn char_width(self) -> i32 {
        self.mono().character_size.width as i32
    }
}

/// What the UI needs from a display: clear, text, palette bitmaps, flush.
pub trait Surface {
    fn size(&self) -> Size;
    fn clear(&mut self);
    /// Draw `text` with its top-left corner at `origin`.
    fn draw_text(&mut self, origin: Point, text: &str, font: Font);
    /// Draw a palette bitmap, skipping pixels equal to its transparent key.
    fn draw_bitmap(&mut self, origin: Point, bitmap: &Bitmap);
    fn flush(&mut self);
}

/// Most draw operations one frame can hold before the surface falls back
/// to painting directly.
const RETAINED_OPS: usize = 24;
/// Longest text run a retained operation can hold.
const RETAINED_TEXT: usize = 64;

/// One recorded draw call.
#[derive(Clone, PartialEq)]
enum DrawOp {
    Text {
        origin: Point,
        font: Font,
        text: String<RETAINED_TEXT>,
    },
    Bitmap { origin: Point, bitmap: Bitmap },
}

impl DrawOp {
    /// Pixels the operation may touch.
    fn bounds(&self) -> Rectangle {
        match self {
            DrawOp::Text { origin, font, text } => {
                let width = text.chars().count() as u32 * font.char_width() as u32;
                Rectangle::new(*origin, Size::new(width, font.line_height() as u32))
            }
            DrawOp::Bitmap { origin, bitmap } => {
                Rectangle::new(*origin, Size::new(bitmap.width, bitmap.height))
            }
        }
    }

    /// Two bitmaps over the same rectangle; the later one replaces the earlier.
    fn same_slot(&self, other: &DrawOp) -> bool {
        matches!((self, other), (DrawOp::Bitmap { .. }, DrawOp::Bitmap { .. }))
            && self.bounds() == other.bounds()
    }

    fn paint<D>(&self, target: &mut D, foreground: Rgb565)
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match self {
            DrawOp::Text { origin, font, text } => paint_text(target, *origin, text, *font, foreground),
            DrawOp::Bitmap { origin, bitmap } => paint_bitmap(target, *origin, bitmap),
        }
    }
}

fn paint_text<D>(target: &mut D, origin: Point, text: &str, font: Font, foreground: Rgb565)
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyle::new(font.mono(), foreground);
    let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(target);
}

fn paint_bitmap<D>(target: &mut D, origin: Point, bitmap: &Bitmap)
where
    D: DrawTarget<Color = Rgb565>,
{
    let pixels = bitmap.opaque_pixels().map(|(x, y, index)| {
        Pixel(
            origin + Point::new(x as i32, y as i32),
            palette_676(index),
        )
    });
    let _ = target.draw_iter(pixels);
}

/// An operation is painted when it is new, or when it overlaps an area
/// that is erased or newly painted in the same flush.
fn needs_paint(op: &DrawOp, shown: &[DrawOp], pending: &[DrawOp]) -> bool {
    if !shown.contains(op) {
        return true;
    }
    let bounds = op.bounds();
    let overlaps = |other: &DrawOp| !bounds.intersection(&other.bounds()).is_zero_sized();
    shown.iter().filter(|o| !pending.contains(o)).any(overlaps)
        || pending.iter().filter(|o| !shown.contains(o)).any(overlaps)
}

/// [`Surface`] on top of any RGB565 `embedded-graphics` draw target.
///
/// Draw calls are recorded between `clear` and `flush`. The first flush
/// paints the whole screen; later flushes compare the frame with the one on
/// the display, erase what went away and paint only what changed, so a menu
/// sitting idle writes no pixels at all. A frame that does not fit the
/// record is painted directly after a full clear.
///
/// Draw errors are ignored the same way a dropped frame is.
pub struct EgSurface<D> {
    target: D,
    background: Rgb565,
    foreground: Rgb565,
    pending: Vec<DrawOp, RETAINED_OPS>,
    shown: Vec<DrawOp, RETAINED_OPS>,
    full_repaint: bool,
    immediate: bool,
}

impl<D> EgSurface<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    pub fn new(target: D) -> Self {
        Self {
            target,
            background: Rgb565::BLACK,
            foreground: Rgb565::WHITE,
            pending: Vec::new(),
            shown: Vec::new(),
            full_repaint: true,
            immediate: false,
        }
    }

    pub fn target(&mut self) -> &mut D {
        &mut self.target
    }

    fn record(&mut self, op: DrawOp) {
        if self.immediate {
            op.paint(&mut self.target, self.foreground);
            return;
        }
        if self.pending.contains(&op) {
            return;
        }
        if let Some(slot) = self.pending.iter_mut().find(|p| p.same_slot(&op)) {
            *slot = op;
            return;
        }
        if let Err(op) = self.pending.push(op) {
            self.paint_directly();
            op.paint(&mut self.target, self.foreground);
        }
    }

    /// Give up on diffing for the rest of this frame.
    fn paint_directly(&mut self) {
        warn!("Surface: frame too large to retain, repainting directly");
        self.immediate = true;
        let _ = self.target.clear(self.background);
        for op in self.pending.iter() {
            op.paint(&mut self.target, self.foreground);
        }
    }
}

impl<D> Surface for EgSurface<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    fn size(&self) -> Size {
        self.target.size()
    }

    fn clear(&mut self) {
        if self.immediate {
            self.immediate = false;
            self.full_repaint = true;
        }
        self.pending.clear();
    }

    fn draw_text(&mut self, origin: Point, text: &str, font: Font) {
        let mut retained = String::new();
        if retained.push_str(text).is_err() {
            if !self.immediate {
                self.paint_directly();
            }
            paint_text(&mut self.target, origin, text, font, self.foreground);
            return;
        }
        self.record(DrawOp::Text {
            origin,
            font,
            text: retained,
        });
    }

    fn draw_bitmap(&mut self, origin: Point, bitmap: &Bitmap) {
        self.record(DrawOp::Bitmap {
            origin,
            bitmap: *bitmap,
        });
    }

    fn flush(&mut self) {
        if self.immediate {
            // Whatever the display shows now is not in the record.
            self.immediate = false;
            self.full_repaint = true;
            return;
        }
        if self.full_repaint {
            self.full_repaint = false;
            let _ = self.target.clear(self.background);
            for op in self.pending.iter() {
                op.paint(&mut self.target, self.foreground);
            }
        } else {
            let screen = self.target.bounding_box();
            for old in self.shown.iter().filter(|op| !self.pending.contains(op)) {
                let area = old.bounds().intersection(&screen);
                let _ = self.target.fill_solid(&area, self.background);
            }
            for op in self.pending.iter() {
                if needs_paint(op, &self.shown, &self.pending) {
                    op.paint(&mut self.target, self.foreground);
                }
            }
        }
        self.shown = self.pending.clone();
    }
}

/// Map an index of the 6-7-6 palette (6 red, 7 green, 6 blue levels) to RGB565.
pub fn palette_676(index: u8) -> Rgb565 {
    let index = index.min(251) as u16;
    let r = index / 42;
    let g = (index / 6) % 7;
    let b = index % 6;
    Rgb565::new((r * 31 / 5) as u8, (g * 63 / 6) as u8, (b * 31 / 5) as u8)
}
