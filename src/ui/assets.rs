//! Bitmap resources for the sound overlay.
//!
//! 28×28, 8 bits per pixel, indices into the 6-7-6 palette
//! (see [`super::surface::palette_676`]). Index `0xD7` (magenta) is the
//! transparent key.

use crate::config::OVERLAY_GLYPH_SIZE;

/// Palette index treated as transparent in overlay glyphs.
pub const TRANSPARENT_INDEX: u8 = 0xD7;

/// A palette-indexed bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u8,
    /// Row-major palette indices, `width * height` bytes.
    pub pixels: &'static [u8],
    /// Palette index that is not drawn.
    pub transparent: Option<u8>,
}

impl Bitmap {
    /// Iterate `(x, y, palette index)` for every pixel that is not transparent.
    pub fn opaque_pixels(&self) -> impl Iterator<Item = (u32, u32, u8)> + '_ {
        let width = self.width.max(1);
        self.pixels
            .iter()
            .take((self.width * self.height) as usize)
            .enumerate()
            .filter(move |&(_, &index)| Some(index) != self.transparent)
            .map(move |(i, &index)| (i as u32 % width, i as u32 / width, index))
    }
}

/// Speaker with sound waves: audio enabled.
pub static SOUND_ON: Bitmap = Bitmap {
    width: OVERLAY_GLYPH_SIZE,
    height: OVERLAY_GLYPH_SIZE,
    bits_per_pixel: 8,
    pixels: &SOUND_ON_PIXELS,
    transparent: Some(TRANSPARENT_INDEX),
};

/// Speaker without waves: audio muted.
pub static SOUND_MUTED: Bitmap = Bitmap {
    width: OVERLAY_GLYPH_SIZE,
    height: OVERLAY_GLYPH_SIZE,
    bits_per_pixel: 8,
    pixels: &SOUND_MUTED_PIXELS,
    transparent: Some(TRANSPARENT_INDEX),
};

#[rustfmt::skip]
static SOUND_ON_PIXELS: [u8; 784] = [
    0xD7, 0xD7, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB,
    0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xD7, 0xD7,
    0xD7, 0xFB, 0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB, 0xFB, 0xD7,
    0xFB, 0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x31, 0x62, 0x68, 0x68, 0x62, 0x31,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x68, 0x93, 0x93, 0x69, 0x93, 0x93, 0x93,
    0x68, 0x37, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x00, 0x31, 0x93, 0x68, 0x99, 0xC4, 0xCA, 0xC4, 0x99, 0x68,
    0x69, 0x68, 0x62, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x31, 0x93, 0x93, 0xCB, 0xFB, 0xCA, 0xCA, 0xCA, 0xFB, 0xFB,
    0x99, 0x68, 0x68, 0x62, 0x37, 0x68, 0x62, 0x68, 0x31, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x93, 0x99, 0xFB, 0xC4, 0x93, 0x68, 0x93, 0x93, 0x99, 0xCA,
    0xFB, 0xC4, 0x68, 0x68, 0x62, 0x62, 0x93, 0x68, 0x99, 0x62, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x38, 0x93, 0xFB, 0x99, 0x68, 0x93, 0x99, 0x99, 0x99, 0x99, 0x99,
    0xC4, 0xFB, 0xC4, 0x68, 0x68, 0x31, 0x99, 0x93, 0x68, 0x99, 0x31, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x68, 0xCA, 0xC4, 0x68, 0x93, 0x99, 0x99, 0x99, 0x9A, 0xC4, 0xC4,
    0x99, 0xCA, 0xFB, 0x93, 0x68, 0x62, 0x62, 0x99, 0x68, 0x99, 0x93, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x31, 0x93, 0xF5, 0x68, 0x93, 0x99, 0x99, 0x99, 0xC4, 0xC4, 0xC4, 0xCA,
    0x99, 0x68, 0xCA, 0xCA, 0x62, 0x68, 0x31, 0x99, 0x93, 0x93, 0x99, 0x31, 0x00, 0xFB,
    0xFB, 0x00, 0x62, 0x99, 0xC4, 0x69, 0x93, 0x99, 0x99, 0xC4, 0xC4, 0xCA, 0xCA, 0x99,
    0x93, 0x93, 0x99, 0xFB, 0x93, 0x68, 0x37, 0x99, 0xC4, 0x68, 0xC4, 0x37, 0x00, 0xFB,
    0xFB, 0x00, 0x62, 0xCA, 0x93, 0x93, 0x99, 0x99, 0xC4, 0xC4, 0xCA, 0xCA, 0xCA, 0x99,
    0xC4, 0xC4, 0x68, 0xFB, 0x9A, 0x62, 0x62, 0x68, 0xC4, 0x62, 0x93, 0x37, 0x00, 0xFB,
    0xFB, 0x00, 0x68, 0xFB, 0x68, 0x93, 0x99, 0x99, 0x99, 0xC4, 0xCA, 0xCA, 0x99, 0x93,
    0xC4, 0x99, 0x62, 0xCA, 0xCA, 0x99, 0x93, 0x38, 0x68, 0x38, 0x68, 0x31, 0x00, 0xFB,
    0xFB, 0x00, 0x68, 0xFB, 0x68, 0x93, 0x93, 0x99, 0x99, 0x99, 0xC4, 0xCA, 0x99, 0x37,
    0x68, 0x99, 0xCA, 0x94, 0x64, 0x64, 0x6A, 0xC5, 0xC4, 0x38, 0x62, 0x31, 0x00, 0xFB,
    0xFB, 0x00, 0x62, 0xF5, 0x68, 0x93, 0x93, 0x93, 0x99, 0xC4, 0xCA, 0xCA, 0xCA, 0x31,
    0x99, 0x9B, 0x34, 0x34, 0x3A, 0x3A, 0x3A, 0x34, 0x64, 0xCA, 0x62, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x62, 0xCA, 0x93, 0x93, 0x93, 0x99, 0xC4, 0xCA, 0xCA, 0xCA, 0xFB, 0xCA,
    0x9B, 0x34, 0x3A, 0x3A, 0x3A, 0x3A, 0x3A, 0x64, 0x3A, 0x3A, 0x9A, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x37, 0x99, 0x99, 0x93, 0x99, 0x99, 0x99, 0x99, 0x99, 0xCA, 0xCB, 0xF5,
    0x34, 0x64, 0xF5, 0xF5, 0x3B, 0x3B, 0x9B, 0xFB, 0x95, 0x34, 0x95, 0x31, 0x00, 0xFB,
    0xFB, 0x00, 0x31, 0x93, 0xCA, 0x69, 0x93, 0x99, 0x99, 0x99, 0xC4, 0xCA, 0xCA, 0x9B,
    0x3A, 0x3B, 0xF5, 0xFB, 0xF5, 0x9B, 0xFB, 0xFB, 0x6A, 0x3A, 0x3A, 0x93, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x62, 0xCA, 0x93, 0x93, 0x93, 0x93, 0x99, 0xC4, 0xCA, 0xCA, 0x65,
    0x3B, 0x3B, 0x3B, 0xCB, 0xFB, 0xFB, 0xFB, 0x6A, 0x35, 0x3B, 0x35, 0xC4, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x37, 0x93, 0xCA, 0x68, 0x93, 0x93, 0x99, 0xC4, 0xC4, 0xCA, 0x65,
    0x3B, 0x11, 0x0B, 0x9B, 0xFB, 0xFB, 0xFB, 0x0B, 0x0B, 0x3B, 0x35, 0xC4, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x62, 0xC4, 0x99, 0x92, 0x93, 0x99, 0x99, 0x99, 0xCA, 0x6B,
    0x3B, 0x0B, 0x71, 0xFB, 0xFB, 0xFB, 0xFB, 0xCB, 0x11, 0x0B, 0x35, 0x9A, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x31, 0x62, 0xC4, 0x99, 0x68, 0x93, 0x99, 0x99, 0x99, 0xCB,
    0x0B, 0x3B, 0xFB, 0xFB, 0x6A, 0x11, 0xCB, 0xFB, 0x9B, 0x0B, 0x65, 0x62, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x00, 0x37, 0x62, 0x99, 0xCA, 0x99, 0x93, 0x93, 0x99, 0xFB,
    0x3B, 0x0B, 0x6B, 0x6A, 0x11, 0x11, 0x11, 0x9B, 0x0A, 0x0B, 0xCB, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x37, 0x62, 0x62, 0x99, 0xCA, 0xCA, 0xCA, 0x99,
    0xCB, 0x3B, 0x0B, 0x0B, 0x0B, 0x0B, 0x0B, 0x0B, 0x0B, 0x9B, 0x31, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x31, 0x62, 0x62, 0x37, 0x37, 0x37, 0x38,
    0x62, 0xCA, 0x9B, 0x3B, 0x0B, 0x0B, 0x0B, 0x6B, 0xCB, 0x31, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x31, 0x31, 0x31, 0x31,
    0x06, 0x00, 0x31, 0x99, 0xCA, 0xCA, 0x9A, 0x62, 0x00, 0x00, 0x00, 0x00, 0xFB, 0xFB,
    0xD7, 0xFB, 0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB, 0xFB, 0xD7,
    0xD7, 0xD7, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB,
    0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xD7, 0xD7,
];

#[rustfmt::skip]
static SOUND_MUTED_PIXELS: [u8; 784] = [
    0xD7, 0xD7, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB,
    0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xD7, 0xD7,
    0xD7, 0xFB, 0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB, 0xFB, 0xD7,
    0xFB, 0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x31, 0x62, 0x68, 0x68, 0x62, 0x31,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x68, 0x93, 0x93, 0x69, 0x93, 0x93, 0x93,
    0x68, 0x37, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x00, 0x31, 0x93, 0x68, 0x99, 0xC4, 0xCA, 0xC4, 0x99, 0x68,
    0x69, 0x68, 0x62, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x31, 0x93, 0x93, 0xCB, 0xFB, 0xCA, 0xCA, 0xCA, 0xFB, 0xFB,
    0x99, 0x68, 0x68, 0x62, 0x37, 0x68, 0x62, 0x68, 0x31, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x93, 0x99, 0xFB, 0xC4, 0x93, 0x68, 0x93, 0x93, 0x99, 0xCA,
    0xFB, 0xC4, 0x68, 0x68, 0x62, 0x62, 0x93, 0x68, 0x99, 0x62, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x38, 0x93, 0xFB, 0x99, 0x68, 0x93, 0x99, 0x99, 0x99, 0x99, 0x99,
    0xC4, 0xFB, 0xC4, 0x68, 0x68, 0x31, 0x99, 0x93, 0x68, 0x99, 0x31, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x68, 0xCA, 0xC4, 0x68, 0x93, 0x99, 0x99, 0x99, 0x9A, 0xC4, 0xC4,
    0x99, 0xCA, 0xFB, 0x93, 0x68, 0x62, 0x62, 0x99, 0x68, 0x99, 0x93, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x31, 0x93, 0xF5, 0x68, 0x93, 0x99, 0x99, 0x99, 0xC4, 0xC4, 0xC4, 0xCA,
    0x99, 0x68, 0xCA, 0xCA, 0x62, 0x68, 0x31, 0x99, 0x93, 0x93, 0x99, 0x31, 0x00, 0xFB,
    0xFB, 0x00, 0x62, 0x99, 0xC4, 0x69, 0x93, 0x99, 0x99, 0xC4, 0xC4, 0xCA, 0xCA, 0x99,
    0x93, 0x93, 0x99, 0xFB, 0x93, 0x68, 0x37, 0x99, 0xC4, 0x68, 0xC4, 0x37, 0x00, 0xFB,
    0xFB, 0x00, 0x62, 0xCA, 0x93, 0x93, 0x99, 0x99, 0xC4, 0xC4, 0xCA, 0xCA, 0xCA, 0x99,
    0xC4, 0xC4, 0x68, 0xFB, 0x9A, 0x62, 0x62, 0x68, 0xC4, 0x62, 0x93, 0x37, 0x00, 0xFB,
    0xFB, 0x00, 0x68, 0xFB, 0x68, 0x93, 0x99, 0x99, 0x99, 0xC4, 0xCA, 0xCA, 0x99, 0x93,
    0xC4, 0x99, 0x62, 0xCA, 0xCA, 0x62, 0x62, 0x31, 0x68, 0x38, 0x68, 0x31, 0x00, 0xFB,
    0xFB, 0x00, 0x68, 0xFB, 0x68, 0x93, 0x93, 0x99, 0x99, 0x99, 0xC4, 0xCA, 0x99, 0x37,
    0x68, 0x62, 0x31, 0x99, 0xFB, 0x62, 0x62, 0x31, 0x62, 0x37, 0x62, 0x31, 0x00, 0xFB,
    0xFB, 0x00, 0x62, 0xF5, 0x68, 0x93, 0x93, 0x93, 0x99, 0xC4, 0xCA, 0xCA, 0xCA, 0x31,
    0x31, 0x31, 0x31, 0x93, 0xFB, 0x62, 0x62, 0x31, 0x62, 0x31, 0x62, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x62, 0xCA, 0x93, 0x93, 0x93, 0x99, 0xC4, 0xCA, 0xCA, 0xCA, 0xFB, 0x99,
    0x31, 0x31, 0x31, 0x93, 0xFB, 0x62, 0x62, 0x31, 0x38, 0x31, 0x31, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x37, 0x99, 0x99, 0x93, 0x99, 0x99, 0x99, 0x99, 0x99, 0xCA, 0xCB, 0xF5,
    0xCA, 0x69, 0x68, 0x99, 0xF5, 0x62, 0x62, 0x31, 0x31, 0x31, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x31, 0x93, 0xCA, 0x69, 0x93, 0x99, 0x99, 0x99, 0xC4, 0xCA, 0xCA, 0xCA,
    0xCA, 0xCA, 0xCA, 0xCA, 0xC4, 0x62, 0x37, 0x31, 0x06, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x62, 0xCA, 0x93, 0x93, 0x93, 0x93, 0x99, 0xC4, 0xCA, 0xCA, 0xCA,
    0xCA, 0xCA, 0x99, 0xFB, 0x93, 0x62, 0x31, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x37, 0x93, 0xCA, 0x68, 0x93, 0x93, 0x99, 0xC4, 0xC4, 0xC4, 0xC4,
    0xC4, 0xC4, 0xC4, 0xF5, 0x62, 0x62, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x62, 0xC4, 0x99, 0x92, 0x93, 0x99, 0x99, 0x99, 0x99, 0xC4,
    0x99, 0x99, 0xF5, 0x93, 0x62, 0x31, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x31, 0x62, 0xC4, 0x99, 0x68, 0x93, 0x99, 0x99, 0x99, 0x99,
    0x99, 0xCA, 0x99, 0x37, 0x37, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x00, 0x37, 0x62, 0x99, 0xCA, 0x99, 0x93, 0x93, 0x99, 0xC4,
    0xF5, 0x99, 0x37, 0x37, 0x31, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x37, 0x62, 0x62, 0x99, 0xCA, 0xCA, 0xCA, 0x99,
    0x62, 0x37, 0x37, 0x31, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x31, 0x62, 0x62, 0x37, 0x37, 0x37, 0x38,
    0x37, 0x31, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB,
    0xFB, 0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x31, 0x31, 0x31, 0x31,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB, 0xFB,
    0xD7, 0xFB, 0xFB, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFB, 0xFB, 0xD7,
    0xD7, 0xD7, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB,
    0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xFB, 0xD7, 0xD7,
];
