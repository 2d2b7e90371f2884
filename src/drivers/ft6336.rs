//! FocalTech FT6336 capacitive touch controller.
//!
//! The controller is polled: each poll reads the status byte and the first
//! touch point (0x02..0x08) and turns the change since the last poll into
//! at most one [`TouchEvent`].

use embedded_graphics::geometry::Point;
use embedded_hal_async::i2c::I2c;

use crate::error::{Error, Result};
use crate::ui::{TouchAction, TouchEvent, TouchSource};

pub const FT6336_ADDR: u8 = 0x38;
const REG_TD_STATUS: u8 = 0x02;
const FRAME_LEN: usize = 7;

/// Raw event flag of a touch point (bits 7:6 of P1_XH).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RawEvent {
    PressDown,
    LiftUp,
    Contact,
    NoEvent,
}

impl RawEvent {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => RawEvent::PressDown,
            1 => RawEvent::LiftUp,
            2 => RawEvent::Contact,
            _ => RawEvent::NoEvent,
        }
    }
}

/// First touch point of a frame, in panel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawPoint {
    pub x: u16,
    pub y: u16,
    pub event: RawEvent,
}

/// Decode `[TD_STATUS, P1_XH, P1_XL, P1_YH, P1_YL, P1_WEIGHT, P1_MISC]`.
///
/// Returns `None` when no finger is reported.
pub fn parse_frame(frame: &[u8; FRAME_LEN]) -> Option<RawPoint> {
    let count = frame[0] & 0x0F;
    if count == 0 || count > 2 {
        return None;
    }
    Some(RawPoint {
        x: (((frame[1] & 0x0F) as u16) << 8) | frame[2] as u16,
        y: (((frame[3] & 0x0F) as u16) << 8) | frame[4] as u16,
        event: RawEvent::from_bits(frame[1] >> 6),
    })
}

/// Panel to screen coordinate mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchMapping {
    pub swap_xy: bool,
    pub invert_x: bool,
    pub invert_y: bool,
    /// Screen size after the swap.
    pub width: u16,
    pub height: u16,
}

impl TouchMapping {
    /// Portrait panel mounted as a landscape screen of `width` × `height`.
    pub const fn landscape(width: u16, height: u16) -> Self {
        Self {
            swap_xy: true,
            invert_x: true,
            invert_y: false,
            width,
            height,
        }
    }

    pub fn map(&self, raw: RawPoint) -> Point {
        let (mut x, mut y) = (raw.x as i32, raw.y as i32);
        if self.swap_xy {
            core::mem::swap(&mut x, &mut y);
        }
        let (max_x, max_y) = (self.width as i32 - 1, self.height as i32 - 1);
        if self.invert_x {
            x = max_x - x;
        }
        if self.invert_y {
            y = max_y - y;
        }
        Point::new(x.clamp(0, max_x.max(0)), y.clamp(0, max_y.max(0)))
    }
}

pub struct Ft6336<I> {
    i2c: I,
    mapping: TouchMapping,
    /// Last reported position while a finger is down.
    down: Option<Point>,
}

impl<I: I2c> Ft6336<I> {
    pub fn new(i2c: I, mapping: TouchMapping) -> Self {
        Self {
            i2c,
            mapping,
            down: None,
        }
    }

    pub async fn read_frame(&mut self) -> Result<[u8; FRAME_LEN]> {
        let mut frame = [0u8; FRAME_LEN];
        self.i2c
            .write_read(FT6336_ADDR, &[REG_TD_STATUS], &mut frame)
            .await
            .map_err(Error::from_i2c)?;
        Ok(frame)
    }

    /// Fold one decoded frame into the down/up state.
    fn track(&mut self, point: Option<RawPoint>) -> Option<TouchEvent> {
        let lifted = |p: Point| TouchEvent::new(TouchAction::Untouch, p.x, p.y);
        match (self.down, point) {
            (None, Some(raw)) if raw.event != RawEvent::LiftUp => {
                let p = self.mapping.map(raw);
                self.down = Some(p);
                Some(TouchEvent::new(TouchAction::Touch, p.x, p.y))
            }
            (Some(last), Some(raw)) if raw.event == RawEvent::LiftUp => {
                self.down = None;
                Some(lifted(last))
            }
            (Some(last), Some(raw)) => {
                let p = self.mapping.map(raw);
                if p == last {
                    return None;
                }
                self.down = Some(p);
                Some(TouchEvent::new(TouchAction::Move, p.x, p.y))
            }
            (Some(last), None) => {
                self.down = None;
                Some(lifted(last))
            }
            (None, _) => None,
        }
    }
}

impl<I: I2c> TouchSource for Ft6336<I> {
    async fn poll_touch(&mut self) -> Option<TouchEvent> {
        match self.read_frame().await {
            Ok(frame) => self.track(parse_frame(&frame)),
            Err(e) => {
                trace!("FT6336: read failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
    use std::collections::VecDeque;

    fn frame(count: u8, event: u8, x: u16, y: u16) -> [u8; FRAME_LEN] {
        [
            count,
            (event << 6) | (x >> 8) as u8,
            x as u8,
            (y >> 8) as u8,
            y as u8,
            0,
            0,
        ]
    }

    #[test]
    fn parses_first_point() {
        let p = parse_frame(&frame(1, 0, 0x123, 0x0AB)).unwrap();
        assert_eq!((p.x, p.y, p.event), (0x123, 0x0AB, RawEvent::PressDown));
        assert_eq!(parse_frame(&frame(0, 0, 5, 5)), None);
        // Out-of-range counts are noise.
        assert_eq!(parse_frame(&frame(0x0F, 0, 5, 5)), None);
    }

    #[test]
    fn landscape_mapping_swaps_and_mirrors() {
        let m = TouchMapping::landscape(320, 240);
        let raw = |x, y| RawPoint {
            x,
            y,
            event: RawEvent::Contact,
        };
        assert_eq!(m.map(raw(0, 0)), Point::new(319, 0));
        assert_eq!(m.map(raw(239, 319)), Point::new(0, 239));
        assert_eq!(m.map(raw(1000, 1000)), Point::new(0, 239));
    }

    struct FrameBus {
        frames: VecDeque<[u8; FRAME_LEN]>,
    }

    impl ErrorType for FrameBus {
        type Error = ErrorKind;
    }

    impl I2c for FrameBus {
        async fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [Operation<'_>],
        ) -> core::result::Result<(), Self::Error> {
            let next = self.frames.pop_front().ok_or(ErrorKind::Other)?;
            for op in operations {
                if let Operation::Read(buf) = op {
                    buf.copy_from_slice(&next);
                }
            }
            Ok(())
        }
    }

    #[test]
    fn finger_down_move_and_lift() {
        let identity = TouchMapping {
            swap_xy: false,
            invert_x: false,
            invert_y: false,
            width: 320,
            height: 240,
        };
        let bus = FrameBus {
            frames: [
                frame(0, 3, 0, 0),
                frame(1, 0, 10, 20),
                frame(1, 2, 10, 20),
                frame(1, 2, 12, 20),
                frame(0, 3, 0, 0),
            ]
            .into_iter()
            .collect(),
        };
        let mut touch = Ft6336::new(bus, identity);

        assert_eq!(block_on(touch.poll_touch()), None);
        assert_eq!(
            block_on(touch.poll_touch()),
            Some(TouchEvent::new(TouchAction::Touch, 10, 20))
        );
        // Unchanged contact produces nothing.
        assert_eq!(block_on(touch.poll_touch()), None);
        assert_eq!(
            block_on(touch.poll_touch()),
            Some(TouchEvent::new(TouchAction::Move, 12, 20))
        );
        assert_eq!(
            block_on(touch.poll_touch()),
            Some(TouchEvent::new(TouchAction::Untouch, 12, 20))
        );
        // Bus errors read as "no event".
        assert_eq!(block_on(touch.poll_touch()), None);
    }
}
