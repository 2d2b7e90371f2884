//! Host-side doubles for the hardware seams, shared by unit tests.

use std::collections::{BTreeSet, VecDeque};
use std::string::String;
use std::vec::Vec;

use embedded_graphics::geometry::{Point, Size};

use crate::diag::bus_scan::BusProbe;
use crate::diag::sensor::{EnvSensor, SamplingMode};
use crate::error::{Error, Result};
use crate::ui::assets::Bitmap;
use crate::ui::overlay::MuteControl;
use crate::ui::surface::{Font, Surface};
use crate::ui::{ButtonId, ButtonState, ButtonZone, NavEvent, NavInput, TouchEvent, TouchSource};

/// Delay that returns immediately and remembers how long it was asked to wait.
#[derive(Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
    pub calls: usize,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl embedded_hal_async::delay::DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.calls += 1;
    }

    async fn delay_us(&mut self, us: u32) {
        self.total_ns += us as u64 * 1_000;
        self.calls += 1;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.total_ns += ms as u64 * 1_000_000;
        self.calls += 1;
    }
}

/// Surface that records what was drawn.
pub struct MockSurface {
    pub size: Size,
    /// Text drawn since the last clear.
    pub frame: Vec<String>,
    pub texts: Vec<(Point, String)>,
    pub bitmaps: Vec<(Point, Bitmap)>,
    pub clears: usize,
    pub flushes: usize,
}

impl MockSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            frame: Vec::new(),
            texts: Vec::new(),
            bitmaps: Vec::new(),
            clears: 0,
            flushes: 0,
        }
    }
}

impl Surface for MockSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.frame.clear();
        self.clears += 1;
    }

    fn draw_text(&mut self, origin: Point, text: &str, _font: Font) {
        self.frame.push(text.into());
        self.texts.push((origin, text.into()));
    }

    fn draw_bitmap(&mut self, origin: Point, bitmap: &Bitmap) {
        self.bitmaps.push((origin, *bitmap));
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

#[derive(Default)]
pub struct MockAudio {
    pub calls: Vec<bool>,
}

impl MuteControl for MockAudio {
    fn set_muted(&mut self, muted: bool) {
        self.calls.push(muted);
    }
}

#[derive(Default)]
pub struct ScriptedTouch {
    pub events: VecDeque<TouchEvent>,
}

impl TouchSource for ScriptedTouch {
    async fn poll_touch(&mut self) -> Option<TouchEvent> {
        self.events.pop_front()
    }
}

/// Navigation keys replaying a script; `None` entries are idle passes.
#[derive(Default)]
pub struct ScriptedNav {
    pub events: VecDeque<Option<NavEvent>>,
}

impl ScriptedNav {
    pub fn new(events: &[Option<NavEvent>]) -> Self {
        Self {
            events: events.iter().copied().collect(),
        }
    }
}

impl NavInput for ScriptedNav {
    fn poll_nav(&mut self) -> Option<NavEvent> {
        self.events.pop_front().flatten()
    }
}

/// Cancel button that reads "pressed" from the n-th query on.
pub struct CancelAfter {
    pub remaining: usize,
    pub queries: usize,
}

impl CancelAfter {
    pub fn new(remaining: usize) -> Self {
        Self {
            remaining,
            queries: 0,
        }
    }
}

impl ButtonState for CancelAfter {
    fn is_pressed(&mut self, _zone: ButtonZone, _button: ButtonId) -> bool {
        self.queries += 1;
        if self.remaining == 0 {
            true
        } else {
            self.remaining -= 1;
            false
        }
    }
}

/// Bus where a fixed set of addresses acknowledges.
#[derive(Default)]
pub struct AckProbe {
    pub acked: BTreeSet<u8>,
    pub probes: Vec<(u8, u8)>,
}

impl AckProbe {
    pub fn with(addresses: &[u8]) -> Self {
        Self {
            acked: addresses.iter().copied().collect(),
            probes: Vec::new(),
        }
    }
}

impl BusProbe for AckProbe {
    async fn is_device_ready(&mut self, address: u8, attempts: u8) -> Result<()> {
        self.probes.push((address, attempts));
        if self.acked.contains(&address) {
            Ok(())
        } else {
            Err(Error::BusNack)
        }
    }
}

/// Sensor whose step results are scripted per call.
///
/// Each queue is consumed front to back; an empty queue yields `Ok(())`.
#[derive(Default)]
pub struct ScriptedSensor {
    pub init: VecDeque<Result<()>>,
    pub sampling: VecDeque<Result<()>>,
    pub measure: VecDeque<Result<()>>,
    pub raw: (i32, i32, i32),
    pub log: Vec<&'static str>,
    pub modes: Vec<SamplingMode>,
}

impl ScriptedSensor {
    pub fn reading(temperature_x100: i32, pressure_x256: i32, humidity_x1024: i32) -> Self {
        Self {
            raw: (temperature_x100, pressure_x256, humidity_x1024),
            ..Self::default()
        }
    }

    pub fn count(&self, step: &str) -> usize {
        self.log.iter().filter(|s| **s == step).count()
    }
}

impl EnvSensor for ScriptedSensor {
    async fn initialize(&mut self) -> Result<()> {
        self.log.push("init");
        self.init.pop_front().unwrap_or(Ok(()))
    }

    async fn set_sampling(&mut self, mode: SamplingMode) -> Result<()> {
        self.log.push("sampling");
        self.modes.push(mode);
        self.sampling.pop_front().unwrap_or(Ok(()))
    }

    async fn take_measurement(&mut self) -> Result<()> {
        self.log.push("measure");
        self.measure.pop_front().unwrap_or(Ok(()))
    }

    fn temperature_x100(&self) -> i32 {
        self.raw.0
    }

    fn pressure_x256(&self) -> i32 {
        self.raw.1
    }

    fn humidity_x1024(&self) -> i32 {
        self.raw.2
    }
}
