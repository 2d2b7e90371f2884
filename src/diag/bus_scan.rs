//! I²C address sweep.
//!
//! Every 7-bit address is probed with a one-byte read; an ACK marks the
//! address present. A failed probe only leaves that cell empty - it never
//! aborts the sweep.

use core::fmt::Write;

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use heapless::String;

use crate::config::{BUS_ADDRESS_COUNT, GRID_COLUMNS, GRID_ROWS, PROBE_ATTEMPTS, PROBE_TIMEOUT_MS};
use crate::error::{Error, Result};

/// Header printed above the grid.
pub const GRID_HEADER: &str = "  | x0 x1 x2 x3 x4 x5 x6 x7 x8 x9 xA xB xC xD xE xF";
/// Separator between header and rows.
pub const GRID_SEPARATOR: &str = "---------------------------------------------------";
/// Marker of an address that did not acknowledge.
pub const MISS_MARKER: &str = "--";

/// Length of one grid line: row label plus 16 three-character cells.
pub const GRID_LINE_LEN: usize = 3 + GRID_COLUMNS * 3;

pub type GridLine = String<GRID_LINE_LEN>;

/// A 7-bit bus address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusAddress(u8);

impl BusAddress {
    pub const fn new(raw: u8) -> Option<Self> {
        if (raw as usize) < BUS_ADDRESS_COUNT {
            Some(Self(raw))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Grid row (high nibble).
    pub const fn row(self) -> usize {
        (self.0 >> 4) as usize
    }

    /// Grid column (low nibble).
    pub const fn column(self) -> usize {
        (self.0 & 0x0F) as usize
    }

    /// All addresses in ascending order.
    pub fn all() -> impl Iterator<Item = BusAddress> {
        (0..BUS_ADDRESS_COUNT as u8).map(BusAddress)
    }
}

/// Presence map of one full sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanResult {
    present: u128,
}

impl ScanResult {
    pub const fn empty() -> Self {
        Self { present: 0 }
    }

    pub fn mark(&mut self, address: BusAddress) {
        self.present |= 1u128 << address.get();
    }

    pub fn is_present(&self, address: BusAddress) -> bool {
        self.present & (1u128 << address.get()) != 0
    }

    pub fn count(&self) -> u32 {
        self.present.count_ones()
    }

    /// Addresses that acknowledged, ascending.
    pub fn addresses(&self) -> impl Iterator<Item = BusAddress> + '_ {
        BusAddress::all().filter(move |a| self.is_present(*a))
    }

    /// Render grid row `row` (0..8), e.g. `"7x| -- -- -- -- -- -- 76 -- ..."`.
    pub fn grid_row(&self, row: usize) -> GridLine {
        let mut line = GridLine::new();
        let _ = write!(line, "{:X}x|", row);
        for column in 0..GRID_COLUMNS {
            match BusAddress::new((row * GRID_COLUMNS + column) as u8) {
                Some(address) if row < GRID_ROWS && self.is_present(address) => {
                    let _ = write!(line, " {:02X}", address.get());
                }
                _ => {
                    let _ = write!(line, " {}", MISS_MARKER);
                }
            }
        }
        line
    }
}

/// Presence check on a shared bus.
#[allow(async_fn_in_trait)]
pub trait BusProbe {
    /// `Ok` if the device at `address` acknowledged within `attempts` tries.
    async fn is_device_ready(&mut self, address: u8, attempts: u8) -> Result<()>;
}

impl<P: BusProbe + ?Sized> BusProbe for &mut P {
    async fn is_device_ready(&mut self, address: u8, attempts: u8) -> Result<()> {
        (**self).is_device_ready(address, attempts).await
    }
}

/// [`BusProbe`] over an async `embedded-hal` I²C bus.
///
/// Each attempt is a one-byte read raced against `timeout_ms`, so a
/// stuck controller costs at most `attempts * timeout_ms` per address.
pub struct I2cProbe<I, D> {
    bus: I,
    delay: D,
    timeout_ms: u32,
}

impl<I, D> I2cProbe<I, D>
where
    I: I2c,
    D: DelayNs,
{
    pub fn new(bus: I, delay: D) -> Self {
        Self {
            bus,
            delay,
            timeout_ms: PROBE_TIMEOUT_MS,
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl<I, D> BusProbe for I2cProbe<I, D>
where
    I: I2c,
    D: DelayNs,
{
    async fn is_device_ready(&mut self, address: u8, attempts: u8) -> Result<()> {
        let Self {
            bus,
            delay,
            timeout_ms,
        } = self;
        let mut last = Error::BusUnknown;
        for _ in 0..attempts.max(1) {
            let mut byte = [0u8; 1];
            match select(bus.read(address, &mut byte), delay.delay_ms(*timeout_ms)).await {
                Either::First(Ok(())) => return Ok(()),
                Either::First(Err(e)) => last = Error::from_i2c(e),
                Either::Second(()) => last = Error::BusTimeout,
            }
        }
        Err(last)
    }
}

/// Sweeps the whole address space.
pub struct BusScanner<P> {
    probe: P,
    attempts: u8,
}

impl<P: BusProbe> BusScanner<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            attempts: PROBE_ATTEMPTS,
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Probe all 128 addresses in ascending order and build a fresh map.
    pub async fn sweep(&mut self) -> ScanResult {
        let mut result = ScanResult::empty();
        for address in BusAddress::all() {
            // Probe failures are informational only.
            if self
                .probe
                .is_device_ready(address.get(), self.attempts)
                .await
                .is_ok()
            {
                result.mark(address);
            }
        }
        debug!("Sweep: {} device(s) answered", result.count());
        result
    }
}
