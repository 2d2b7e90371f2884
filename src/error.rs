//! Unified error type for touchdeck.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data, so the
//! enum stays `Copy` and can be stored in an [`Outcome`] accumulator.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // I²C bus
    /// The addressed device did not acknowledge.
    BusNack,

    /// A transaction did not finish within its time budget.
    BusTimeout,

    /// Arbitration loss, bus error or overrun reported by the controller.
    BusFault,

    /// Any other bus failure ("bus unknown error").
    BusUnknown,

    // Sensor
    /// The chip-id register did not identify the expected sensor.
    SensorNotFound,

    /// The sensor is still busy (NVM copy or conversion in progress).
    SensorNotReady,

    /// The sensor reported a skipped (disabled) channel.
    MeasurementSkipped,

    // Storage / transport / GPIO
    /// A storage step failed with a driver status code.
    Storage { op: StorageOp, code: u8 },

    /// The serial transport rejected or dropped a transfer.
    Transport,

    /// GPIO write failed.
    Gpio,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,

    /// A polled condition did not become true in time.
    Timeout,
}

/// Storage step that produced a [`Error::Storage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageOp {
    Mount,
    Open,
    Write,
    Close,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
    /// Map any `embedded-hal` I²C error onto the bus variants.
    pub fn from_i2c<E: embedded_hal::i2c::Error>(e: E) -> Self {
        e.kind().into()
    }
}

impl From<embedded_hal::i2c::ErrorKind> for Error {
    fn from(kind: embedded_hal::i2c::ErrorKind) -> Self {
        use embedded_hal::i2c::ErrorKind;
        match kind {
            ErrorKind::NoAcknowledge(_) => Error::BusNack,
            ErrorKind::ArbitrationLoss | ErrorKind::Bus | ErrorKind::Overrun => Error::BusFault,
            _ => Error::BusUnknown,
        }
    }
}

/// Collects the result of a sequence of fallible steps without stopping at
/// the first failure.
///
/// Callers record every step and keep going; the accumulator remembers the
/// first error and how many steps failed. This deliberately differs from
/// `?`-style early return: later steps still run after an earlier one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outcome {
    first: Option<Error>,
    failures: u8,
}

impl Outcome {
    pub const fn new() -> Self {
        Self {
            first: None,
            failures: 0,
        }
    }

    /// Record one step; returns its value on success.
    pub fn record<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                if self.first.is_none() {
                    self.first = Some(e);
                }
                self.failures = self.failures.saturating_add(1);
                None
            }
        }
    }

    pub fn is_good(&self) -> bool {
        self.first.is_none()
    }

    /// First recorded failure, if any.
    pub fn error(&self) -> Option<Error> {
        self.first
    }

    pub fn failures(&self) -> u8 {
        self.failures
    }

    pub fn into_result(self) -> Result<()> {
        match self.first {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }
}
