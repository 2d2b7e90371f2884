//! Bounded one-shot hardware exercises launched from the menu.
//!
//! Each exercise runs to completion (or first failure) and the dispatcher
//! reports the result with a timed [`Notice`]. None of them can take the
//! application down.

use core::fmt::Write;

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use heapless::String;

use crate::config::{
    SD_TEST_FILE, SD_TEST_REPEAT, SERVO_PULSE_COUNT, SERVO_PULSE_HIGH_US, SERVO_PULSE_LOW_MS,
    USB_TX_POLL_MS, USB_TX_TIMEOUT_MS,
};
use crate::error::{Error, Result};
use crate::poll::poll_until;
use crate::ui::notice::Notice;

/// Payload line buffer, sized for the longest timestamp.
pub type Payload = String<64>;

/// File-system collaborator (FAT on SD card).
///
/// Failures carry the step and the driver's status code in
/// [`Error::Storage`].
#[allow(async_fn_in_trait)]
pub trait Storage {
    async fn mount(&mut self) -> Result<()>;
    /// Create `name`, truncating it if it already exists.
    async fn open(&mut self, name: &str) -> Result<()>;
    /// Append all of `data` to the open file.
    async fn write(&mut self, data: &[u8]) -> Result<()>;
    async fn close(&mut self) -> Result<()>;
}

/// Serial (USB CDC) transmit path: stage a buffer, kick it off, then
/// poll the idle flag.
pub trait Transport {
    fn submit(&mut self, data: &[u8]) -> Result<()>;
    fn transmit(&mut self) -> Result<()>;
    fn is_idle(&mut self) -> bool;
}

/// Monotonic millisecond clock used for payload timestamps.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<T: Storage + ?Sized> Storage for &mut T {
    async fn mount(&mut self) -> Result<()> {
        (**self).mount().await
    }

    async fn open(&mut self, name: &str) -> Result<()> {
        (**self).open(name).await
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        (**self).write(data).await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }
}

fn payload(kind: &str, clock: &impl Clock) -> Payload {
    let mut line = Payload::new();
    let _ = write!(line, "{} test. Timestamp: {}\r\n", kind, clock.now_ms());
    line
}

/// Write the timestamp line [`SD_TEST_REPEAT`] times to [`SD_TEST_FILE`].
///
/// Writing stops at the first failed chunk. Once the file is open, close is
/// attempted regardless, and the first error wins.
pub async fn sd_write_test<S: Storage, C: Clock>(storage: &mut S, clock: &C) -> Result<()> {
    storage.mount().await?;
    storage.open(SD_TEST_FILE).await?;

    let line = payload("SD write", clock);
    let mut written = Ok(());
    for _ in 0..SD_TEST_REPEAT {
        written = storage.write(line.as_bytes()).await;
        if written.is_err() {
            break;
        }
    }
    let closed = storage.close().await;

    written.and(closed)
}

/// Send one timestamp line and wait for the transport to go idle.
pub async fn usb_transmit_test<T, C, D>(transport: &mut T, clock: &C, delay: &mut D) -> Result<()>
where
    T: Transport,
    C: Clock,
    D: DelayNs,
{
    let line = payload("USB", clock);
    transport.submit(line.as_bytes())?;
    transport.transmit()?;
    poll_until(delay, USB_TX_TIMEOUT_MS, USB_TX_POLL_MS, || transport.is_idle()).await?;
    Ok(())
}

/// Drive [`SERVO_PULSE_COUNT`] RC-servo frames on `pin`.
///
/// Returns the number of complete pulses. A pin error aborts the train and
/// leaves the pin low when possible.
pub async fn servo_pulse_test<P, D>(pin: &mut P, delay: &mut D) -> Result<u32>
where
    P: OutputPin,
    D: DelayNs,
{
    for n in 0..SERVO_PULSE_COUNT {
        if pin.set_high().is_err() {
            let _ = pin.set_low();
            warn!("Servo: GPIO failed after {} pulse(s)", n);
            return Err(Error::Gpio);
        }
        delay.delay_us(SERVO_PULSE_HIGH_US).await;
        pin.set_low().map_err(|_| Error::Gpio)?;
        delay.delay_ms(SERVO_PULSE_LOW_MS).await;
    }
    Ok(SERVO_PULSE_COUNT)
}

/// The leaf exercises, for result reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Exercise {
    SdWrite,
    UsbTransmit,
    ServoPulse,
}

impl Exercise {
    /// Timed notice reporting `result`.
    pub fn notice<T>(self, result: &Result<T>) -> Notice<'static> {
        let message = match (self, result.is_ok()) {
            (Exercise::SdWrite, true) => "File written successfully",
            (Exercise::SdWrite, false) => "File write error",
            (Exercise::UsbTransmit, true) => "USB packet sent",
            (Exercise::UsbTransmit, false) => "USB transmit error",
            (Exercise::ServoPulse, true) => "Servo pulses done",
            (Exercise::ServoPulse, false) => "Servo GPIO error",
        };
        let title = if result.is_ok() { "Success" } else { "Error" };
        Notice::new(title, message)
    }
}
