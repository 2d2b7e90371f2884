//! ILI9341 TFT over SPI, driven by `mipidsi`.

use embassy_nrf::gpio::Output;
use embassy_nrf::peripherals;
use embassy_nrf::spim::Spim;
use embassy_time::Delay;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use mipidsi::interface::SpiInterface;
use mipidsi::models::ILI9341Rgb565;
use mipidsi::options::{ColorOrder, Orientation, Rotation};
use mipidsi::Builder;

use touchdeck::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub type TftSpi = ExclusiveDevice<Spim<'static, peripherals::SPI3>, Output<'static>, NoDelay>;

/// Type alias for the concrete display driver.
pub type Tft = mipidsi::Display<
    SpiInterface<'static, TftSpi, Output<'static>>,
    ILI9341Rgb565,
    Output<'static>,
>;

/// Control pins of the panel.
pub struct TftPins {
    pub cs: Output<'static>,
    pub dc: Output<'static>,
    pub reset: Output<'static>,
}

/// Bring the panel up in landscape orientation.
///
/// `buffer` batches pixel data between SPI transfers. Returns `None` when
/// the controller does not accept the init sequence.
pub fn init(spi: Spim<'static, peripherals::SPI3>, pins: TftPins, buffer: &'static mut [u8]) -> Option<Tft> {
    let device = ExclusiveDevice::new_no_delay(spi, pins.cs).ok()?;
    let interface = SpiInterface::new(device, pins.dc, buffer);
    // The panel is portrait-native; rotate it to SCREEN_WIDTH x SCREEN_HEIGHT.
    Builder::new(ILI9341Rgb565, interface)
        .reset_pin(pins.reset)
        .display_size(SCREEN_HEIGHT as u16, SCREEN_WIDTH as u16)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .color_order(ColorOrder::Bgr)
        .init(&mut Delay)
        .ok()
}
