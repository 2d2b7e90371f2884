//! touchdeck firmware entry point for the nRF52840.
//!
//! Brings up the peripherals, spawns the USB and button tasks and hands
//! everything else to [`touchdeck::Application`], which runs the menu loop
//! on the main task forever.

#![no_std]
#![no_main]

mod board;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive, Pin as _};
use embassy_nrf::{spim, twim};
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::UsbDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use touchdeck::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use touchdeck::diag::bus_scan::I2cProbe;
use touchdeck::drivers::bme280::Bme280;
use touchdeck::drivers::ft6336::{Ft6336, TouchMapping};
use touchdeck::drivers::shared_i2c::SharedI2c;
use touchdeck::ui::surface::EgSurface;
use touchdeck::ui::ButtonId;
use touchdeck::{Application, Devices};

use board::buttons::{self, ChannelNav, ExternalPins, Keypad, NAV_EVENTS};
use board::display::{self, TftPins};
use board::sd_card::SdStorage;
use board::usb_serial::{self, UsbDriver, UsbSerial};
use board::{AmpEnable, Irqs, NotInstalled, Nrf52840Board, SharedBus, Uptime};

static I2C_BUS: StaticCell<SharedBus> = StaticCell::new();
static TFT_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();

#[embassy_executor::task]
async fn usb_device_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    usb_serial::run_usb_device(device).await
}

#[embassy_executor::task]
async fn cdc_writer_task(class: CdcAcmClass<'static, UsbDriver>) -> ! {
    usb_serial::cdc_writer_task(class).await
}

#[embassy_executor::task(pool_size = 4)]
async fn button_task(pin: AnyPin, button: ButtonId) -> ! {
    buttons::button_task(pin, button, NAV_EVENTS.sender()).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("touchdeck starting");
    let p = embassy_nrf::init(Default::default());

    // Display
    let mut tft_config = spim::Config::default();
    tft_config.frequency = spim::Frequency::M16;
    let tft_spi = spim::Spim::new_txonly(p.SPI3, Irqs, p.P1_15, p.P1_13, tft_config);
    let tft_pins = TftPins {
        cs: Output::new(p.P1_12, Level::High, OutputDrive::Standard),
        dc: Output::new(p.P1_11, Level::Low, OutputDrive::Standard),
        reset: Output::new(p.P1_10, Level::High, OutputDrive::Standard),
    };
    let Some(tft) = display::init(tft_spi, tft_pins, TFT_BUFFER.init([0u8; 512])) else {
        defmt::panic!("ILI9341 init failed");
    };

    // Shared I²C: touch controller, BME280 and the bus probe
    let mut i2c_config = twim::Config::default();
    i2c_config.frequency = twim::Frequency::K400;
    let twim = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, i2c_config);
    let bus: &'static SharedBus = I2C_BUS.init(Mutex::new(twim));
    let touch = Ft6336::new(
        SharedI2c::new(bus),
        TouchMapping::landscape(SCREEN_WIDTH as u16, SCREEN_HEIGHT as u16),
    );

    // SD card, kept slow enough for the card's identification phase
    let mut sd_config = spim::Config::default();
    sd_config.frequency = spim::Frequency::K250;
    let sd_spi = spim::Spim::new(p.SPI2, Irqs, p.P0_19, p.P0_21, p.P0_20, sd_config);
    let sd_cs = Output::new(p.P0_22, Level::High, OutputDrive::Standard);
    let Ok(sd_device) = ExclusiveDevice::new(sd_spi, sd_cs, Delay) else {
        defmt::panic!("SD chip select unavailable");
    };

    // USB CDC-ACM
    let usb = usb_serial::init(p.USBD);
    if let Err(e) = spawner.spawn(usb_device_task(usb.device)) {
        warn!("failed to spawn usb_device_task: {:?}", e);
    }
    if let Err(e) = spawner.spawn(cdc_writer_task(usb.class)) {
        warn!("failed to spawn cdc_writer_task: {:?}", e);
    }

    // Buttons
    let onboard = [
        (p.P0_11.degrade(), ButtonId::Up),
        (p.P0_12.degrade(), ButtonId::Down),
        (p.P0_24.degrade(), ButtonId::Right),
        (p.P0_25.degrade(), ButtonId::Left),
    ];
    for (pin, button) in onboard {
        if let Err(e) = spawner.spawn(button_task(pin, button)) {
            warn!("failed to spawn button_task for {}: {:?}", button, e);
        }
    }
    let keypad = Keypad::new(ExternalPins {
        left: buttons::keypad_pin(p.P0_03.degrade()),
        right: buttons::keypad_pin(p.P0_04.degrade()),
        up: buttons::keypad_pin(p.P0_28.degrade()),
        down: buttons::keypad_pin(p.P0_29.degrade()),
    });

    let devices: Devices<Nrf52840Board> = Devices {
        nav: ChannelNav::new(&NAV_EVENTS),
        buttons: keypad,
        probe: I2cProbe::new(SharedI2c::new(bus), Delay),
        sensor: Bme280::new(SharedI2c::new(bus), Delay),
        storage: SdStorage::new(sd_device, Delay),
        transport: UsbSerial::default(),
        servo: Output::new(p.P0_30, Level::Low, OutputDrive::Standard),
        delay: Delay,
        clock: Uptime,
        demos: NotInstalled,
    };
    let audio = AmpEnable(Output::new(p.P0_31, Level::Low, OutputDrive::Standard));

    let mut app = Application::<Nrf52840Board>::new(EgSurface::new(tft), touch, audio, devices);
    app.run().await
}
