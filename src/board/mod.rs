//! nRF52840 board support - the concrete collaborators behind [`Board`].
//!
//! Wiring:
//!
//! | Function          | Peripheral | Pins                                 |
//! |-------------------|------------|--------------------------------------|
//! | ILI9341 TFT       | SPIM3      | SCK P1.15, MOSI P1.13, CS P1.12, DC P1.11, RST P1.10 |
//! | SD card           | SPIM2      | SCK P0.19, MOSI P0.20, MISO P0.21, CS P0.22 |
//! | I²C (touch, BME280)| TWIM0     | SDA P0.26, SCL P0.27                 |
//! | Onboard buttons   | GPIO       | UP P0.11, DOWN P0.12, RIGHT P0.24, LEFT P0.25 |
//! | External keypad   | GPIO       | LEFT P0.03, RIGHT P0.04, UP P0.28, DOWN P0.29 |
//! | Servo signal      | GPIO       | P0.30                                |
//! | Amplifier enable  | GPIO       | P0.31                                |

pub mod buttons;
pub mod display;
pub mod sd_card;
pub mod usb_serial;

use embassy_nrf::gpio::Output;
use embassy_nrf::twim::Twim;
use embassy_nrf::{bind_interrupts, peripherals, spim, twim, usb};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Instant};

use touchdeck::app::Board;
use touchdeck::diag::bus_scan::I2cProbe;
use touchdeck::dispatch::{DemoRunner, Routine};
use touchdeck::drivers::bme280::Bme280;
use touchdeck::drivers::ft6336::Ft6336;
use touchdeck::drivers::shared_i2c::{I2cBus, SharedI2c};
use touchdeck::exercises::Clock;
use touchdeck::ui::notice::Notice;
use touchdeck::ui::overlay::MuteControl;
use touchdeck::ui::surface::{EgSurface, Surface};
use touchdeck::ui::{Screen, TouchSource};

bind_interrupts!(pub struct Irqs {
    USBD => usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => usb::vbus_detect::InterruptHandler;
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<peripherals::SPI2>;
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

pub type BoardI2c = Twim<'static, peripherals::TWISPI0>;
pub type SharedBus = I2cBus<CriticalSectionRawMutex, BoardI2c>;
pub type BusHandle = SharedI2c<'static, CriticalSectionRawMutex, BoardI2c>;

/// Speaker amplifier enable line; low mutes.
pub struct AmpEnable(pub Output<'static>);

impl MuteControl for AmpEnable {
    fn set_muted(&mut self, muted: bool) {
        if muted {
            self.0.set_low();
        } else {
            self.0.set_high();
        }
    }
}

/// Milliseconds since boot.
pub struct Uptime;

impl Clock for Uptime {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

fn routine_title(routine: Routine) -> &'static str {
    match routine {
        Routine::Tetris => "Tetris",
        Routine::Pong => "Pong",
        Routine::Gario => "Gario",
        Routine::Calc => "Calc",
        Routine::GraphicDemo => "Graphic demo",
        Routine::InputTest => "Input test",
        Routine::TouchCalibrate => "Touch calibrate",
    }
}

/// Stand-in for the games and demos, which ship as separate firmware.
pub struct NotInstalled;

impl<S, T, A> DemoRunner<S, T, A> for NotInstalled
where
    S: Surface,
    T: TouchSource,
    A: MuteControl,
{
    async fn run(&mut self, routine: Routine, screen: &mut Screen<S, T, A>) {
        defmt::info!("Demo {} not installed", routine);
        Notice::new(routine_title(routine), "Not installed")
            .show(screen, &mut Delay)
            .await;
    }
}

pub struct Nrf52840Board;

impl Board for Nrf52840Board {
    type Surface = EgSurface<display::Tft>;
    type Touch = Ft6336<BusHandle>;
    type Audio = AmpEnable;
    type Nav = buttons::ChannelNav;
    type Buttons = buttons::Keypad;
    type Probe = I2cProbe<BusHandle, Delay>;
    type Sensor = Bme280<BusHandle, Delay>;
    type Storage = sd_card::SdStorage;
    type Transport = usb_serial::UsbSerial;
    type Servo = Output<'static>;
    type Delay = Delay;
    type Clock = Uptime;
    type Demos = NotInstalled;
}
