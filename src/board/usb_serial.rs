//! USB CDC-ACM serial port - the transmit path of the USB exercise.
//!
//! Initialises the Embassy USB stack on the nRF52840 USB peripheral with a
//! single CDC-ACM function. [`UsbSerial`] stages a payload and hands it to
//! [`cdc_writer_task`] through a signal; the task clears the busy flag when
//! the last packet has left the endpoint.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{info, warn};
use embassy_nrf::peripherals;
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::{Builder, Config, UsbDevice};
use heapless::Vec;
use static_cell::StaticCell;

use touchdeck::config;
use touchdeck::error::{Error, Result};
use touchdeck::exercises::Transport;

use super::Irqs;

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// Largest payload one `submit` accepts.
pub const TX_CAPACITY: usize = 128;

type TxBuffer = Vec<u8, TX_CAPACITY>;

static CDC_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();

static TX_REQUEST: Signal<CriticalSectionRawMutex, TxBuffer> = Signal::new();
static TX_BUSY: AtomicBool = AtomicBool::new(false);
static CONNECTED: AtomicBool = AtomicBool::new(false);

/// Device runner plus the CDC class, consumed by the two USB tasks.
pub struct UsbSerialDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub class: CdcAcmClass<'static, UsbDriver>,
}

/// Initialise the USB stack and create the CDC-ACM function.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbSerialDevice {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;
    // IAD, required for CDC on Windows.
    usb_config.device_class = 0xEF;
    usb_config.device_sub_class = 0x02;
    usb_config.device_protocol = 0x01;
    usb_config.composite_with_iads = true;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 128]),
    );

    let state = CDC_STATE.init(State::new());
    let class = CdcAcmClass::new(&mut builder, state, config::USB_CDC_PACKET_SIZE);
    let device = builder.build();

    info!("USB CDC-ACM device initialised");

    UsbSerialDevice { device, class }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Write every staged payload to the host once a terminal is attached.
pub async fn cdc_writer_task(mut class: CdcAcmClass<'static, UsbDriver>) -> ! {
    let packet = config::USB_CDC_PACKET_SIZE as usize;
    loop {
        class.wait_connection().await;
        CONNECTED.store(true, Ordering::Release);
        info!("USB serial: host connected");

        loop {
            let data = TX_REQUEST.wait().await;
            let mut result = Ok(());
            for chunk in data.chunks(packet) {
                result = class.write_packet(chunk).await;
                if result.is_err() {
                    break;
                }
            }
            // A full last packet needs a ZLP to end the transfer.
            if result.is_ok() && !data.is_empty() && data.len() % packet == 0 {
                result = class.write_packet(&[]).await;
            }
            TX_BUSY.store(false, Ordering::Release);
            if result.is_err() {
                warn!("USB serial write failed");
                break;
            }
        }

        CONNECTED.store(false, Ordering::Release);
        info!("USB serial: host disconnected");
    }
}

/// [`Transport`] handle on the CDC writer task.
#[derive(Default)]
pub struct UsbSerial {
    staged: TxBuffer,
}

impl Transport for UsbSerial {
    fn submit(&mut self, data: &[u8]) -> Result<()> {
        if TX_BUSY.load(Ordering::Acquire) {
            return Err(Error::Transport);
        }
        self.staged.clear();
        self.staged
            .extend_from_slice(data)
            .map_err(|_| Error::BufferOverflow)
    }

    fn transmit(&mut self) -> Result<()> {
        if !CONNECTED.load(Ordering::Acquire) || self.staged.is_empty() {
            return Err(Error::Transport);
        }
        TX_BUSY.store(true, Ordering::Release);
        TX_REQUEST.signal(core::mem::take(&mut self.staged));
        Ok(())
    }

    fn is_idle(&mut self) -> bool {
        !TX_BUSY.load(Ordering::Acquire)
    }
}
