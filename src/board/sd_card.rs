//! FAT file system on the SD card slot.
//!
//! Uses `embedded-sdmmc` over a dedicated SPI bus. The card is initialised
//! lazily on the first mount; volume, root directory and file are kept as
//! raw handles so the storage object has no borrowed lifetimes.
//!
//! Failures are reported as [`Error::Storage`] with the step and a small
//! status code:
//!   - 1: card / SPI error
//!   - 2: bad file system
//!   - 3: no such volume
//!   - 4: bad file name
//!   - 5: not found
//!   - 6: too many open handles
//!   - 7: disk full
//!   - 8: no open handle for the step
//!   - 0xFF: anything else

use defmt::{debug, warn};
use embassy_nrf::gpio::Output;
use embassy_nrf::peripherals;
use embassy_nrf::spim::Spim;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::{
    Mode, RawDirectory, RawFile, RawVolume, SdCard, SdCardError, TimeSource, Timestamp, VolumeIdx,
    VolumeManager,
};

use touchdeck::error::{Error, Result, StorageOp};
use touchdeck::exercises::Storage;

pub type SdSpi = ExclusiveDevice<Spim<'static, peripherals::SPI2>, Output<'static>, Delay>;

type Volumes = VolumeManager<SdCard<SdSpi, Delay>, FixedTime>;

/// No RTC on board: every file gets the same timestamp.
pub struct FixedTime;

impl TimeSource for FixedTime {
    fn get_timestamp(&self) -> Timestamp {
        // 2024-01-01 00:00:00
        Timestamp {
            year_since_1970: 54,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

fn status_code(e: &embedded_sdmmc::Error<SdCardError>) -> u8 {
    use embedded_sdmmc::Error as E;
    match e {
        E::DeviceError(_) => 1,
        E::FormatError(_) => 2,
        E::NoSuchVolume => 3,
        E::FilenameError(_) => 4,
        E::NotFound => 5,
        E::TooManyOpenVolumes | E::TooManyOpenDirs | E::TooManyOpenFiles => 6,
        E::DiskFull | E::NotEnoughSpace => 7,
        _ => 0xFF,
    }
}

const NO_HANDLE: u8 = 8;

fn storage_error(op: StorageOp) -> impl Fn(embedded_sdmmc::Error<SdCardError>) -> Error {
    move |e| {
        let code = status_code(&e);
        warn!("SD: {} failed, code {}", op, code);
        Error::Storage { op, code }
    }
}

pub struct SdStorage {
    volumes: Volumes,
    volume: Option<RawVolume>,
    root: Option<RawDirectory>,
    file: Option<RawFile>,
}

impl SdStorage {
    pub fn new(spi: SdSpi, delay: Delay) -> Self {
        let card = SdCard::new(spi, delay);
        Self {
            volumes: VolumeManager::new(card, FixedTime),
            volume: None,
            root: None,
            file: None,
        }
    }
}

impl Storage for SdStorage {
    async fn mount(&mut self) -> Result<()> {
        if self.root.is_some() {
            return Ok(());
        }
        let volume = match self.volume {
            Some(volume) => volume,
            None => {
                let volume = self
                    .volumes
                    .open_raw_volume(VolumeIdx(0))
                    .map_err(storage_error(StorageOp::Mount))?;
                self.volume = Some(volume);
                volume
            }
        };
        let root = self
            .volumes
            .open_root_dir(volume)
            .map_err(storage_error(StorageOp::Mount))?;
        self.root = Some(root);
        debug!("SD: volume 0 mounted");
        Ok(())
    }

    async fn open(&mut self, name: &str) -> Result<()> {
        let root = self.root.ok_or(Error::Storage {
            op: StorageOp::Open,
            code: NO_HANDLE,
        })?;
        if let Some(stale) = self.file.take() {
            let _ = self.volumes.close_file(stale);
        }
        let file = self
            .volumes
            .open_file_in_dir(root, name, Mode::ReadWriteCreateOrTruncate)
            .map_err(storage_error(StorageOp::Open))?;
        self.file = Some(file);
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let file = self.file.ok_or(Error::Storage {
            op: StorageOp::Write,
            code: NO_HANDLE,
        })?;
        self.volumes
            .write(file, data)
            .map_err(storage_error(StorageOp::Write))
    }

    async fn close(&mut self) -> Result<()> {
        let file = self.file.take().ok_or(Error::Storage {
            op: StorageOp::Close,
            code: NO_HANDLE,
        })?;
        self.volumes
            .close_file(file)
            .map_err(storage_error(StorageOp::Close))
    }
}
