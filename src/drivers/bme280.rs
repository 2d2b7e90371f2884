//! Bosch BME280 temperature / pressure / humidity sensor over async I²C.
//!
//! Register map and integer compensation follow the BME280 datasheet
//! (rev. 1.6, section 4.2.3 and 8.2). Results are kept in the fixed-point
//! formats the datasheet produces: °C ×100, Pa ×256 (Q24.8), %RH ×1024
//! (Q22.10).

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::diag::sensor::{EnvSensor, SamplingMode};
use crate::error::{Error, Result};

/// Default address (SDO tied low).
pub const BME280_ADDR: u8 = 0x76;
/// Alternate address (SDO tied high).
pub const BME280_ADDR_ALT: u8 = 0x77;

pub const BME280_CHIP_ID: u8 = 0x60;
const RESET_VALUE: u8 = 0xB6;

const REG_CALIB_TP: u8 = 0x88;
const REG_CHIP_ID: u8 = 0xD0;
const REG_RESET: u8 = 0xE0;
const REG_CALIB_H: u8 = 0xE1;
const REG_CTRL_HUM: u8 = 0xF2;
const REG_STATUS: u8 = 0xF3;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_CONFIG: u8 = 0xF5;
const REG_DATA: u8 = 0xF7;

const CALIB_TP_LEN: usize = 26;
const CALIB_H_LEN: usize = 7;
const DATA_LEN: usize = 8;

// status bits
const STATUS_MEASURING: u8 = 1 << 3;
const STATUS_IM_UPDATE: u8 = 1 << 0;

/// Oversampling ×1 on every channel.
const OSRS_X1: u8 = 0b001;

/// A channel that is switched off reads back as this value.
const SKIPPED_TP: i32 = 0x80000;
const SKIPPED_H: i32 = 0x8000;

/// Budget for NVM copy after reset and for one forced conversion (ms).
const READY_TIMEOUT_MS: u32 = 50;

/// Factory trimming parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Calibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,
    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
    pub h1: u8,
    pub h2: i16,
    pub h3: u8,
    pub h4: i16,
    pub h5: i16,
    pub h6: i8,
}

impl Calibration {
    /// Decode the 0x88..0xA1 and 0xE1..0xE7 blocks.
    pub fn parse(tp: &[u8; CALIB_TP_LEN], h: &[u8; CALIB_H_LEN]) -> Self {
        let u16_at = |i: usize| u16::from_le_bytes([tp[i], tp[i + 1]]);
        let i16_at = |i: usize| i16::from_le_bytes([tp[i], tp[i + 1]]);
        Self {
            t1: u16_at(0),
            t2: i16_at(2),
            t3: i16_at(4),
            p1: u16_at(6),
            p2: i16_at(8),
            p3: i16_at(10),
            p4: i16_at(12),
            p5: i16_at(14),
            p6: i16_at(16),
            p7: i16_at(18),
            p8: i16_at(20),
            p9: i16_at(22),
            h1: tp[25],
            h2: i16::from_le_bytes([h[0], h[1]]),
            h3: h[2],
            // H4 and H5 are 12-bit values sharing the nibbles of 0xE5.
            h4: ((h[3] as i8 as i16) << 4) | (h[4] & 0x0F) as i16,
            h5: ((h[5] as i8 as i16) << 4) | (h[4] >> 4) as i16,
            h6: h[6] as i8,
        }
    }

    /// Temperature in °C ×100 plus the `t_fine` carry used by the other
    /// channels.
    pub fn compensate_temperature(&self, adc_t: i32) -> (i32, i32) {
        let t1 = self.t1 as i32;
        let var1 = (((adc_t >> 3) - (t1 << 1)) * self.t2 as i32) >> 11;
        let var2 = (((((adc_t >> 4) - t1) * ((adc_t >> 4) - t1)) >> 12) * self.t3 as i32) >> 14;
        let t_fine = var1 + var2;
        ((t_fine * 5 + 128) >> 8, t_fine)
    }

    /// Pressure in Pa ×256.
    pub fn compensate_pressure(&self, adc_p: i32, t_fine: i32) -> u32 {
        let mut var1 = t_fine as i64 - 128_000;
        let mut var2 = var1 * var1 * self.p6 as i64;
        var2 += (var1 * self.p5 as i64) << 17;
        var2 += (self.p4 as i64) << 35;
        var1 = ((var1 * var1 * self.p3 as i64) >> 8) + ((var1 * self.p2 as i64) << 12);
        var1 = (((1i64 << 47) + var1) * self.p1 as i64) >> 33;
        if var1 == 0 {
            return 0;
        }
        let mut p = 1_048_576 - adc_p as i64;
        p = (((p << 31) - var2) * 3125) / var1;
        let var1 = (self.p9 as i64 * (p >> 13) * (p >> 13)) >> 25;
        let var2 = (self.p8 as i64 * p) >> 19;
        (((p + var1 + var2) >> 8) + ((self.p7 as i64) << 4)) as u32
    }

    /// Relative humidity in % ×1024.
    pub fn compensate_humidity(&self, adc_h: i32, t_fine: i32) -> u32 {
        let mut v = t_fine - 76_800;
        v = ((((adc_h << 14) - ((self.h4 as i32) << 20) - (self.h5 as i32 * v)) + 16_384) >> 15)
            * (((((((v * self.h6 as i32) >> 10) * (((v * self.h3 as i32) >> 11) + 32_768))
                >> 10)
                + 2_097_152)
                * self.h2 as i32
                + 8192)
                >> 14);
        v -= ((((v >> 15) * (v >> 15)) >> 7) * self.h1 as i32) >> 4;
        (v.clamp(0, 419_430_400) >> 12) as u32
    }
}

/// Compensated result of the last measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Measurement {
    pub temperature_x100: i32,
    pub pressure_x256: u32,
    pub humidity_x1024: u32,
}

pub struct Bme280<I, D> {
    i2c: I,
    delay: D,
    address: u8,
    calibration: Option<Calibration>,
    mode: SamplingMode,
    last: Measurement,
}

impl<I, D> Bme280<I, D>
where
    I: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I, delay: D) -> Self {
        Self::with_address(i2c, delay, BME280_ADDR)
    }

    pub fn with_address(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            calibration: None,
            mode: SamplingMode::Sleep,
            last: Measurement::default(),
        }
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    pub fn last(&self) -> Measurement {
        self.last
    }

    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .await
            .map_err(Error::from_i2c)
    }

    async fn write(&mut self, reg: u8, value: u8) -> Result<()> {
        self.i2c
            .write(self.address, &[reg, value])
            .await
            .map_err(Error::from_i2c)
    }

    /// Wait until none of `mask` is set in the status register.
    async fn wait_status_clear(&mut self, mask: u8) -> Result<()> {
        let mut elapsed = 0;
        loop {
            let mut status = [0u8; 1];
            self.read(REG_STATUS, &mut status).await?;
            if status[0] & mask == 0 {
                return Ok(());
            }
            if elapsed >= READY_TIMEOUT_MS {
                return Err(Error::SensorNotReady);
            }
            self.delay.delay_ms(1).await;
            elapsed += 1;
        }
    }

    fn ctrl_meas(mode: SamplingMode) -> u8 {
        let mode_bits = match mode {
            SamplingMode::Sleep => 0b00,
            SamplingMode::Forced => 0b01,
            SamplingMode::Normal => 0b11,
        };
        (OSRS_X1 << 5) | (OSRS_X1 << 2) | mode_bits
    }
}

impl<I, D> EnvSensor for Bme280<I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// Check the chip id, soft-reset and load the calibration blocks.
    async fn initialize(&mut self) -> Result<()> {
        self.calibration = None;

        let mut id = [0u8; 1];
        self.read(REG_CHIP_ID, &mut id).await?;
        if id[0] != BME280_CHIP_ID {
            warn!("BME280: unexpected chip id {:#x}", id[0]);
            return Err(Error::SensorNotFound);
        }

        self.write(REG_RESET, RESET_VALUE).await?;
        self.delay.delay_ms(2).await;
        self.wait_status_clear(STATUS_IM_UPDATE).await?;

        let mut tp = [0u8; CALIB_TP_LEN];
        let mut h = [0u8; CALIB_H_LEN];
        self.read(REG_CALIB_TP, &mut tp).await?;
        self.read(REG_CALIB_H, &mut h).await?;
        self.calibration = Some(Calibration::parse(&tp, &h));
        self.mode = SamplingMode::Sleep;
        debug!("BME280: calibrated at {:#x}", self.address);
        Ok(())
    }

    /// Configure ×1 oversampling, no filter, and the acquisition mode.
    ///
    /// Forced mode leaves the sensor asleep; every
    /// [`take_measurement`](EnvSensor::take_measurement) triggers one
    /// conversion.
    async fn set_sampling(&mut self, mode: SamplingMode) -> Result<()> {
        // ctrl_hum only takes effect after a write to ctrl_meas.
        self.write(REG_CTRL_HUM, OSRS_X1).await?;
        self.write(REG_CONFIG, 0).await?;
        let initial = match mode {
            SamplingMode::Forced => SamplingMode::Sleep,
            other => other,
        };
        self.write(REG_CTRL_MEAS, Self::ctrl_meas(initial)).await?;
        self.mode = mode;
        Ok(())
    }

    async fn take_measurement(&mut self) -> Result<()> {
        let Some(calibration) = self.calibration else {
            return Err(Error::SensorNotReady);
        };

        if self.mode == SamplingMode::Forced {
            self.write(REG_CTRL_MEAS, Self::ctrl_meas(SamplingMode::Forced))
                .await?;
            self.wait_status_clear(STATUS_MEASURING).await?;
        }

        let mut raw = [0u8; DATA_LEN];
        self.read(REG_DATA, &mut raw).await?;
        let adc_p = ((raw[0] as i32) << 12) | ((raw[1] as i32) << 4) | ((raw[2] as i32) >> 4);
        let adc_t = ((raw[3] as i32) << 12) | ((raw[4] as i32) << 4) | ((raw[5] as i32) >> 4);
        let adc_h = ((raw[6] as i32) << 8) | raw[7] as i32;
        if adc_t == SKIPPED_TP || adc_p == SKIPPED_TP || adc_h == SKIPPED_H {
            return Err(Error::MeasurementSkipped);
        }

        let (temperature_x100, t_fine) = calibration.compensate_temperature(adc_t);
        self.last = Measurement {
            temperature_x100,
            pressure_x256: calibration.compensate_pressure(adc_p, t_fine),
            humidity_x1024: calibration.compensate_humidity(adc_h, t_fine),
        };
        Ok(())
    }

    fn temperature_x100(&self) -> i32 {
        self.last.temperature_x100
    }

    fn pressure_x256(&self) -> i32 {
        self.last.pressure_x256 as i32
    }

    fn humidity_x1024(&self) -> i32 {
        self.last.humidity_x1024 as i32
    }
}
