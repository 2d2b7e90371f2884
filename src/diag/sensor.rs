//! Environmental sensor acquisition cycle with sticky-failure recovery.
//!
//! State machine:
//!
//! ```text
//! Uninitialized --(init + sampling ok)--> Ready
//! Faulted       --(init + sampling ok)--> Ready
//! any           --(any step fails)------> Faulted
//! ```
//!
//! Reinitialization is attempted at most once per cycle, at its start, and
//! only when the session is not `Ready`. A failed cycle is never retried
//! inside the same iteration; the fault sticks until the next cycle.

use core::fmt::Write;

use heapless::String;

use super::fixed_point::{whole_units, Centi, HUMIDITY_SCALE, PRESSURE_SCALE, TEMPERATURE_SCALE};
use crate::error::{Outcome, Result};

/// Appended to the sensor line when any step of the cycle failed.
pub const ERROR_MARKER: &str = "ERROR";

/// Room for the widest possible line plus the error marker.
pub const SENSOR_LINE_LEN: usize = 64;

pub type SensorLine = String<SENSOR_LINE_LEN>;

/// Acquisition mode passed to [`EnvSensor::set_sampling`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplingMode {
    Sleep,
    /// One conversion per trigger.
    Forced,
    Normal,
}

/// Temperature/pressure/humidity sensor driver contract.
///
/// The getters return the values of the last successful measurement in
/// fixed point: °C ×100, Pa ×256, %RH ×1024.
#[allow(async_fn_in_trait)]
pub trait EnvSensor {
    async fn initialize(&mut self) -> Result<()>;
    async fn set_sampling(&mut self, mode: SamplingMode) -> Result<()>;
    async fn take_measurement(&mut self) -> Result<()>;
    fn temperature_x100(&self) -> i32;
    fn pressure_x256(&self) -> i32;
    fn humidity_x1024(&self) -> i32;
}

impl<S: EnvSensor + ?Sized> EnvSensor for &mut S {
    async fn initialize(&mut self) -> Result<()> {
        (**self).initialize().await
    }

    async fn set_sampling(&mut self, mode: SamplingMode) -> Result<()> {
        (**self).set_sampling(mode).await
    }

    async fn take_measurement(&mut self) -> Result<()> {
        (**self).take_measurement().await
    }

    fn temperature_x100(&self) -> i32 {
        (**self).temperature_x100()
    }

    fn pressure_x256(&self) -> i32 {
        (**self).pressure_x256()
    }

    fn humidity_x1024(&self) -> i32 {
        (**self).humidity_x1024()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorState {
    Uninitialized,
    Ready,
    Faulted,
}

/// Raw fixed-point channels of one measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub temperature_x100: i32,
    pub pressure_x256: i32,
    pub humidity_x1024: i32,
}

impl Reading {
    pub fn temperature(&self) -> Centi {
        Centi::from_raw(self.temperature_x100, TEMPERATURE_SCALE)
    }

    /// Pressure in whole pascal.
    pub fn pressure_pa(&self) -> i32 {
        whole_units(self.pressure_x256, PRESSURE_SCALE)
    }

    pub fn humidity(&self) -> Centi {
        Centi::from_raw(self.humidity_x1024, HUMIDITY_SCALE)
    }
}

/// Result of one acquisition cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Present when the measurement itself succeeded.
    pub reading: Option<Reading>,
    /// Aggregate of every step attempted in this cycle.
    pub outcome: Outcome,
}

impl CycleReport {
    pub fn is_good(&self) -> bool {
        self.outcome.is_good()
    }

    /// Display line, e.g. `"T=25.50C P=10025Pa H=50.00%"`, with
    /// `" ERROR"` appended when the cycle failed.
    pub fn display_line(&self) -> SensorLine {
        let mut line = SensorLine::new();
        match &self.reading {
            Some(r) => {
                let _ = write!(
                    line,
                    "T={}C P={}Pa H={}%",
                    r.temperature(),
                    r.pressure_pa(),
                    r.humidity()
                );
            }
            None => {
                let _ = line.push_str("T=--C P=--Pa H=--%");
            }
        }
        if !self.is_good() {
            let _ = write!(line, " {}", ERROR_MARKER);
        }
        line
    }
}

/// Owns the sensor state across diagnostic iterations.
pub struct SensorSession<S> {
    sensor: S,
    state: SensorState,
}

impl<S: EnvSensor> SensorSession<S> {
    pub fn new(sensor: S) -> Self {
        Self {
            sensor,
            state: SensorState::Uninitialized,
        }
    }

    pub fn state(&self) -> SensorState {
        self.state
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Run one acquisition cycle.
    ///
    /// Steps are accumulated, not short-circuited: a failed
    /// reinitialization still lets the measurement run, so the screen keeps
    /// updating whatever the sensor can deliver, while the cycle as a whole
    /// is reported bad and the session falls back to `Faulted`.
    pub async fn cycle(&mut self) -> CycleReport {
        let mut outcome = Outcome::new();

        if self.state != SensorState::Ready {
            let init = outcome.record(self.sensor.initialize().await);
            let sampling = outcome.record(self.sensor.set_sampling(SamplingMode::Forced).await);
            let next = if init.is_some() && sampling.is_some() {
                SensorState::Ready
            } else {
                SensorState::Faulted
            };
            self.transition(next);
        }

        let reading = outcome
            .record(self.sensor.take_measurement().await)
            .map(|()| Reading {
                temperature_x100: self.sensor.temperature_x100(),
                pressure_x256: self.sensor.pressure_x256(),
                humidity_x1024: self.sensor.humidity_x1024(),
            });

        if let Some(e) = outcome.error() {
            warn!("Sensor: cycle failed ({} step(s)): {}", outcome.failures(), e);
            self.transition(SensorState::Faulted);
        }

        CycleReport { reading, outcome }
    }

    fn transition(&mut self, next: SensorState) {
        if self.state != next {
            info!("Sensor: {} -> {}", self.state, next);
            self.state = next;
        }
    }
}
