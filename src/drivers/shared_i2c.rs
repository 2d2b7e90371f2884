//! One I²C peripheral shared by several async drivers.
//!
//! Each handle locks the bus for exactly one transaction, so the bus probe,
//! the environmental sensor and the touch controller can interleave on the
//! same wires without holding the bus across awaits of their own.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::i2c::{ErrorType, I2c, Operation};

/// Shared bus type.
pub type I2cBus<M, I> = Mutex<M, I>;

/// Handle to a [`I2cBus`]; cheap to create, one per driver.
pub struct SharedI2c<'a, M: RawMutex, I> {
    bus: &'a I2cBus<M, I>,
}

impl<'a, M: RawMutex, I> SharedI2c<'a, M, I> {
    pub fn new(bus: &'a I2cBus<M, I>) -> Self {
        Self { bus }
    }
}

impl<M: RawMutex, I: ErrorType> ErrorType for SharedI2c<'_, M, I> {
    type Error = I::Error;
}

impl<M: RawMutex, I: I2c> I2c for SharedI2c<'_, M, I> {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        bus.transaction(address, operations).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::bus_scan::{BusProbe, I2cProbe};
    use crate::test_support::RecordingDelay;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
    use std::vec::Vec;

    #[derive(Default)]
    struct LogBus {
        log: Vec<u8>,
    }

    impl ErrorType for LogBus {
        type Error = ErrorKind;
    }

    impl I2c for LogBus {
        async fn transaction(
            &mut self,
            address: u8,
            _operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            self.log.push(address);
            if address == 0x38 {
                Ok(())
            } else {
                Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
            }
        }
    }

    #[test]
    fn handles_share_one_bus() {
        let bus: I2cBus<NoopRawMutex, _> = Mutex::new(LogBus::default());
        let mut probe = I2cProbe::new(SharedI2c::new(&bus), RecordingDelay::default());
        let mut other = SharedI2c::new(&bus);

        assert!(block_on(probe.is_device_ready(0x38, 3)).is_ok());
        let mut buf = [0u8; 1];
        assert!(block_on(other.write_read(0x76, &[0xD0], &mut buf)).is_err());
        assert!(block_on(probe.is_device_ready(0x10, 2)).is_err());

        assert_eq!(block_on(bus.lock()).log, vec![0x38, 0x76, 0x10, 0x10]);
    }
}
