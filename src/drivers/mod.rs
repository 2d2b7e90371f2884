//! Device drivers for the board's I²C peripherals.
//!
//! All of them sit on `embedded-hal-async` traits, so they run unchanged on
//! the firmware's async HAL and on host-side mock buses.

pub mod bme280;
pub mod ft6336;
pub mod shared_i2c;
