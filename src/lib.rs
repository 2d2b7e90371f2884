//! touchdeck - control loop of a touchscreen demo launcher.
//!
//! The library carries everything that does not touch a concrete HAL:
//! the menu, the action dispatcher, the I²C diagnostic screen, the sound
//! overlay and the device drivers written against `embedded-hal-async`.
//! The firmware in `main.rs` only wires nRF52840 peripherals into an
//! [`app::Board`] and runs [`app::Application`].
//!
//! Usage: `cargo test --lib` runs the host-side tests; the firmware builds
//! with `cargo build --release --features embedded --target thumbv7em-none-eabihf`.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod app;
pub mod config;
pub mod diag;
pub mod dispatch;
pub mod drivers;
pub mod error;
pub mod exercises;
pub mod poll;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use app::{Application, Board, Devices};
pub use error::{Error, Result};
